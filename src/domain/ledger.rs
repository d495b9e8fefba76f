use serde::{Deserialize, Serialize};

use crate::common::error::{LedgerError, LedgerResult};
use crate::common::ids::{AccountNumber, IdSource, TransactionId, UserId};
use crate::common::money::Money;
use crate::domain::account::Account;
use crate::domain::transaction::Transaction;
use crate::domain::user::{Admin, User};

/// The aggregate owning all users (and, through them, all accounts) plus the
/// optional administrator record.
///
/// Accounts are stored per user but account numbers are globally unique, so
/// [`Ledger::find_account`] has at most one match across the population.
///
/// Every mutating operation takes `&mut self`: the ledger is a single-writer
/// value, which makes each read-then-write balance sequence (and the
/// two-account transfer in particular) a critical section by construction.
/// Embedders that need concurrent access wrap the whole ledger in one lock
/// or actor; no operation here blocks or performs I/O.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    users: Vec<User>,
    admin: Option<Admin>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, enforcing username uniqueness at insertion.
    pub fn register_user(&mut self, user: User) -> LedgerResult<()> {
        if self.find_user_by_username(user.username()).is_some() {
            return Err(LedgerError::DuplicateUsername(user.username().to_string()));
        }
        self.users.push(user);
        Ok(())
    }

    pub fn find_user_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id() == id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username() == username)
    }

    pub fn all_users(&self) -> &[User] {
        &self.users
    }

    /// Flattened read-only view of every account across all users.
    pub fn all_accounts(&self) -> Vec<&Account> {
        self.users.iter().flat_map(|u| u.accounts()).collect()
    }

    pub fn find_account(&self, number: &AccountNumber) -> Option<&Account> {
        self.users
            .iter()
            .find_map(|u| u.account_by_number(number))
    }

    pub(crate) fn find_account_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.users
            .iter_mut()
            .find_map(|u| u.account_by_number_mut(number))
    }

    /// Attaches a freshly-constructed account to its owner, enforcing global
    /// account-number uniqueness at insertion.
    pub fn attach_account(&mut self, owner: UserId, account: Account) -> LedgerResult<()> {
        if self.find_account(account.number()).is_some() {
            return Err(LedgerError::DuplicateAccountNumber(account.number().clone()));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id() == owner)
            .ok_or(LedgerError::UserNotFound(owner))?;
        user.attach(account);
        Ok(())
    }

    /// Moves `amount` between two accounts as one logical unit.
    ///
    /// Resolves both accounts, checks both are active and the source is
    /// eligible, then performs the debit and the credit back to back under
    /// the same `&mut self` borrow. No caller can observe money that has
    /// left the source but not reached the destination, and no concurrent
    /// withdrawal can race the eligibility check.
    pub fn execute_transfer(
        &mut self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Money,
        description: &str,
        ids: &mut dyn IdSource,
    ) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        if from == to {
            return Err(LedgerError::SameAccount);
        }

        let source = self
            .find_account(from)
            .ok_or_else(|| LedgerError::AccountNotFound(from.clone()))?;
        let destination = self
            .find_account(to)
            .ok_or_else(|| LedgerError::AccountNotFound(to.clone()))?;
        if !source.is_active() {
            return Err(LedgerError::AccountClosed(from.clone()));
        }
        if !destination.is_active() {
            return Err(LedgerError::AccountClosed(to.clone()));
        }
        if !source.can_withdraw(amount) {
            return Err(LedgerError::WithdrawalNotAllowed(from.clone()));
        }
        if source.balance() < amount {
            return Err(LedgerError::InsufficientFunds(from.clone()));
        }

        // Both accounts were just resolved, so the lookups below cannot
        // fail; the eligibility gate re-runs inside transfer_out.
        self.find_account_mut(from)
            .ok_or_else(|| LedgerError::AccountNotFound(from.clone()))?
            .transfer_out(amount, to, description, ids)?;
        self.find_account_mut(to)
            .ok_or_else(|| LedgerError::AccountNotFound(to.clone()))?
            .receive_transfer(amount, from, description, ids);

        tracing::debug!(%from, %to, %amount, "transfer completed");
        Ok(())
    }

    /// Global audit lookup of a transaction by id.
    pub fn find_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.users
            .iter()
            .flat_map(|u| u.accounts())
            .flat_map(|acc| acc.transactions())
            .find(|tx| tx.id() == id)
    }

    /// Registers the single administrator. Fails once one exists.
    pub fn register_admin(&mut self, admin: Admin) -> LedgerResult<()> {
        if self.admin.is_some() {
            return Err(LedgerError::AdminAlreadyRegistered);
        }
        self.admin = Some(admin);
        Ok(())
    }

    pub fn admin(&self) -> Option<&Admin> {
        self.admin.as_ref()
    }

    /// Clears all users and the administrator. Irreversible.
    pub fn reset(&mut self) {
        self.users.clear();
        self.admin = None;
    }
}
