use crate::common::error::{LedgerError, LedgerResult};
use crate::common::ids::{AccountNumber, IdSource, UserId, UuidIdSource};
use crate::common::money::{InterestRate, Money};
use crate::domain::account::Account;
use crate::domain::ledger::Ledger;
use crate::domain::user::{Admin, User};

/// Orchestrates user registration and account lifecycle: validates
/// parameters, mints identifiers, constructs accounts and attaches them to
/// the ledger. Holds no ledger state itself; the ledger is passed into every
/// call.
pub struct AccountService {
    ids: Box<dyn IdSource>,
}

impl AccountService {
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIdSource))
    }

    /// Substitute an identifier source, e.g. a deterministic one in tests.
    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self { ids }
    }

    /// Registers a new user and returns its generated id. Username
    /// uniqueness is enforced by the ledger; credential material is handled
    /// outside the core.
    pub fn register_user(
        &mut self,
        ledger: &mut Ledger,
        username: &str,
        display_name: &str,
    ) -> LedgerResult<UserId> {
        let id = self.ids.user_id();
        ledger.register_user(User::new(id, username, display_name))?;
        tracing::info!(%id, username, "registered user");
        Ok(id)
    }

    /// Registers the single administrator record.
    pub fn register_admin(
        &mut self,
        ledger: &mut Ledger,
        username: &str,
        display_name: &str,
    ) -> LedgerResult<UserId> {
        let id = self.ids.user_id();
        ledger.register_admin(Admin::new(id, username, display_name))?;
        tracing::info!(%id, username, "registered administrator");
        Ok(id)
    }

    /// Opens a checking account and returns its generated number.
    pub fn open_checking(
        &mut self,
        ledger: &mut Ledger,
        owner: UserId,
        initial_balance: Money,
        overdraft_limit: Money,
    ) -> LedgerResult<AccountNumber> {
        if initial_balance.is_negative() {
            return Err(LedgerError::NegativeParameter("initial balance"));
        }
        if overdraft_limit.is_negative() {
            return Err(LedgerError::NegativeParameter("overdraft limit"));
        }

        let number = self.ids.account_number();
        let account =
            Account::new_checking(number.clone(), owner, initial_balance, overdraft_limit);
        ledger.attach_account(owner, account)?;
        tracing::info!(%number, %owner, "opened checking account");
        Ok(number)
    }

    /// Opens a savings account and returns its generated number. The rate
    /// was already bounds-checked when the [`InterestRate`] was built, so an
    /// out-of-cap rate can never reach this point; the default minimum
    /// balance and withdrawal penalty apply.
    pub fn open_savings(
        &mut self,
        ledger: &mut Ledger,
        owner: UserId,
        initial_balance: Money,
        interest_rate: InterestRate,
    ) -> LedgerResult<AccountNumber> {
        if initial_balance.is_negative() {
            return Err(LedgerError::NegativeParameter("initial balance"));
        }

        let number = self.ids.account_number();
        let account = Account::new_savings(number.clone(), owner, initial_balance, interest_rate);
        ledger.attach_account(owner, account)?;
        tracing::info!(%number, %owner, "opened savings account");
        Ok(number)
    }

    /// Deactivates an account. Idempotent once the account exists.
    pub fn close_account(
        &mut self,
        ledger: &mut Ledger,
        number: &AccountNumber,
    ) -> LedgerResult<()> {
        let account = ledger
            .find_account_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))?;
        account.close();
        tracing::info!(%number, "closed account");
        Ok(())
    }

    /// Read-through balance lookup.
    pub fn balance(&self, ledger: &Ledger, number: &AccountNumber) -> LedgerResult<Money> {
        ledger
            .find_account(number)
            .map(|acc| acc.balance())
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::account::AccountKind;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn open_checking_attaches_a_live_account() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let user = service.register_user(&mut ledger, "alice", "Alice").unwrap();

        let number = service
            .open_checking(&mut ledger, user, money("100"), money("50"))
            .unwrap();

        let account = ledger.find_account(&number).unwrap();
        assert_eq!(account.owner(), user);
        assert_eq!(account.balance(), money("100"));
        assert!(account.is_active());
        assert!(matches!(account.kind(), AccountKind::Checking { .. }));
        assert_eq!(ledger.find_user_by_id(user).unwrap().accounts().len(), 1);
    }

    #[test]
    fn two_openings_never_share_an_account_number() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let user = service.register_user(&mut ledger, "alice", "Alice").unwrap();

        let first = service
            .open_checking(&mut ledger, user, money("1"), Money::zero())
            .unwrap();
        let second = service
            .open_checking(&mut ledger, user, money("2"), Money::zero())
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn invalid_parameters_fail_before_touching_the_ledger() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let user = service.register_user(&mut ledger, "alice", "Alice").unwrap();

        assert_eq!(
            service.open_checking(&mut ledger, user, money("-1"), Money::zero()),
            Err(LedgerError::NegativeParameter("initial balance"))
        );
        assert_eq!(
            service.open_checking(&mut ledger, user, Money::zero(), money("-1")),
            Err(LedgerError::NegativeParameter("overdraft limit"))
        );
        assert_eq!(
            service.open_savings(
                &mut ledger,
                user,
                money("-1"),
                InterestRate::new(100).unwrap()
            ),
            Err(LedgerError::NegativeParameter("initial balance"))
        );
        assert!(ledger.find_user_by_id(user).unwrap().accounts().is_empty());
    }

    #[test]
    fn opening_for_unknown_user_fails() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let ghost = UuidIdSource.user_id();

        assert_eq!(
            service.open_checking(&mut ledger, ghost, Money::zero(), Money::zero()),
            Err(LedgerError::UserNotFound(ghost))
        );
    }

    #[test]
    fn close_account_is_idempotent_and_blocks_activity() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let user = service.register_user(&mut ledger, "alice", "Alice").unwrap();
        let number = service
            .open_checking(&mut ledger, user, money("10"), Money::zero())
            .unwrap();

        service.close_account(&mut ledger, &number).unwrap();
        service.close_account(&mut ledger, &number).unwrap();
        assert!(!ledger.find_account(&number).unwrap().is_active());

        assert!(matches!(
            service.close_account(&mut ledger, &AccountNumber::from("ACC-NOPE")),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn balance_read_through() {
        let mut ledger = Ledger::new();
        let mut service = AccountService::new();
        let user = service.register_user(&mut ledger, "alice", "Alice").unwrap();
        let number = service
            .open_checking(&mut ledger, user, money("42"), Money::zero())
            .unwrap();

        assert_eq!(service.balance(&ledger, &number), Ok(money("42")));
        assert!(service
            .balance(&ledger, &AccountNumber::from("ACC-NOPE"))
            .is_err());
    }
}
