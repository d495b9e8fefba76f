use crate::common::error::{LedgerError, LedgerResult};
use crate::common::ids::{AccountNumber, IdSource, TransactionId, UuidIdSource};
use crate::common::money::Money;
use crate::domain::ledger::Ledger;
use crate::domain::transaction::Transaction;

/// Orchestrates balance mutations: resolves accounts by number, re-validates
/// amount positivity (the account checks it again), delegates to the account
/// or ledger operation and propagates its outcome verbatim. Also exposes the
/// read-only history queries.
pub struct TransactionService {
    ids: Box<dyn IdSource>,
}

impl TransactionService {
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIdSource))
    }

    /// Substitute an identifier source, e.g. a deterministic one in tests.
    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self { ids }
    }

    pub fn deposit(
        &mut self,
        ledger: &mut Ledger,
        number: &AccountNumber,
        amount: Money,
        description: &str,
    ) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        let account = ledger
            .find_account_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))?;
        account.deposit(amount, description, self.ids.as_mut())?;
        tracing::debug!(%number, %amount, "deposit accepted");
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        ledger: &mut Ledger,
        number: &AccountNumber,
        amount: Money,
        description: &str,
    ) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        let account = ledger
            .find_account_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))?;
        account.withdraw(amount, description, self.ids.as_mut())?;
        tracing::debug!(%number, %amount, "withdrawal accepted");
        Ok(())
    }

    pub fn transfer(
        &mut self,
        ledger: &mut Ledger,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Money,
        description: &str,
    ) -> LedgerResult<()> {
        ledger.execute_transfer(from, to, amount, description, self.ids.as_mut())
    }

    /// Applies one month of interest to a savings account and returns the
    /// credited amount. Intended to be driven by an external scheduler.
    pub fn apply_monthly_interest(
        &mut self,
        ledger: &mut Ledger,
        number: &AccountNumber,
    ) -> LedgerResult<Money> {
        let account = ledger
            .find_account_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))?;
        let credited = account.apply_monthly_interest(self.ids.as_mut())?;
        tracing::debug!(%number, %credited, "interest applied");
        Ok(credited)
    }

    /// Full chronological history of an account.
    pub fn transaction_history<'a>(
        &self,
        ledger: &'a Ledger,
        number: &AccountNumber,
    ) -> LedgerResult<&'a [Transaction]> {
        ledger
            .find_account(number)
            .map(|acc| acc.transactions())
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))
    }

    /// The last `count` transactions of an account, chronological.
    pub fn recent_transactions<'a>(
        &self,
        ledger: &'a Ledger,
        number: &AccountNumber,
        count: usize,
    ) -> LedgerResult<&'a [Transaction]> {
        ledger
            .find_account(number)
            .map(|acc| acc.recent_transactions(count))
            .ok_or_else(|| LedgerError::AccountNotFound(number.clone()))
    }

    /// Global audit lookup of a single transaction by id.
    pub fn find_transaction<'a>(
        &self,
        ledger: &'a Ledger,
        id: TransactionId,
    ) -> LedgerResult<&'a Transaction> {
        ledger
            .find_transaction(id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}
