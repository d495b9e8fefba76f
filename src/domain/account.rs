use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::error::{LedgerError, LedgerResult};
use crate::common::ids::{AccountNumber, IdSource, UserId};
use crate::common::money::{InterestRate, Money};
use crate::domain::transaction::{Transaction, TransactionKind};

/// Savings accounts allow at most this many withdrawals per period.
pub const MAX_PERIOD_WITHDRAWALS: u32 = 6;

/// Default minimum balance a savings account must keep (100.0000).
pub const DEFAULT_MINIMUM_BALANCE: Money = Money::from_minor_units(1_000_000);

/// Default penalty charged for exceeding the withdrawal cap (25.0000).
pub const DEFAULT_WITHDRAWAL_PENALTY: Money = Money::from_minor_units(250_000);

/// Variant-specific state and rules of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    /// Standard checking account. May go negative up to the overdraft
    /// limit; the withdrawal counter is informational, there is no cap.
    Checking {
        overdraft_limit: Money,
        withdrawals_this_period: u32,
    },
    /// Savings account with a withdrawal cap, a minimum balance floor,
    /// interest accrual and an excess-withdrawal penalty.
    Savings {
        interest_rate: InterestRate,
        minimum_balance: Money,
        withdrawal_penalty: Money,
        withdrawals_this_period: u32,
    },
}

/// A single bank account: a balance plus the append-only log of the
/// transactions that produced it.
///
/// The balance is only ever mutated through the operations below, each of
/// which appends a matching [`Transaction`] (penalty and interest append an
/// additional one). The owner is stored by id; the owning [`User`] is looked
/// up through the ledger, never referenced directly.
///
/// [`User`]: crate::domain::user::User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    owner: UserId,
    balance: Money,
    active: bool,
    created_at: DateTime<Utc>,
    transactions: Vec<Transaction>,
    kind: AccountKind,
}

impl Account {
    pub fn new_checking(
        number: AccountNumber,
        owner: UserId,
        initial_balance: Money,
        overdraft_limit: Money,
    ) -> Self {
        Self::new(
            number,
            owner,
            initial_balance,
            AccountKind::Checking {
                overdraft_limit,
                withdrawals_this_period: 0,
            },
        )
    }

    /// Savings account with the default minimum balance and penalty.
    pub fn new_savings(
        number: AccountNumber,
        owner: UserId,
        initial_balance: Money,
        interest_rate: InterestRate,
    ) -> Self {
        Self::new(
            number,
            owner,
            initial_balance,
            AccountKind::Savings {
                interest_rate,
                minimum_balance: DEFAULT_MINIMUM_BALANCE,
                withdrawal_penalty: DEFAULT_WITHDRAWAL_PENALTY,
                withdrawals_this_period: 0,
            },
        )
    }

    fn new(number: AccountNumber, owner: UserId, initial_balance: Money, kind: AccountKind) -> Self {
        Self {
            number,
            owner,
            balance: initial_balance,
            active: true,
            created_at: Utc::now(),
            transactions: Vec::new(),
            kind,
        }
    }

    // ----- accessors -----

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    /// Full transaction history, chronological by append.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The last `count` transactions in chronological order (fewer if the
    /// history is shorter).
    pub fn recent_transactions(&self, count: usize) -> &[Transaction] {
        let start = self.transactions.len().saturating_sub(count);
        &self.transactions[start..]
    }

    // ----- mutations -----

    /// Credits `amount` and appends a deposit transaction.
    pub fn deposit(
        &mut self,
        amount: Money,
        description: &str,
        ids: &mut dyn IdSource,
    ) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        if !self.active {
            return Err(LedgerError::AccountClosed(self.number.clone()));
        }

        self.balance += amount;
        self.transactions.push(Transaction::new(
            ids.transaction_id(),
            TransactionKind::Deposit,
            None,
            Some(self.number.clone()),
            amount,
            description,
        ));
        Ok(())
    }

    /// Debits `amount` if the variant's eligibility rule allows it, appends
    /// a withdrawal transaction, then runs the variant's post-withdrawal
    /// rules (which may append further transactions).
    pub fn withdraw(
        &mut self,
        amount: Money,
        description: &str,
        ids: &mut dyn IdSource,
    ) -> LedgerResult<()> {
        self.check_withdrawal(amount)?;

        self.balance -= amount;
        self.transactions.push(Transaction::new(
            ids.transaction_id(),
            TransactionKind::Withdrawal,
            Some(self.number.clone()),
            None,
            amount,
            description,
        ));
        self.apply_kind_rules(ids);
        Ok(())
    }

    /// Debits `amount` and records a transfer-out referencing `to`.
    ///
    /// This is only half of a transfer: it does not credit the destination.
    /// [`Ledger::execute_transfer`] pairs it with [`Account::receive_transfer`]
    /// on the other account inside a single critical section.
    ///
    /// [`Ledger::execute_transfer`]: crate::domain::ledger::Ledger::execute_transfer
    pub fn transfer_out(
        &mut self,
        amount: Money,
        to: &AccountNumber,
        description: &str,
        ids: &mut dyn IdSource,
    ) -> LedgerResult<()> {
        self.check_withdrawal(amount)?;

        self.balance -= amount;
        self.transactions.push(Transaction::new(
            ids.transaction_id(),
            TransactionKind::TransferOut,
            Some(self.number.clone()),
            Some(to.clone()),
            amount,
            description,
        ));
        self.apply_kind_rules(ids);
        Ok(())
    }

    /// Unconditional credit from another account. Only the ledger's transfer
    /// coordinator calls this; it performs no eligibility check of its own.
    pub fn receive_transfer(
        &mut self,
        amount: Money,
        from: &AccountNumber,
        description: &str,
        ids: &mut dyn IdSource,
    ) {
        self.balance += amount;
        self.transactions.push(Transaction::new(
            ids.transaction_id(),
            TransactionKind::TransferIn,
            Some(from.clone()),
            Some(self.number.clone()),
            amount,
            description,
        ));
    }

    /// Whether a withdrawal of `amount` is allowed right now. Pure.
    ///
    /// Checking: active and `balance + overdraft_limit >= amount`.
    /// Savings: active, under the period withdrawal cap, and the remaining
    /// balance stays at or above the minimum.
    pub fn can_withdraw(&self, amount: Money) -> bool {
        if !self.active {
            return false;
        }
        match &self.kind {
            AccountKind::Checking {
                overdraft_limit, ..
            } => self.balance + *overdraft_limit >= amount,
            AccountKind::Savings {
                minimum_balance,
                withdrawals_this_period,
                ..
            } => {
                *withdrawals_this_period < MAX_PERIOD_WITHDRAWALS
                    && self.balance - amount >= *minimum_balance
            }
        }
    }

    fn check_withdrawal(&self, amount: Money) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        if !self.active {
            return Err(LedgerError::AccountClosed(self.number.clone()));
        }
        if !self.can_withdraw(amount) {
            return Err(LedgerError::WithdrawalNotAllowed(self.number.clone()));
        }
        Ok(())
    }

    /// Variant-specific side effects, run once per successful withdrawal or
    /// transfer-out, never on a credit.
    fn apply_kind_rules(&mut self, ids: &mut dyn IdSource) {
        match &mut self.kind {
            AccountKind::Checking {
                withdrawals_this_period,
                ..
            } => {
                *withdrawals_this_period += 1;
            }
            AccountKind::Savings {
                withdrawal_penalty,
                withdrawals_this_period,
                ..
            } => {
                *withdrawals_this_period += 1;

                // The eligibility gate already blocks the withdrawal that
                // would push the counter past the cap, so this branch cannot
                // fire unless the cap check changes.
                if *withdrawals_this_period > MAX_PERIOD_WITHDRAWALS {
                    let penalty = *withdrawal_penalty;
                    self.balance -= penalty;
                    self.transactions.push(Transaction::new(
                        ids.transaction_id(),
                        TransactionKind::Penalty,
                        Some(self.number.clone()),
                        None,
                        penalty,
                        "Excess withdrawal penalty",
                    ));
                }
            }
        }
    }

    /// Credits one month of interest and appends an interest transaction.
    /// Returns the credited amount. Fails on non-savings accounts; an
    /// external period scheduler decides when to call this.
    pub fn apply_monthly_interest(&mut self, ids: &mut dyn IdSource) -> LedgerResult<Money> {
        let AccountKind::Savings { interest_rate, .. } = &self.kind else {
            return Err(LedgerError::NotASavingsAccount(self.number.clone()));
        };

        let interest = interest_rate.monthly_interest_on(self.balance);
        // A zero-interest month leaves no record; transaction amounts are
        // always positive.
        if interest.is_positive() {
            self.balance += interest;
            self.transactions.push(Transaction::new(
                ids.transaction_id(),
                TransactionKind::Interest,
                None,
                Some(self.number.clone()),
                interest,
                "Monthly interest credit",
            ));
        }
        Ok(interest)
    }

    /// Deactivates the account. Idempotent; a closed account rejects all
    /// further deposits, withdrawals and transfers.
    pub fn close(&mut self) {
        self.active = false;
    }

    /// Zeroes the period withdrawal counter. Called by the external period
    /// scheduler at each rollover.
    pub fn reset_period_withdrawals(&mut self) {
        match &mut self.kind {
            AccountKind::Checking {
                withdrawals_this_period,
                ..
            }
            | AccountKind::Savings {
                withdrawals_this_period,
                ..
            } => *withdrawals_this_period = 0,
        }
    }

    /// Adjusts the overdraft limit on a checking account. Negative limits
    /// are rejected, as is calling this on a savings account.
    pub fn set_overdraft_limit(&mut self, limit: Money) -> LedgerResult<()> {
        if limit.is_negative() {
            return Err(LedgerError::NegativeParameter("overdraft limit"));
        }
        match &mut self.kind {
            AccountKind::Checking {
                overdraft_limit, ..
            } => {
                *overdraft_limit = limit;
                Ok(())
            }
            AccountKind::Savings { .. } => {
                Err(LedgerError::WithdrawalNotAllowed(self.number.clone()))
            }
        }
    }

    /// Adjusts the excess-withdrawal penalty on a savings account.
    pub fn set_withdrawal_penalty(&mut self, penalty: Money) -> LedgerResult<()> {
        if penalty.is_negative() {
            return Err(LedgerError::NegativeParameter("withdrawal penalty"));
        }
        match &mut self.kind {
            AccountKind::Savings {
                withdrawal_penalty, ..
            } => {
                *withdrawal_penalty = penalty;
                Ok(())
            }
            AccountKind::Checking { .. } => {
                Err(LedgerError::NotASavingsAccount(self.number.clone()))
            }
        }
    }
}
