use crate::common::ids::{AccountNumber, TransactionId, UserId};

/// Result type used across the ledger core.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Every way a ledger operation can fail.
///
/// Failures are reported to the immediate caller, never as a panic; the
/// layer above (a console, an API) is responsible for the user-facing
/// message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("{0} must not be negative")]
    NegativeParameter(&'static str),
    #[error("interest rate {rate_bps} bps exceeds the cap of {cap_bps} bps")]
    RateAboveCap { rate_bps: u32, cap_bps: u32 },
    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("transaction {0} not found")]
    TransactionNotFound(TransactionId),
    #[error("account {0} is closed")]
    AccountClosed(AccountNumber),
    #[error("withdrawal not permitted on account {0}")]
    WithdrawalNotAllowed(AccountNumber),
    #[error("insufficient funds in account {0}")]
    InsufficientFunds(AccountNumber),
    #[error("source and destination accounts are the same")]
    SameAccount,
    #[error("username {0:?} is already taken")]
    DuplicateUsername(String),
    #[error("account number {0} is already registered")]
    DuplicateAccountNumber(AccountNumber),
    #[error("an administrator is already registered")]
    AdminAlreadyRegistered,
    #[error("account {0} is not a savings account")]
    NotASavingsAccount(AccountNumber),
}
