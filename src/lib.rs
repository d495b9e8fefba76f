//! An in-process banking ledger: users, the accounts they own, and the
//! transactions that mutate account balances.
//!
//! The [`domain::ledger::Ledger`] is the single aggregate owning all state.
//! It is a plain value graph: every mutating operation takes `&mut self`, so
//! read-then-write balance sequences (including the two-account transfer) are
//! exclusive by construction. Embedders that need cross-thread access wrap
//! the ledger in one `Mutex` or hand it to a single-writer actor.

pub mod common;
pub mod domain;
pub mod services;

pub use common::error::{LedgerError, LedgerResult};
pub use common::ids::{AccountNumber, IdSource, TransactionId, UserId, UuidIdSource};
pub use common::money::{InterestRate, Money};
pub use domain::account::{Account, AccountKind};
pub use domain::ledger::Ledger;
pub use domain::transaction::{Transaction, TransactionKind, TransactionStatus};
pub use domain::user::{Admin, User};
pub use services::account_service::AccountService;
pub use services::transaction_service::TransactionService;
