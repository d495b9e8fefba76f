use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::ids::{AccountNumber, TransactionId};
use crate::common::money::Money;

/// What kind of balance-affecting event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
    Interest,
    Penalty,
}

/// Outcome recorded on a transaction. Only successful mutations are logged,
/// so this carries a single variant; failed operations leave no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
}

/// An immutable record of one balance-affecting event.
///
/// Deposits and interest credits carry only a destination; withdrawals and
/// penalties carry only a source; transfers carry both ends. Fields are
/// private and there are no setters: once appended to an account's history a
/// transaction never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    source: Option<AccountNumber>,
    destination: Option<AccountNumber>,
    amount: Money,
    kind: TransactionKind,
    description: String,
    created_at: DateTime<Utc>,
    status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        source: Option<AccountNumber>,
        destination: Option<AccountNumber>,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            amount,
            kind,
            description: description.into(),
            created_at: Utc::now(),
            status: TransactionStatus::Success,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn source(&self) -> Option<&AccountNumber> {
        self.source.as_ref()
    }

    pub fn destination(&self) -> Option<&AccountNumber> {
        self.destination.as_ref()
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }
}
