//! Strongly-typed identifiers and the provider that mints them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

/// Identifier of a single transaction record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty) => {
        impl $t {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

impl_uuid_newtype!(UserId);
impl_uuid_newtype!(TransactionId);

/// Globally-unique account number. The format is opaque to the core;
/// uniqueness is enforced at attachment time by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Provider of fresh identifiers.
///
/// The core consumes ids, it never decides their format. Tests substitute a
/// deterministic source.
pub trait IdSource {
    fn user_id(&mut self) -> UserId;
    fn account_number(&mut self) -> AccountNumber;
    fn transaction_id(&mut self) -> TransactionId;
}

/// Default [`IdSource`] backed by random UUIDs.
///
/// Account numbers are a readable `ACC-` prefix over the first 12 hex digits
/// of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn user_id(&mut self) -> UserId {
        UserId(Uuid::new_v4())
    }

    fn account_number(&mut self) -> AccountNumber {
        let hex = Uuid::new_v4().simple().to_string();
        AccountNumber(format!("ACC-{}", hex[..12].to_ascii_uppercase()))
    }

    fn transaction_id(&mut self) -> TransactionId {
        TransactionId(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_numbers_are_prefixed_and_distinct() {
        let mut ids = UuidIdSource;
        let a = ids.account_number();
        let b = ids.account_number();
        assert!(a.as_str().starts_with("ACC-"));
        assert_eq!(a.as_str().len(), "ACC-".len() + 12);
        assert_ne!(a, b);
    }

    #[test]
    fn transaction_ids_are_distinct() {
        let mut ids = UuidIdSource;
        assert_ne!(ids.transaction_id(), ids.transaction_id());
        assert_ne!(ids.user_id(), ids.user_id());
    }
}
