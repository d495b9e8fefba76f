use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::ids::{AccountNumber, UserId};
use crate::common::money::Money;
use crate::domain::account::{Account, AccountKind};

/// A bank customer: identity plus the accounts they own, in creation order.
///
/// Usernames are unique across the ledger; the ledger enforces that at
/// registration. Users are never deleted in normal operation, only via a
/// full ledger reset. Credential material lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    display_name: String,
    created_at: DateTime<Utc>,
    accounts: Vec<Account>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
            accounts: Vec::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account_by_number(&self, number: &AccountNumber) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.number() == number)
    }

    pub fn checking_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts
            .iter()
            .filter(|acc| matches!(acc.kind(), AccountKind::Checking { .. }))
    }

    pub fn savings_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts
            .iter()
            .filter(|acc| matches!(acc.kind(), AccountKind::Savings { .. }))
    }

    /// Sum of all account balances.
    pub fn total_balance(&self) -> Money {
        self.accounts
            .iter()
            .fold(Money::zero(), |sum, acc| sum + acc.balance())
    }

    // Attachment stays crate-internal so the ledger's global
    // account-number uniqueness check cannot be bypassed.
    pub(crate) fn attach(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub(crate) fn account_by_number_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|acc| acc.number() == number)
    }
}

/// The single administrator record. Grants read-only visibility over all
/// users and accounts through the ledger's aggregate accessors; carries no
/// accounts of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    id: UserId,
    username: String,
    display_name: String,
}

impl Admin {
    pub fn new(id: UserId, username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::common::ids::{IdSource, UuidIdSource};
    use crate::common::money::InterestRate;

    #[test]
    fn accounts_keep_creation_order_and_kind_filters_work() {
        let mut ids = UuidIdSource;
        let mut user = User::new(ids.user_id(), "alice", "Alice Example");

        let chk = Account::new_checking(
            AccountNumber::from("ACC-1"),
            user.id(),
            Money::from_str("10").unwrap(),
            Money::zero(),
        );
        let sav = Account::new_savings(
            AccountNumber::from("ACC-2"),
            user.id(),
            Money::from_str("200").unwrap(),
            InterestRate::new(250).unwrap(),
        );
        user.attach(chk);
        user.attach(sav);

        let numbers: Vec<_> = user.accounts().iter().map(|a| a.number().as_str()).collect();
        assert_eq!(numbers, ["ACC-1", "ACC-2"]);
        assert_eq!(user.checking_accounts().count(), 1);
        assert_eq!(user.savings_accounts().count(), 1);
        assert_eq!(user.total_balance(), Money::from_str("210").unwrap());
        assert!(user.account_by_number(&AccountNumber::from("ACC-2")).is_some());
        assert!(user.account_by_number(&AccountNumber::from("ACC-3")).is_none());
    }
}
