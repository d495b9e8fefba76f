use bigdecimal::BigDecimal;
use bigdecimal::ParseBigDecimalError;
use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::common::error::{LedgerError, LedgerResult};

const SCALE: i64 = 10_000;

/// Maximum permitted annual interest rate, in basis points (5%).
pub const INTEREST_RATE_CAP_BPS: u32 = 500;

/// A monetary value in minor units with 4 decimal places of precision.
///
/// Storing money as an integer avoids the rounding drift that floating-point
/// currency accumulates under repeated interest and penalty operations, and
/// makes conservation checks (debits == credits across a transfer) exact.
///
/// # Examples
/// ```
/// use bankledger::common::money::Money;
///
/// let amount: Money = "1.2500".parse().unwrap();
/// assert_eq!(amount.as_minor_units(), 12_500);
/// assert_eq!(amount.to_string(), "1.2500");
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_minor_units(value: i64) -> Self {
        Money(value)
    }

    pub const fn zero() -> Self {
        Money(0)
    }

    pub const fn as_minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::str::FromStr for Money {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ParseBigDecimalError::Other("empty amount".into()));
        }

        let bd: BigDecimal = t.parse()?;

        // Scale to 4 decimal places
        let scaled = (bd * BigDecimal::from(SCALE)).round(0);
        let value: i64 = scaled
            .to_i64()
            .ok_or_else(|| ParseBigDecimalError::Other("amount overflow".into()))?;

        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bd = BigDecimal::from(self.0) / BigDecimal::from(SCALE);
        write!(f, "{:.4}", bd)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Annual interest rate in basis points (1 bps = 0.01%).
///
/// Construction fails outright when the rate exceeds
/// [`INTEREST_RATE_CAP_BPS`]; rates are never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestRate(u32);

impl InterestRate {
    pub fn new(basis_points: u32) -> LedgerResult<Self> {
        if basis_points > INTEREST_RATE_CAP_BPS {
            return Err(LedgerError::RateAboveCap {
                rate_bps: basis_points,
                cap_bps: INTEREST_RATE_CAP_BPS,
            });
        }
        Ok(InterestRate(basis_points))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// One month's interest on `balance`: `balance * rate / 12`, computed in
    /// integer math and rounded half away from zero.
    pub fn monthly_interest_on(&self, balance: Money) -> Money {
        let numer = balance.as_minor_units() as i128 * self.0 as i128;
        let denom: i128 = 10_000 * 12;
        let half = denom / 2;
        let rounded = if numer >= 0 {
            (numer + half) / denom
        } else {
            (numer - half) / denom
        };
        Money::from_minor_units(rounded as i64)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn zero_and_minor_units() {
        assert_eq!(Money::zero(), Money(0));
        assert_eq!(Money(12345).as_minor_units(), 12345);
        assert_eq!(Money(-999).as_minor_units(), -999);
    }

    #[test]
    fn from_str_valid() {
        assert_eq!(Money::from_str("1").unwrap(), Money(10000));
        assert_eq!(Money::from_str("1.5").unwrap(), Money(15000));
        assert_eq!(Money::from_str("1.2345").unwrap(), Money(12345));
        assert_eq!(Money::from_str("0.0001").unwrap(), Money(1));
        assert_eq!(Money::from_str("  2.0000 ").unwrap(), Money(20000));
        assert_eq!(Money::from_str("-20").unwrap(), Money(-200000));
    }

    #[test]
    fn from_str_rounds_to_four_places() {
        assert_eq!(Money::from_str("1.99999").unwrap(), Money(20000));
        assert_eq!(Money::from_str("0.00001").unwrap(), Money(0));
    }

    #[test]
    fn from_str_invalid() {
        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("   ").is_err());
        assert!(Money::from_str("abc").is_err());
    }

    #[test]
    fn display_four_places() {
        assert_eq!(Money(10000).to_string(), "1.0000");
        assert_eq!(Money(12345).to_string(), "1.2345");
        assert_eq!(Money(1).to_string(), "0.0001");
        assert_eq!(Money(0).to_string(), "0.0000");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Money(10000) + Money(5000), Money(15000));
        assert_eq!(Money(15000) - Money(5000), Money(10000));
        assert_eq!(Money(100) - Money(100), Money::zero());

        let mut m = Money(10000);
        m += Money(5000);
        assert_eq!(m, Money(15000));
        m -= Money(5000);
        assert_eq!(m, Money(10000));
    }

    #[test]
    fn ordering_and_sign() {
        assert!(Money(10000) < Money(15000));
        assert!(Money(10000) >= Money(10000));
        assert!(Money(1).is_positive());
        assert!(!Money(0).is_positive());
        assert!(Money(-1).is_negative());
    }

    #[test]
    fn interest_rate_cap_is_a_hard_failure() {
        assert!(InterestRate::new(500).is_ok());
        let err = InterestRate::new(501).unwrap_err();
        assert_eq!(
            err,
            LedgerError::RateAboveCap {
                rate_bps: 501,
                cap_bps: 500
            }
        );
    }

    #[test]
    fn monthly_interest_is_exact_for_even_divisions() {
        // 500.0000 at 3% annual -> 1.2500 per month.
        let rate = InterestRate::new(300).unwrap();
        let balance = Money::from_str("500").unwrap();
        assert_eq!(
            rate.monthly_interest_on(balance),
            Money::from_str("1.25").unwrap()
        );
    }

    #[test]
    fn monthly_interest_rounds_half_away_from_zero() {
        // 1.0000 at 0.06% annual: 10000 * 6 / 120000 = 0.5 minor units -> 1.
        let rate = InterestRate::new(6).unwrap();
        assert_eq!(rate.monthly_interest_on(Money(10000)), Money(1));
        assert_eq!(rate.monthly_interest_on(Money(-10000)), Money(-1));
    }

    #[test]
    fn interest_rate_display() {
        assert_eq!(InterestRate::new(300).unwrap().to_string(), "3.00%");
        assert_eq!(InterestRate::new(25).unwrap().to_string(), "0.25%");
    }
}
