//! Stake amounts in the bond denom's smallest unit.
//!
//! Amounts are integers (u128). Weighted-vote shares are fractional, so the
//! tally converts stakes into [`Decimal`] before multiplying by a weight.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::StakeviewError;

/// An amount of bonded stake, in raw units of the bond denom.
///
/// Serialized as a decimal string (the indexer emits amounts as strings);
/// deserialization also accepts a non-negative JSON integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StakeAmount(u128);

impl StakeAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Strictly positive stakes are the only ones that count as active delegations.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Convert to a [`Decimal`], saturating at `Decimal::MAX`.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_u128(self.0).unwrap_or(Decimal::MAX)
    }
}

/// Saturates at `u128::MAX`.
impl Add for StakeAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

/// Saturates at zero.
impl Sub for StakeAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl Sum for StakeAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a StakeAmount> for StakeAmount {
    fn sum<I: Iterator<Item = &'a StakeAmount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<u128> for StakeAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl From<u64> for StakeAmount {
    fn from(raw: u64) -> Self {
        Self(raw as u128)
    }
}

impl FromStr for StakeAmount {
    type Err = StakeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Self)
            .map_err(|_| StakeviewError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for StakeAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StakeAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StakeVisitor;

        impl Visitor<'_> for StakeVisitor {
            type Value = StakeAmount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or an integer string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StakeAmount, E> {
                Ok(StakeAmount(v as u128))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<StakeAmount, E> {
                Ok(StakeAmount(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StakeAmount, E> {
                u128::try_from(v)
                    .map(StakeAmount)
                    .map_err(|_| E::custom(format!("negative stake amount: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StakeAmount, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string_and_number() {
        let a: StakeAmount = serde_json::from_str("\"1000\"").unwrap();
        let b: StakeAmount = serde_json::from_str("1000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.raw(), 1000);
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(serde_json::from_str::<StakeAmount>("-5").is_err());
        assert!(serde_json::from_str::<StakeAmount>("\"-5\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&StakeAmount::new(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn to_decimal_saturates() {
        assert_eq!(StakeAmount::new(60).to_decimal(), Decimal::from(60u64));
        assert_eq!(StakeAmount::new(u128::MAX).to_decimal(), Decimal::MAX);
    }

    #[test]
    fn operators_saturate() {
        assert_eq!(StakeAmount::new(5) - StakeAmount::new(9), StakeAmount::ZERO);
        assert_eq!(StakeAmount::new(u128::MAX) + StakeAmount::new(1), StakeAmount::new(u128::MAX));
        assert_eq!(StakeAmount::new(9) - StakeAmount::new(5), StakeAmount::new(4));
    }

    #[test]
    fn sum_saturates() {
        let total: StakeAmount = [StakeAmount::new(u128::MAX), StakeAmount::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total.raw(), u128::MAX);
    }
}
