//! Bech32-style address newtypes.
//!
//! Delegators, voters and self-delegate accounts are [`AccountAddress`]es;
//! validators are identified by their [`OperatorAddress`]. The two are kept
//! distinct so a join can never compare an account against an operator by
//! accident.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::StakeviewError;

/// An account address (delegator, voter, validator self-delegate account).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Create an account address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty. Use [`str::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.trim().is_empty(), "account address must not be empty");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = StakeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(StakeviewError::InvalidAddress(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = StakeviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountAddress> for String {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

/// A validator operator address (`...valoper1...`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperatorAddress(String);

impl OperatorAddress {
    /// Create an operator address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty. Use [`str::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.trim().is_empty(), "operator address must not be empty");
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OperatorAddress {
    type Err = StakeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(StakeviewError::InvalidAddress(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for OperatorAddress {
    type Error = StakeviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OperatorAddress> for String {
    fn from(addr: OperatorAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let addr: AccountAddress = "  cosmos1abc ".parse().unwrap();
        assert_eq!(addr.as_str(), "cosmos1abc");
    }

    #[test]
    fn empty_address_rejected() {
        assert!("".parse::<AccountAddress>().is_err());
        assert!("   ".parse::<OperatorAddress>().is_err());
    }

    #[test]
    fn serde_rejects_empty_operator() {
        let result: Result<OperatorAddress, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn serde_is_transparent_string() {
        let addr = OperatorAddress::new("cosmosvaloper1xyz");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"cosmosvaloper1xyz\"");
    }
}
