//! Governance vote options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::StakeviewError;

/// A governance vote option.
///
/// Variants are declared in on-chain code order (1..=4), which is also the
/// canonical order used to break ties between equally weighted options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    #[serde(rename = "VOTE_OPTION_YES")]
    Yes,
    #[serde(rename = "VOTE_OPTION_ABSTAIN")]
    Abstain,
    #[serde(rename = "VOTE_OPTION_NO")]
    No,
    #[serde(rename = "VOTE_OPTION_NO_WITH_VETO")]
    NoWithVeto,
}

impl VoteOption {
    /// All options in canonical order.
    pub const ALL: [VoteOption; 4] = [Self::Yes, Self::Abstain, Self::No, Self::NoWithVeto];

    /// On-chain numeric code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::Abstain => 2,
            Self::No => 3,
            Self::NoWithVeto => 4,
        }
    }

    /// Wire name as emitted by the chain, e.g. `VOTE_OPTION_YES`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Yes => "VOTE_OPTION_YES",
            Self::Abstain => "VOTE_OPTION_ABSTAIN",
            Self::No => "VOTE_OPTION_NO",
            Self::NoWithVeto => "VOTE_OPTION_NO_WITH_VETO",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Yes),
            2 => Some(Self::Abstain),
            3 => Some(Self::No),
            4 => Some(Self::NoWithVeto),
            _ => None,
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Accepts the wire name, the short name (case-insensitive) or the numeric code.
/// `VOTE_OPTION_UNSPECIFIED` and `0` are rejected.
impl FromStr for VoteOption {
    type Err = StakeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| StakeviewError::UnknownVoteOption(s.to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        let short = upper.strip_prefix("VOTE_OPTION_").unwrap_or(&upper);
        match short {
            "YES" => Ok(Self::Yes),
            "ABSTAIN" => Ok(Self::Abstain),
            "NO" => Ok(Self::No),
            "NO_WITH_VETO" | "NOWITHVETO" => Ok(Self::NoWithVeto),
            _ => Err(StakeviewError::UnknownVoteOption(s.to_string())),
        }
    }
}
