//! Raw revisioned rows as the indexer writes them.

use serde::{Deserialize, Serialize};
use stakeview_types::{AccountAddress, Height, OperatorAddress, ProposalId, StakeAmount, TxHash};

/// One revision of a (delegator, validator) stake.
///
/// A record with a zero `stake_amount` is a full undelegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub delegator_address: AccountAddress,
    pub operator_address: OperatorAddress,
    pub stake_amount: StakeAmount,
    pub height: Height,
}

/// One revision of a voter's vote on a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: AccountAddress,
    pub proposal_id: ProposalId,
    pub option: RawVoteOption,
    pub height: Height,
    pub tx_hash: TxHash,
}

/// The undecoded `option` column of a vote row.
///
/// Either a single option code (`"VOTE_OPTION_YES"`) or a weighted vote
/// (`[{"option": "VOTE_OPTION_YES", "weight": "0.6"}, ...]`). Decoding and
/// validation happen in the governance crate so one bad row never fails a
/// whole query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVoteOption {
    Single(String),
    Weighted(Vec<RawWeightedOption>),
}

impl RawVoteOption {
    pub fn single(option: impl Into<String>) -> Self {
        Self::Single(option.into())
    }

    pub fn weighted<O, W>(pairs: impl IntoIterator<Item = (O, W)>) -> Self
    where
        O: Into<String>,
        W: Into<String>,
    {
        Self::Weighted(
            pairs
                .into_iter()
                .map(|(option, weight)| RawWeightedOption {
                    option: option.into(),
                    weight: weight.into(),
                })
                .collect(),
        )
    }
}

/// One `(option, weight)` entry of a weighted vote. `weight` is a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWeightedOption {
    pub option: String,
    pub weight: String,
}

/// One revision of a validator's descriptive metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescriptor {
    pub operator_address: OperatorAddress,
    /// The account the operator self-delegates from. `None` when the indexer
    /// could not resolve it.
    #[serde(default)]
    pub self_delegate_address: Option<AccountAddress>,
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub consensus_address: Option<String>,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub height: Height,
}

impl ValidatorDescriptor {
    /// A descriptor carrying only the operator address, for validators seen in
    /// delegation rows but missing from the descriptor table.
    pub fn bare(operator_address: OperatorAddress) -> Self {
        Self {
            operator_address,
            self_delegate_address: None,
            moniker: String::new(),
            consensus_address: None,
            identity: None,
            website: None,
            details: None,
            height: Height::ZERO,
        }
    }
}
