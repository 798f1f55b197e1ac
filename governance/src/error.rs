use rust_decimal::Decimal;
use stakeview_types::{OperatorAddress, VoteOption};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("validator {0} not found")]
    UnknownValidator(OperatorAddress),
}

/// Why a single vote row could not be decoded.
///
/// Decode failures are local: the voter is treated as having no current vote
/// and the rest of the tally proceeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoteDecodeError {
    #[error("unrecognized vote option {0:?}")]
    UnknownOption(String),

    #[error("weighted vote has no options")]
    Empty,

    #[error("option {0} appears more than once in a weighted vote")]
    DuplicateOption(VoteOption),

    #[error("weight {weight:?} for {option} is not a decimal")]
    InvalidWeight { option: VoteOption, weight: String },

    #[error("weight {weight} for {option} is outside (0, 1]")]
    WeightOutOfRange { option: VoteOption, weight: Decimal },

    #[error("weights sum to {0}, expected 1")]
    WeightSum(Decimal),
}
