//! Governance vote tally and validator attribution.
//!
//! Turns the raw, append-only, multiply-revised stream of delegation and vote
//! rows into a de-duplicated, per-validator tally for one proposal:
//!
//! RecordStore rows → [`LatestStateReducer`] → {[`DelegationIndex`], [`VoteIndex`]}
//! → [`ValidatorVoteAttributor`] → [`AttributedValidatorResult`]
//!
//! Everything here is pure and synchronous. Indices are built once per request
//! and then only read, so attribution can fan out across validators freely.

pub mod attribution;
pub mod batch;
pub mod delegation;
pub mod directory;
pub mod error;
pub mod outcome;
pub mod power;
pub mod reducer;
pub mod summary;
pub mod vote;

pub use attribution::{
    attribute, AttributedValidatorResult, OptionAggregate, ValidatorVoteAggregate,
    ValidatorVoteAttributor,
};
pub use batch::{attribute_all, OptionFilter};
pub use delegation::DelegationIndex;
pub use directory::ValidatorDirectory;
pub use error::{GovernanceError, VoteDecodeError};
pub use outcome::{classify, MostVoted};
pub use power::{ValidatorPower, ValidatorPowerTable, ValidatorStanding};
pub use reducer::{LatestStateReducer, Revisioned};
pub use summary::VoteSummary;
pub use vote::{CurrentVote, DecodedOption, VoteIndex};
