//! Fundamental types for stakeview.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account and operator addresses, revision heights, proposal ids, stake amounts,
//! transaction hashes, and governance vote options.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod height;
pub mod vote;

pub use address::{AccountAddress, OperatorAddress};
pub use amount::StakeAmount;
pub use error::StakeviewError;
pub use hash::TxHash;
pub use height::{Height, ProposalId};
pub use vote::VoteOption;
