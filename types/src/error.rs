//! Top-level error type shared across crates.

use thiserror::Error;

/// Parse and validation errors for the fundamental types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakeviewError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid stake amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("unknown vote option: {0:?}")]
    UnknownVoteOption(String),

    #[error("invalid proposal id: {0:?}")]
    InvalidProposalId(String),
}
