//! HTTP API for the governance tally.
//!
//! Provides endpoints for:
//! - Per-validator attribution of a proposal's votes (proposal-wide and single)
//! - Proposal vote summaries
//! - Validator standing
//! - An account's current votes
//! - Staking pool totals with token metadata

pub mod assembler;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;
pub mod service;

pub use assembler::ResponseAssembler;
pub use config::{ApiConfig, PriceFeedConfig};
pub use error::RpcError;
pub use handlers::AppState;
pub use server::{router, ApiServer};
pub use service::GovernanceService;
