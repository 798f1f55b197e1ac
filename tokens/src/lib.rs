//! Token metadata for display: exchange rates, symbols and logos.
//!
//! - [`PriceFeedClient`] talks to the price feed over HTTP
//! - [`DenomCache`] memoizes denom → search symbol and symbol → logo, with an explicit `clear()`
//! - [`TokenSource`] is the seam the API layer depends on

pub mod cache;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use cache::DenomCache;
pub use client::PriceFeedClient;
pub use error::TokenError;
pub use source::{PriceFeedTokenSource, StaticTokenSource, TokenSource};
pub use types::{ExchangeRate, TokenInfo};
