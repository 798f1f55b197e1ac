//! Price feed payloads and the token info handed to callers.

use serde::{Deserialize, Serialize};

/// One entry of `GET /price_feed_api/tokens/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub symbol: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub exponent: Option<u32>,
}

/// Display metadata for a denom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub denom: String,
    /// Symbol as reported by the price feed, `None` when the feed has no rate.
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub exponent: Option<u32>,
    pub logo: Option<String>,
}
