//! The token metadata seam the API layer depends on.

use crate::cache::DenomCache;
use crate::client::PriceFeedClient;
use crate::error::TokenError;
use crate::types::TokenInfo;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves display metadata for a denom.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token_info(&self, denom: &str) -> Result<TokenInfo, TokenError>;
}

/// [`TokenSource`] backed by the price feed, memoizing through a shared
/// [`DenomCache`].
pub struct PriceFeedTokenSource {
    client: PriceFeedClient,
    cache: Arc<DenomCache>,
}

impl PriceFeedTokenSource {
    pub fn new(client: PriceFeedClient, cache: Arc<DenomCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<DenomCache> {
        &self.cache
    }

    async fn logo(&self, symbol: &str) -> Option<String> {
        if let Some(logo) = self.cache.logo(symbol) {
            return Some(logo);
        }
        match self.client.token_logo(symbol).await {
            Ok(Some(logo)) => {
                self.cache.set_logo(symbol, logo.clone());
                Some(logo)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "logo lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl TokenSource for PriceFeedTokenSource {
    async fn token_info(&self, denom: &str) -> Result<TokenInfo, TokenError> {
        let search = self.cache.search_symbol(denom);
        let rates = self.client.exchange_rates().await?;
        let rate = rates
            .into_iter()
            .find(|rate| rate.symbol.to_lowercase() == search);
        let logo = self.logo(&search).await;

        Ok(TokenInfo {
            denom: denom.to_string(),
            symbol: rate.as_ref().map(|r| r.symbol.clone()),
            price: rate.as_ref().and_then(|r| r.price),
            exponent: rate.as_ref().and_then(|r| r.exponent),
            logo,
        })
    }
}

/// A fixed denom → info table.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenSource {
    tokens: HashMap<String, TokenInfo>,
}

impl StaticTokenSource {
    pub fn new(tokens: impl IntoIterator<Item = TokenInfo>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| (t.denom.clone(), t)).collect(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token_info(&self, denom: &str) -> Result<TokenInfo, TokenError> {
        self.tokens
            .get(denom)
            .cloned()
            .ok_or_else(|| TokenError::UnknownSymbol(denom.to_string()))
    }
}
