//! HTTP client for the price feed and asset registry.

use crate::error::TokenError;
use crate::types::ExchangeRate;

use serde::Deserialize;
use std::time::Duration;

/// Default timeout for price feed requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the price feed API.
///
/// `GET {base}/price_feed_api/tokens/` lists exchange rates and
/// `GET {base}/skychart/v1/asset/{symbol}` resolves a logo.
#[derive(Clone)]
pub struct PriceFeedClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    /// Served for `osmo` when the registry has no svg logo for it.
    osmo_logo_url: Option<String>,
}

/// Subset of the asset registry response we read.
#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(default, rename = "logo_URIs")]
    logo_uris: Option<LogoUris>,
}

#[derive(Debug, Deserialize)]
struct LogoUris {
    #[serde(default)]
    svg: Option<String>,
}

impl PriceFeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            osmo_logo_url: None,
        }
    }

    pub fn with_osmo_logo(mut self, url: Option<String>) -> Self {
        self.osmo_logo_url = url;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/price_feed_api/tokens/`
    pub async fn exchange_rates(&self) -> Result<Vec<ExchangeRate>, TokenError> {
        let url = format!("{}/price_feed_api/tokens/", self.base_url);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TokenError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            TokenError::InvalidResponse(format!("failed to parse exchange rates: {e}"))
        })
    }

    /// Logo for `symbol`, or `None` when the registry has none.
    ///
    /// A non-success status is not an error: most symbols simply have no
    /// registry entry.
    pub async fn token_logo(&self, symbol: &str) -> Result<Option<String>, TokenError> {
        let url = format!("{}/skychart/v1/asset/{}", self.base_url, symbol);
        let response = self.http_client.get(&url).send().await?;

        let logo = if response.status().is_success() {
            let asset: AssetResponse = response.json().await.map_err(|e| {
                TokenError::InvalidResponse(format!("failed to parse asset {symbol}: {e}"))
            })?;
            logo_from_asset(asset)
        } else {
            None
        };
        Ok(logo.or_else(|| self.fallback_logo(symbol)))
    }

    fn fallback_logo(&self, symbol: &str) -> Option<String> {
        if symbol == "osmo" {
            self.osmo_logo_url.clone()
        } else {
            None
        }
    }
}

fn logo_from_asset(asset: AssetResponse) -> Option<String> {
    asset
        .logo_uris
        .and_then(|uris| uris.svg)
        .filter(|svg| !svg.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = PriceFeedClient::new("https://feed.example/");
        assert_eq!(client.base_url(), "https://feed.example");
    }

    #[test]
    fn osmo_fallback_only_for_osmo() {
        let client = PriceFeedClient::with_timeout("https://feed.example", Duration::from_secs(1))
            .with_osmo_logo(Some("https://logos.example/osmo.svg".to_string()));
        assert_eq!(
            client.fallback_logo("osmo").as_deref(),
            Some("https://logos.example/osmo.svg")
        );
        assert_eq!(client.fallback_logo("atom"), None);
    }

    #[test]
    fn asset_response_deserialization() {
        let json = r#"{"name": "cosmos", "logo_URIs": {"png": "a.png", "svg": "a.svg"}}"#;
        let asset: AssetResponse = serde_json::from_str(json).unwrap();
        assert_eq!(logo_from_asset(asset).as_deref(), Some("a.svg"));

        let empty: AssetResponse = serde_json::from_str(r#"{"logo_URIs": {"svg": ""}}"#).unwrap();
        assert_eq!(logo_from_asset(empty), None);

        let missing: AssetResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(logo_from_asset(missing), None);
    }

    #[test]
    fn exchange_rates_deserialization() {
        let json = r#"[{"symbol": "ATOM", "price": 9.87, "exponent": 6}, {"symbol": "NEW"}]"#;
        let rates: Vec<ExchangeRate> = serde_json::from_str(json).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].exponent, Some(6));
        assert_eq!(rates[1].price, None);
    }
}
