//! API configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::RpcError;

/// Configuration for the reporting API.
///
/// Can be loaded from a TOML file via [`ApiConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Chain name used in avatar URLs.
    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,

    /// Validators ranked at or above this are active.
    #[serde(default = "default_active_set_size")]
    pub active_set_size: usize,

    /// Denom whose token info `/staking/pool` reports.
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,

    /// JSON record snapshot to serve from.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default)]
    pub price_feed: PriceFeedConfig,
}

/// Token metadata settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceFeedConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_price_feed_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How often the denom/logo cache is dropped.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Denoms that start with `u` but are not micro-denominated.
    #[serde(default = "default_native_u_tokens")]
    pub native_u_tokens: Vec<String>,

    /// Logo served for `osmo` when the asset registry has none.
    #[serde(default)]
    pub osmo_logo_url: Option<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chain_name() -> String {
    "cosmos".to_string()
}

fn default_avatar_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_active_set_size() -> usize {
    180
}

fn default_bond_denom() -> String {
    "uatom".to_string()
}

fn default_price_feed_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_native_u_tokens() -> Vec<String> {
    vec!["uni".to_string(), "usdc".to_string(), "usdt".to_string()]
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ApiConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RpcError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            chain_name: default_chain_name(),
            avatar_base_url: default_avatar_base_url(),
            active_set_size: default_active_set_size(),
            bond_denom: default_bond_denom(),
            snapshot_path: None,
            price_feed: PriceFeedConfig::default(),
        }
    }
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_price_feed_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            native_u_tokens: default_native_u_tokens(),
            osmo_logo_url: None,
        }
    }
}
