//! stakeview daemon: serves the governance attribution API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use stakeview_nullables::{MemoryRecordStore, RecordSnapshot};
use stakeview_rpc::{ApiConfig, ApiServer, AppState, GovernanceService, ResponseAssembler};
use stakeview_tokens::{DenomCache, PriceFeedClient, PriceFeedTokenSource, TokenSource};
use stakeview_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "stakeview", about = "Governance vote attribution API")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "STAKEVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, env = "STAKEVIEW_HOST")]
    host: Option<String>,

    #[arg(long, env = "STAKEVIEW_PORT")]
    port: Option<u16>,

    /// JSON snapshot of delegation, vote and validator rows to serve from.
    #[arg(long, env = "STAKEVIEW_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "STAKEVIEW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "STAKEVIEW_LOG_FORMAT")]
    log_format: Option<String>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ApiConfig> {
        let mut config = match &self.config {
            Some(path) => ApiConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ApiConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(snapshot) = &self.snapshot {
            config.snapshot_path = Some(snapshot.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

fn load_store(config: &ApiConfig) -> anyhow::Result<MemoryRecordStore> {
    match &config.snapshot_path {
        Some(path) => {
            let snapshot = RecordSnapshot::from_json_file(path)
                .with_context(|| format!("loading snapshot from {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                delegations = snapshot.delegations.len(),
                votes = snapshot.votes.len(),
                validators = snapshot.validators.len(),
                "snapshot loaded"
            );
            Ok(MemoryRecordStore::from_snapshot(snapshot))
        }
        None => {
            tracing::warn!("no snapshot configured, serving an empty store");
            Ok(MemoryRecordStore::new())
        }
    }
}

/// Build the price-feed token source and start the cache clearing task.
fn token_source(config: &ApiConfig) -> Option<Arc<dyn TokenSource>> {
    let feed = &config.price_feed;
    if !feed.enabled {
        tracing::info!("price feed disabled");
        return None;
    }

    let client = PriceFeedClient::with_timeout(feed.base_url.clone(), Duration::from_secs(feed.timeout_secs))
        .with_osmo_logo(feed.osmo_logo_url.clone());
    let cache = Arc::new(DenomCache::new(feed.native_u_tokens.iter().cloned()));

    if feed.cache_ttl_secs > 0 {
        let cache = Arc::clone(&cache);
        let period = Duration::from_secs(feed.cache_ttl_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.clear();
            }
        });
    }

    tracing::info!(base_url = %feed.base_url, ttl_secs = feed.cache_ttl_secs, "price feed enabled");
    Some(Arc::new(PriceFeedTokenSource::new(client, cache)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level);

    let store = Arc::new(load_store(&config)?);
    let state = AppState {
        service: GovernanceService::new(store, config.active_set_size),
        assembler: ResponseAssembler::from_config(&config),
        tokens: token_source(&config),
        bond_denom: config.bond_denom.clone(),
    };

    tracing::info!(
        chain = %config.chain_name,
        active_set_size = config.active_set_size,
        bond_denom = %config.bond_denom,
        "starting stakeview"
    );
    ApiServer::new(config.bind_address(), Arc::new(state))
        .start(shutdown_signal())
        .await?;

    tracing::info!("stakeview exited cleanly");
    Ok(())
}
