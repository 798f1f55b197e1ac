//! Axum-based HTTP server.

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers::{self, AppState};
use crate::RpcError;

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/gov/proposals/:id/validators", get(handlers::proposal_validators))
        .route(
            "/gov/proposals/:id/validators/:operator",
            get(handlers::proposal_validator),
        )
        .route("/gov/proposals/:id/votes", get(handlers::proposal_votes))
        .route("/validators/:operator", get(handlers::validator_info))
        .route("/accounts/:address/votes", get(handlers::account_votes))
        .route(
            "/accounts/:address/delegations",
            get(handlers::account_delegations),
        )
        .route("/staking/pool", get(handlers::staking_pool))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct ApiServer {
    bind_address: String,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(bind_address: impl Into<String>, state: Arc<AppState>) -> Self {
        Self {
            bind_address: bind_address.into(),
            state,
        }
    }

    /// Serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);
        let listener = tokio::net::TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.bind_address)))?;
        tracing::info!(address = %self.bind_address, "API server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
