//! HTTP server wiring for the Tracklist API.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracklist_core::{TracklistConfig, TracklistError};
use tracklist_search::TrackResolver;

use crate::handlers::{hello, resolve};
use crate::request_log::log_requests;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Resolver shared across requests
    pub resolver: Arc<TrackResolver>,
    /// Fired on server shutdown; every resolve call derives a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates state around a resolver.
    pub fn new(resolver: TrackResolver, shutdown: CancellationToken) -> Self {
        Self {
            resolver: Arc::new(resolver),
            shutdown,
        }
    }
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum WebError {
    /// Listener address could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address the listener tried to bind
        address: String,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Accept loop failed while serving
    #[error("Server error: {0}")]
    Serve(std::io::Error),

    /// Configuration or HTTP client setup failed
    #[error(transparent)]
    Config(#[from] TracklistError),
}

/// Builds the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/resolve", get(resolve))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the API until `shutdown` fires.
///
/// In-flight resolve calls are cancelled when `shutdown` fires.
///
/// # Errors
/// - `WebError::Config` - invalid configuration or HTTP client setup failure
/// - `WebError::Bind` - listener address unavailable
/// - `WebError::Serve` - accept loop failed
pub async fn run_server(config: TracklistConfig, shutdown: CancellationToken) -> Result<(), WebError> {
    config.validate()?;

    let resolver = TrackResolver::from_config(&config)?;
    let state = AppState::new(resolver, shutdown.clone());
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| WebError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        mode = %config.search.aggregation_mode,
        timeout_ms = config.search.provider_timeout.as_millis() as u64,
        "Tracklist API listening on http://{address}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(WebError::Serve)?;

    tracing::info!("Tracklist API stopped");
    Ok(())
}
