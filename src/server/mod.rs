//! HTTP query frontend
//!
//! Exposes the crawler as `GET /graph?url=<seed>&depth=<n>` plus a `/health`
//! liveness probe.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{graph_handler, health_handler, GraphParams, DEFAULT_DEPTH};

use crate::config::Config;
use crate::crawler::Crawler;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// State shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub crawler: Crawler,
    pub config: Arc<Config>,

    /// Cancelled on shutdown; every crawl runs under a child of this token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(crawler: Crawler, config: Config, shutdown: CancellationToken) -> Self {
        Self {
            crawler,
            config: Arc::new(config),
            shutdown,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/graph", get(graph_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves requests on `listener` until the shutdown token is cancelled
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let shutdown = state.shutdown.clone();
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
