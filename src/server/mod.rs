//! Minimal web backend exposing the identify and search stages over HTTP.

pub mod handlers;

use crate::config::Config;
use crate::shopping::{ProductSearch, ShoppingClient};
use crate::vision::{ProductIdentifier, VisionClient};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Largest accepted photo upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub identifier: Arc<dyn ProductIdentifier>,
    pub search: Arc<dyn ProductSearch>,
    /// Landing page hits since startup
    pub visits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(identifier: Arc<dyn ProductIdentifier>, search: Arc<dyn ProductSearch>) -> Self {
        Self { identifier, search, visits: Arc::new(AtomicU64::new(0)) }
    }

    /// Builds both API clients, failing on missing credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        let identifier = VisionClient::new(config).context("Failed to create vision client")?;
        let search = ShoppingClient::new(config).context("Failed to create search client")?;
        Ok(Self::new(Arc::new(identifier), Arc::new(search)))
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    router_with_upload_limit(state, MAX_UPLOAD_BYTES)
}

fn router_with_upload_limit(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/identify", post(handlers::identify))
        .route("/api/search", get(handlers::search))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `config.server.bind` and serves until the process is stopped.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await.context("Server error")
}
