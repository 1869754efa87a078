//! The relay endpoint: `POST /api/chat` forwards a question upstream and
//! returns the answer. Also serves the voice bot page at `/`.

mod error;
mod handlers;
mod models;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};

use crate::consts::DEFAULT_PORT;
use crate::upstream::Upstream;

pub use error::ApiError;
pub use models::{ChatRequest, ChatResponse, ErrorResponse};

/// Shared by every request. Immutable; each request is independent.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }
}

/// Where the relay listens.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RelayConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::health))
        .route(
            "/api/chat",
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(app: Router, config: &RelayConfig) -> Result<()> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutting down");
        })
        .await
        .context("relay server failed")?;
    Ok(())
}
