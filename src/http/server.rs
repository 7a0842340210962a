//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Serve until the shutdown signal, then drain

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::apod::{ApodClient, ApodResult, ImageSource};
use crate::config::{AppConfig, ListenerConfig};
use crate::http::handlers::{health, pictures};
use crate::http::request::UuidRequestId;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ImageSource>,
    /// How long a handler waits for the upstream before answering 500.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: &ListenerConfig, source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// HTTP server for the picture service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server backed by the real upstream client.
    pub fn new(config: AppConfig) -> ApodResult<Self> {
        let client = ApodClient::new(&config.upstream)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create a server backed by any image source.
    pub fn with_source(config: AppConfig, source: Arc<dyn ImageSource>) -> Self {
        let router = build_router(AppState::new(&config.listener, source));
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// The inbound deadline is enforced by the `/pictures` handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/pictures", get(pictures))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}
