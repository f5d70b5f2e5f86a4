//! HTTP server for the summarization service

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SummarizerConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Summarization HTTP server
pub struct SummarizerServer {
    config: SummarizerConfig,
    state: AppState,
}

impl SummarizerServer {
    /// Create a new server
    pub fn new(config: SummarizerConfig) -> Self {
        let state = AppState::new(config.clone());
        Self { config, state }
    }

    /// Create with an explicit state, e.g. to swap the provider
    pub fn with_state(config: SummarizerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Assemble the full route tree with middleware
    fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::config(format!("invalid listen address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::config(format!("could not bind {}: {}", addr, e)))?;

        tracing::info!("Summarization server listening on http://{}", addr);

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::internal(format!("server terminated: {}", e)))
    }

    /// Configured host:port string
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint: verifies the summarization provider is reachable
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    match state.summarizer().health_check().await {
        Ok(true) => axum::http::StatusCode::OK,
        _ => axum::http::StatusCode::SERVICE_UNAVAILABLE,
    }
}
