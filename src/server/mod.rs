//! HTTP front door
//!
//! This module exposes the analysis service over HTTP:
//! - `GET /api/health` liveness probe
//! - `POST /api/analyze` page analysis
//! - `GET /api/status` readiness line
//! - `GET /api/openapi` the OpenAPI document
//! - `GET /docs` API documentation page
//! - Everything else is served from the static frontend directory

mod handlers;

pub use handlers::AnalyzeRequest;

use crate::config::ServerConfig;
use crate::service::AnalysisService;
use crate::AnalyzerError;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

/// File name of the documentation page inside the static directory
const DOCS_PAGE: &str = "docs.html";

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub openapi_file: Arc<PathBuf>,
}

/// Builds the router
///
/// Requests with the wrong method on a known `/api` path get `405`. Paths
/// with no route fall through to the static directory, which answers `404`
/// for missing files.
///
/// # Arguments
///
/// * `service` - The shared analysis service
/// * `config` - Supplies the static directory and OpenAPI document paths
pub fn router(service: Arc<AnalysisService>, config: &ServerConfig) -> Router {
    let state = AppState {
        service,
        openapi_file: Arc::new(config.openapi_file.clone()),
    };

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/status", get(handlers::status))
        .route("/api/openapi", get(handlers::openapi))
        .route_service("/docs", ServeFile::new(config.static_dir.join(DOCS_PAGE)))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl-C
pub async fn serve(
    listener: TcpListener,
    service: Arc<AnalysisService>,
    config: &ServerConfig,
) -> Result<(), AnalyzerError> {
    let address = listener.local_addr()?;
    tracing::info!(
        "Listening on http://{} with {} analysis workers",
        address,
        service.worker_count()
    );
    if config.static_dir.is_dir() {
        tracing::info!("Serving static files from {}", config.static_dir.display());
    } else {
        tracing::warn!(
            "Static directory {} does not exist; only /api routes will answer",
            config.static_dir.display()
        );
    }

    axum::serve(listener, router(service, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
