//! Request handlers for the HTTP front door

use super::AppState;
use crate::AnalyzerError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `GET /api/health`
pub async fn health() -> Json<serde_json::Value> {
    let started = Instant::now();
    let body = Json(json!({
        "status": "healthy",
        "service": "webpage-analyzer",
    }));
    tracing::info!("GET /api/health -> 200 in {:?}", started.elapsed());
    body
}

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let started = Instant::now();
    let body = Json(json!({ "status": state.service.status() }));
    tracing::info!("GET /api/status -> 200 in {:?}", started.elapsed());
    body
}

/// `GET /api/openapi`
///
/// The document is read from disk on every request so edits show up
/// without a restart.
pub async fn openapi(State(state): State<AppState>) -> Response {
    let started = Instant::now();

    match tokio::fs::read(state.openapi_file.as_path()).await {
        Ok(document) => {
            tracing::info!("GET /api/openapi -> 200 in {:?}", started.elapsed());
            ([(header::CONTENT_TYPE, "application/yaml")], document).into_response()
        }
        Err(e) => {
            tracing::error!(
                "GET /api/openapi -> 500 in {:?}: failed to read {}: {}",
                started.elapsed(),
                state.openapi_file.display(),
                e
            );
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read OpenAPI spec")
        }
    }
}

/// `POST /api/analyze`
///
/// Classified analysis failures answer `400` with the error itself as the
/// body; anything else is an opaque `500`.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("POST /api/analyze: invalid request body: {}", rejection);
            return error_body(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    tracing::info!("POST /api/analyze: starting analysis of {}", request.url);

    match state.service.analyze(&request.url).await {
        Ok(record) => {
            tracing::info!(
                "POST /api/analyze: {} -> 200 in {:?}",
                request.url,
                started.elapsed()
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(AnalyzerError::Analysis(err)) => {
            tracing::warn!(
                "POST /api/analyze: {} -> 400 ({}) in {:?}",
                request.url,
                err.status_code,
                started.elapsed()
            );
            (StatusCode::BAD_REQUEST, Json(err)).into_response()
        }
        Err(err) => {
            tracing::error!(
                "POST /api/analyze: {} -> 500 in {:?}: {}",
                request.url,
                started.elapsed(),
                err
            );
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
