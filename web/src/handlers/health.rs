//! Health check and metrics endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Quotes awaiting commit
    pub pending_quotes: usize,
}

/// Liveness check.
///
/// ```bash
/// curl http://localhost:10000/health
/// # {"status":"ok","version":"0.1.0","pending_quotes":0}
/// ```
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            pending_quotes: state.service.pending_quotes().await,
        }),
    )
}

/// Prometheus scrape endpoint.
///
/// # Errors
///
/// 404 when metrics are disabled or no recorder handle is held.
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .and_then(|exporter| exporter.render())
        .ok_or_else(|| AppError::not_found("Metrics are disabled"))
}
