use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the price model is loaded.
    pub model_loaded: bool,
    /// Number of datasets skipped at startup.
    pub analytics_warnings: usize,
    /// Live map sessions.
    pub sessions: usize,
}

/// GET /health -- returns service, model and dataset health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.estimator.is_some();
    let analytics_warnings = state.analytics.warnings().len();

    let status = if model_loaded && analytics_warnings == 0 {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        model_loaded,
        analytics_warnings,
        sessions: state.sessions.count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
