//! Health and readiness endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub issues: Vec<String>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET / - Plain-text status line
pub async fn home(State(state): State<SharedState>) -> String {
    state.predictor.context().status().to_string()
}

/// GET /health - Structured health check
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = state.predictor.context().status();
    Json(HealthResponse {
        status: if status.is_ok() { "ok" } else { "degraded" }.to_string(),
        issues: status.issues,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
