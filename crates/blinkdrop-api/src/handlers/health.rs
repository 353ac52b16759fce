//! Liveness and health endpoints

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub paused: bool,
    pub upload_count: u64,
    pub upload_size_mb: f64,
    pub storage: String,
}

/// `GET /`
pub async fn liveness() -> &'static str {
    "Hello"
}

/// `GET /health`: admission state for operators. No keys, no secrets.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.admission.snapshot();
    Json(HealthResponse {
        status: if snapshot.paused { "paused" } else { "ok" },
        paused: snapshot.paused,
        upload_count: snapshot.upload_count,
        upload_size_mb: snapshot.upload_size_mb,
        storage: state.storage.backend_type().to_string(),
    })
}
