//! Health check HTTP handler

use axum::{Json, extract::State};
use chrono::Utc;

use crate::models::HealthResponse;
use crate::web::AppState;

/// Health check endpoint
///
/// Reports the number of registered uploads and the process uptime
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        registered_images: state.registry.len().await,
        uptime_seconds: Utc::now()
            .signed_duration_since(state.start_time)
            .num_seconds(),
    })
}
