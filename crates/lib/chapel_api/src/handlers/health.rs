//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_connected: bool,
    pub timestamp: String,
}

/// `GET /health`: liveness plus a database round trip.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_connected { "healthy" } else { "degraded" },
        version: chapel_core::version(),
        db_connected,
        timestamp: Utc::now().to_rfc3339(),
    })
}
