/**
 * Health Routes
 * Endpoint for checking backend health status
 */
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// GET /health (and /api/health) - Simple health ping
pub async fn health_ping() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}
