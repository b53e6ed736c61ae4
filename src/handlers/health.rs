//! Health check endpoint for service monitoring.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "timestamp": "2026-10-17T19:00:00Z"
/// }
/// ```
///
/// If the database is unreachable, returns the standard 500 error body.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
