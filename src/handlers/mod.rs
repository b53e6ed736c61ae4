//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, shared state)
//! 2. Delegates to a service
//! 3. Returns a JSON response, or an `AppError` mapped once in `error.rs`

use axum::{Json, extract::rejection::JsonRejection};

use crate::error::AppError;

/// Download code endpoints
pub mod codes;
/// Service monitoring
pub mod health;
/// Business profile endpoints
pub mod settings;

/// Unwrap a JSON body, reporting any rejection as a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::InvalidInput("Invalid request body".to_string())
    })
}
