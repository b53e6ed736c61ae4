//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and a user-facing message.
/// Variants carrying store errors never expose their detail to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or a required field is missing or malformed.
    ///
    /// Returns HTTP 400 Bad Request with the contained message.
    #[error("{0}")]
    InvalidInput(String),

    /// The code does not exist or was already redeemed.
    ///
    /// Both cases share one message so callers cannot enumerate issued codes.
    #[error("Invalid or already used code")]
    NotFoundOrUsed,

    /// The code exists and is unused, but its validity window has passed.
    #[error("Code has expired")]
    Expired,

    /// A download token failed signature or age checks.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Invalid or expired download token")]
    InvalidDownloadToken,

    /// No business settings have been saved yet.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("No settings found")]
    SettingsNotFound,

    /// The store rejected an insert because a code value already exists.
    ///
    /// The generator treats this as a signal to regenerate the batch.
    #[error("Generated code collides with an existing code")]
    DuplicateCode,

    /// Batch generation could not complete.
    #[error("Failed to generate codes")]
    GenerationFailure(String),

    /// A store operation failed while performing `action`.
    #[error("Failed to {action}")]
    Persistence {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Database operation failed outside of a named action.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Attach the user-facing action name to a raw database error.
    ///
    /// Other variants pass through unchanged.
    pub fn during(self, action: &'static str) -> Self {
        match self {
            AppError::Database(source) => AppError::Persistence { action, source },
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::NotFoundOrUsed | AppError::Expired => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidDownloadToken => StatusCode::FORBIDDEN,
            AppError::SettingsNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateCode
            | AppError::GenerationFailure(_)
            | AppError::Persistence { .. }
            | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "success": false,
///   "error": "Human-readable error message"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidInput`, `NotFoundOrUsed`, `Expired` → 400 Bad Request
/// - `InvalidDownloadToken` → 403 Forbidden
/// - `SettingsNotFound` → 404 Not Found
/// - `DuplicateCode`, `GenerationFailure`, `Persistence`, `Database` → 500
///   (details are logged, never returned)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::DuplicateCode | AppError::GenerationFailure(_) => {
                tracing::error!(error = ?self, "code generation failed");
                "Failed to generate codes".to_string()
            }
            AppError::Persistence { action, source } => {
                tracing::error!(error = %source, action, "persistence failure");
                self.to_string()
            }
            AppError::Database(source) => {
                tracing::error!(error = %source, "database error");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn redemption_errors_are_bad_requests() {
        let (status, body) = render(AppError::NotFoundOrUsed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid or already used code");

        let (status, body) = render(AppError::Expired).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Code has expired");

        let (status, body) = render(AppError::InvalidInput("Code is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Code is required");
    }

    #[tokio::test]
    async fn persistence_failure_hides_source_detail() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut).during("save settings");
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save settings");
    }

    #[tokio::test]
    async fn generation_failure_uses_generic_message() {
        let (status, body) =
            render(AppError::GenerationFailure("pool exhausted at row 42".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate codes");
    }

    #[tokio::test]
    async fn unnamed_database_error_is_generic() {
        let (status, body) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[test]
    fn during_leaves_domain_errors_untouched() {
        assert!(matches!(
            AppError::Expired.during("verify code"),
            AppError::Expired
        ));
    }

    #[tokio::test]
    async fn missing_settings_is_not_found() {
        let (status, body) = render(AppError::SettingsNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No settings found");
    }
}
