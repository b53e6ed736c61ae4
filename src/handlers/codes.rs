//! Download code HTTP handlers.
//!
//! This module implements the code lifecycle endpoints:
//! - POST /api/generate-code - Issue a new batch of codes
//! - POST /api/verify-code - Redeem a code
//! - POST /api/verify-download-token - Check a grant issued by a redemption

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;

use crate::{
    error::AppError,
    handlers::json_body,
    models::code::{
        GenerateCodesResponse, VerifyCodeRequest, VerifyCodeResponse,
        VerifyDownloadTokenRequest, VerifyDownloadTokenResponse,
    },
    services::{code_generator, grant_service, redemption},
    state::AppState,
};

/// Generate a batch of one-time download codes.
///
/// # Endpoint
///
/// `POST /api/generate-code`
///
/// # Response
///
/// - **Success (200 OK)**: the new codes and their shared expiry
/// - **Error (500)**: the batch could not be persisted; no codes were stored
///
/// ```json
/// {
///   "success": true,
///   "codes": ["AB3XK9Q1", "7QK2M0ZP"],
///   "expires_at": "2027-10-17T10:00:00Z"
/// }
/// ```
pub async fn generate_code(
    State(state): State<AppState>,
) -> Result<Json<GenerateCodesResponse>, AppError> {
    let batch = code_generator::generate_batch(
        &state.code_store(),
        state.batch_request(),
        Utc::now(),
    )
    .await?;

    Ok(Json(GenerateCodesResponse {
        success: true,
        codes: batch.codes,
        expires_at: batch.expires_at,
    }))
}

/// Redeem a download code.
///
/// # Endpoint
///
/// `POST /api/verify-code`
///
/// # Request Body
///
/// ```json
/// { "code": "ab3xk9q1" }
/// ```
///
/// Input is case-insensitive.
///
/// # Response
///
/// - **Success (200 OK)**: code consumed, with a download token
/// - **Error (400)**: missing code, unknown or used code, or expired code
/// - **Error (500)**: database error
pub async fn verify_code(
    State(state): State<AppState>,
    payload: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<Json<VerifyCodeResponse>, AppError> {
    let request = json_body(payload)?;
    let now = Utc::now();

    let redeemed = redemption::redeem(&state.code_store(), &request.code, now)
        .await
        .map_err(|e| e.during("verify code"))?;

    let download_token = grant_service::issue(&state.config.session_secret, &redeemed.code, now);

    Ok(Json(VerifyCodeResponse {
        success: true,
        message: "Code verified successfully".to_string(),
        download_token,
    }))
}

/// Check a download token issued by a successful redemption.
///
/// # Endpoint
///
/// `POST /api/verify-download-token`
///
/// # Response
///
/// - **Success (200 OK)**: the code the token was issued for
/// - **Error (400)**: malformed request body
/// - **Error (403)**: bad signature or expired token
pub async fn verify_download_token(
    State(state): State<AppState>,
    payload: Result<Json<VerifyDownloadTokenRequest>, JsonRejection>,
) -> Result<Json<VerifyDownloadTokenResponse>, AppError> {
    let request = json_body(payload)?;

    let code = grant_service::verify(
        &state.config.session_secret,
        &request.token,
        Utc::now(),
        state.config.download_grant_ttl(),
    )?;

    Ok(Json(VerifyDownloadTokenResponse {
        success: true,
        code,
    }))
}
