//! Business settings HTTP handlers.
//!
//! - POST /api/save-settings - Replace the profile
//! - GET /api/get-settings - Read the profile (defaults if none saved)
//! - GET /api/export-settings - Download the profile as JSON
//! - POST /api/import-settings - Replace the profile from an export

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    handlers::json_body,
    models::settings::{
        BusinessSettings, ExportSettingsResponse, ImportSettingsRequest, SettingsPayload,
        SettingsResponse,
    },
    services::settings_service,
    state::AppState,
};

/// Save the business profile.
///
/// # Request Body
///
/// ```json
/// {
///   "businessName": "Acme Ltd",
///   "businessAddress": "1 Main St",
///   "taxRate": 7.5,
///   "currency": "EUR"
/// }
/// ```
///
/// Missing fields are stored as their defaults.
pub async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let settings = BusinessSettings::from(json_body(payload)?);

    settings_service::upsert_settings(&state.pool, &settings)
        .await
        .map_err(|e| e.during("save settings"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Settings saved successfully"
    })))
}

/// Read the business profile, or the defaults if none was saved.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = settings_service::get_or_default(&state.pool)
        .await
        .map_err(|e| e.during("get settings"))?;

    Ok(Json(SettingsResponse {
        success: true,
        settings,
    }))
}

/// Export the business profile.
///
/// # Response
///
/// - **Success (200 OK)**: profile with `exportDate`, plus a suggested file name
/// - **Error (404)**: no profile saved yet
pub async fn export_settings(
    State(state): State<AppState>,
) -> Result<Json<ExportSettingsResponse>, AppError> {
    let (data, filename) = settings_service::export_settings(&state.pool, Utc::now())
        .await
        .map_err(|e| e.during("export settings"))?;

    Ok(Json(ExportSettingsResponse {
        success: true,
        data,
        filename,
    }))
}

/// Import a previously exported profile from `{"settings": {...}}`.
pub async fn import_settings(
    State(state): State<AppState>,
    payload: Result<Json<ImportSettingsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let settings = BusinessSettings::from(request.settings);

    settings_service::upsert_settings(&state.pool, &settings)
        .await
        .map_err(|e| e.during("import settings"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Settings imported successfully"
    })))
}
