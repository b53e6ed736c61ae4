//! HTTP router construction.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Build the application router over an initialized state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        // Download code lifecycle
        .route("/api/generate-code", post(handlers::codes::generate_code))
        .route("/api/verify-code", post(handlers::codes::verify_code))
        .route(
            "/api/verify-download-token",
            post(handlers::codes::verify_download_token),
        )
        // Business profile
        .route("/api/save-settings", post(handlers::settings::save_settings))
        .route("/api/get-settings", get(handlers::settings::get_settings))
        .route(
            "/api/export-settings",
            get(handlers::settings::export_settings),
        )
        .route(
            "/api/import-settings",
            post(handlers::settings::import_settings),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
