//! Download Code Service - Main Application Entry Point
//!
//! A REST API server that issues batches of one-time download codes, redeems
//! them exactly once, and stores the business profile used on generated documents.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Codes**: 8-character uppercase alphanumeric, drawn from a CSPRNG
//! - **Download tokens**: HMAC-SHA256 signed with `SESSION_SECRET`
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router over the shared state
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod store;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    if config.uses_dev_secret() {
        tracing::warn!("SESSION_SECRET is not set; using the development secret");
    }
    tracing::info!(
        batch_size = config.code_batch_size,
        ttl_hours = config.code_ttl_hours,
        "Configuration loaded"
    );

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let addr = format!("0.0.0.0:{}", config.server_port);
    let app = routes::build_router(state::AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Handles requests concurrently until the process is stopped
    axum::serve(listener, app).await?;

    Ok(())
}
