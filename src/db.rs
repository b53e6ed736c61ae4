//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically

use std::time::Duration;

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Configuration
///
/// - Maximum connections: 5
/// - Connections are recycled after 5 minutes
/// - Connections are pinged before being handed out, so a restarted
///   database does not surface as a failed request
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server
/// cannot be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .max_lifetime(Duration::from_secs(300))
        .test_before_acquire(true)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each one runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Returns true when the error is a violation of a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
