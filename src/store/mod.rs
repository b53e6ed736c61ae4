//! Durable storage for download codes.
//!
//! The generator and the redemption engine only talk to the [`CodeStore`]
//! trait. Production uses [`postgres::PgCodeStore`]; tests use an in-memory store.

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::code::{DownloadCode, NewDownloadCode},
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Repository for one-time download codes.
///
/// Implementations must enforce uniqueness of `code` themselves; the
/// generator's pre-insert lookup is not sufficient on its own.
pub trait CodeStore: Send + Sync {
    /// Whether any row, used or not, already carries this value.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Persist every code or none of them.
    ///
    /// Returns `AppError::DuplicateCode` if any value already exists.
    async fn insert_batch(&self, codes: &[NewDownloadCode]) -> Result<(), AppError>;

    /// Find an unused code by its exact (already normalized) value.
    async fn find_unused(&self, code: &str) -> Result<Option<DownloadCode>, AppError>;

    /// Mark a code used, but only if it is still unused at write time.
    ///
    /// Returns the updated row, or `None` when another redemption got there first.
    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<Option<DownloadCode>, AppError>;
}
