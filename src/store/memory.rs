//! In-memory code store for tests.
//!
//! A single mutex guards all rows, which gives the same all-or-nothing
//! batch insert and guarded update semantics as the PostgreSQL store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::code::{DownloadCode, NewDownloadCode},
    store::CodeStore,
};

#[derive(Clone, Default)]
pub struct MemoryCodeStore {
    rows: Arc<Mutex<Vec<DownloadCode>>>,
    fail_inserts: bool,
    blind_lookups: bool,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose batch inserts always fail with a database error.
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    /// A store whose existence lookups always miss, so only the insert-time
    /// uniqueness check can catch a duplicate (as when two batches race).
    pub fn blind_lookups() -> Self {
        Self {
            blind_lookups: true,
            ..Self::default()
        }
    }

    /// Insert a row directly, bypassing the generator.
    pub fn seed(&self, code: &str, expires_at: DateTime<Utc>) -> DownloadCode {
        let row = DownloadCode {
            id: Uuid::new_v4(),
            code: code.to_string(),
            used: false,
            used_at: None,
            expires_at,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn rows(&self) -> Vec<DownloadCode> {
        self.rows.lock().unwrap().clone()
    }
}

impl CodeStore for MemoryCodeStore {
    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        if self.blind_lookups {
            return Ok(false);
        }
        Ok(self.rows.lock().unwrap().iter().any(|row| row.code == code))
    }

    async fn insert_batch(&self, codes: &[NewDownloadCode]) -> Result<(), AppError> {
        if self.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        for (i, new_code) in codes.iter().enumerate() {
            let clashes_stored = rows.iter().any(|row| row.code == new_code.code);
            let clashes_batch = codes[..i].iter().any(|other| other.code == new_code.code);
            if clashes_stored || clashes_batch {
                return Err(AppError::DuplicateCode);
            }
        }

        let now = Utc::now();
        rows.extend(codes.iter().map(|new_code| DownloadCode {
            id: Uuid::new_v4(),
            code: new_code.code.clone(),
            used: false,
            used_at: None,
            expires_at: new_code.expires_at,
            created_at: now,
        }));

        Ok(())
    }

    async fn find_unused(&self, code: &str) -> Result<Option<DownloadCode>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.code == code && !row.used)
            .cloned())
    }

    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<Option<DownloadCode>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id && !row.used) else {
            return Ok(None);
        };

        row.used = true;
        row.used_at = Some(used_at);
        Ok(Some(row.clone()))
    }
}
