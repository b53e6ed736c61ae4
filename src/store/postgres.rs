//! PostgreSQL-backed code store.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::{DbPool, is_unique_violation},
    error::AppError,
    models::code::{DownloadCode, NewDownloadCode},
    store::CodeStore,
};

#[derive(Clone)]
pub struct PgCodeStore {
    pub pool: DbPool,
}

impl PgCodeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CodeStore for PgCodeStore {
    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM download_codes WHERE code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert_batch(&self, codes: &[NewDownloadCode]) -> Result<(), AppError> {
        if codes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO download_codes (code, expires_at) ");
        builder.push_values(codes, |mut row, new_code| {
            row.push_bind(&new_code.code).push_bind(new_code.expires_at);
        });

        // Dropping `tx` on the error path rolls the whole batch back
        if let Err(err) = builder.build().execute(&mut *tx).await {
            if is_unique_violation(&err) {
                return Err(AppError::DuplicateCode);
            }
            return Err(err.into());
        }

        tx.commit().await?;

        Ok(())
    }

    async fn find_unused(&self, code: &str) -> Result<Option<DownloadCode>, AppError> {
        let found = sqlx::query_as::<_, DownloadCode>(
            r#"
            SELECT id, code, used, used_at, expires_at, created_at
            FROM download_codes
            WHERE code = $1 AND used = FALSE
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn mark_used(
        &self,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<Option<DownloadCode>, AppError> {
        // The `used = FALSE` guard makes this the single point where
        // concurrent redemptions of one code are decided
        let updated = sqlx::query_as::<_, DownloadCode>(
            r#"
            UPDATE download_codes
            SET used = TRUE,
                used_at = $2
            WHERE id = $1 AND used = FALSE
            RETURNING id, code, used, used_at, expires_at, created_at
            "#,
        )
        .bind(id)
        .bind(used_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
