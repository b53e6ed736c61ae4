//! Code generator - issues batches of one-time download codes.
//!
//! # Uniqueness
//!
//! Every candidate is checked against the codes already drawn for the batch
//! and against the store. The store's UNIQUE constraint is still the final
//! authority: if the batch insert hits a duplicate key (another batch raced
//! this one), the whole batch is discarded and drawn again.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{error::AppError, models::code::NewDownloadCode, store::CodeStore};

/// Symbols a code is drawn from (uppercase alphanumeric).
pub const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every issued code.
pub const CODE_LEN: usize = 8;

/// How many times a batch is regenerated after a duplicate-key insert.
const MAX_BATCH_ATTEMPTS: usize = 3;

/// Parameters for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest {
    pub count: usize,
    pub ttl: Duration,
}

/// A persisted batch: every code shares the same expiry.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub codes: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// Draw one code uniformly from [`CHARSET`].
///
/// `rand::rng()` is a CSPRNG seeded from the operating system.
pub fn random_code() -> String {
    draw_code(&mut rand::rng())
}

fn draw_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generate and persist a batch using the system random source.
pub async fn generate_batch<S: CodeStore>(
    store: &S,
    request: BatchRequest,
    now: DateTime<Utc>,
) -> Result<GeneratedBatch, AppError> {
    generate_batch_with(store, request, now, random_code).await
}

/// Generate and persist a batch, drawing candidates from `draw`.
///
/// # Process
///
/// 1. Draw candidates until `count` distinct, store-unique codes are collected
/// 2. Insert them in one all-or-nothing batch
/// 3. On a duplicate-key failure, start over (bounded by `MAX_BATCH_ATTEMPTS`)
///
/// # Errors
///
/// - `InvalidInput`: `count` is zero, or `ttl` is not positive or overflows
///   the expiry timestamp
/// - `GenerationFailure`: the store failed, or every attempt collided
pub async fn generate_batch_with<S, F>(
    store: &S,
    request: BatchRequest,
    now: DateTime<Utc>,
    mut draw: F,
) -> Result<GeneratedBatch, AppError>
where
    S: CodeStore,
    F: FnMut() -> String,
{
    if request.count == 0 {
        return Err(AppError::InvalidInput(
            "Batch size must be positive".to_string(),
        ));
    }

    let expires_at = now
        .checked_add_signed(request.ttl)
        .filter(|expires_at| *expires_at > now)
        .ok_or_else(|| AppError::InvalidInput("Code lifetime must be positive".to_string()))?;

    for attempt in 1..=MAX_BATCH_ATTEMPTS {
        let codes = collect_unique(store, request.count, &mut draw)
            .await
            .map_err(generation_failure)?;

        let rows: Vec<NewDownloadCode> = codes
            .iter()
            .map(|code| NewDownloadCode {
                code: code.clone(),
                expires_at,
            })
            .collect();

        match store.insert_batch(&rows).await {
            Ok(()) => {
                tracing::info!(
                    count = codes.len(),
                    %expires_at,
                    "generated download code batch"
                );
                return Ok(GeneratedBatch { codes, expires_at });
            }
            Err(AppError::DuplicateCode) => {
                tracing::warn!(attempt, "batch collided with stored codes, regenerating");
            }
            Err(err) => return Err(generation_failure(err)),
        }
    }

    Err(AppError::GenerationFailure(format!(
        "duplicate codes on all {MAX_BATCH_ATTEMPTS} attempts"
    )))
}

async fn collect_unique<S, F>(
    store: &S,
    count: usize,
    draw: &mut F,
) -> Result<Vec<String>, AppError>
where
    S: CodeStore,
    F: FnMut() -> String,
{
    let mut seen = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);

    while codes.len() < count {
        let candidate = draw();
        if seen.contains(&candidate) {
            continue;
        }
        if store.code_exists(&candidate).await? {
            tracing::debug!("candidate already stored, drawing again");
            continue;
        }
        seen.insert(candidate.clone());
        codes.push(candidate);
    }

    Ok(codes)
}

fn generation_failure(err: AppError) -> AppError {
    match err {
        AppError::GenerationFailure(_) => err,
        other => AppError::GenerationFailure(other.to_string()),
    }
}
