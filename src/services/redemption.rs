//! Redemption engine - validates and consumes download codes.
//!
//! # Atomicity Guarantees
//!
//! The final write is conditional on the code still being unused. Two
//! concurrent redemptions of the same code can both pass validation, but
//! only one of them wins the write; the other sees `NotFoundOrUsed`.

use chrono::{DateTime, Utc};

use crate::{error::AppError, models::code::DownloadCode, store::CodeStore};

/// Case-fold user input to the stored form.
pub fn normalize(candidate: &str) -> String {
    candidate.to_uppercase()
}

/// Redeem a code exactly once.
///
/// # Validation Order
///
/// 1. Empty input → `InvalidInput`
/// 2. No unused code with this value → `NotFoundOrUsed`
/// 3. `expires_at < now` → `Expired`
///
/// # Returns
///
/// The code row after it was marked used.
pub async fn redeem<S: CodeStore>(
    store: &S,
    candidate: &str,
    now: DateTime<Utc>,
) -> Result<DownloadCode, AppError> {
    let code = normalize(candidate);
    if code.is_empty() {
        return Err(AppError::InvalidInput("Code is required".to_string()));
    }

    let found = store
        .find_unused(&code)
        .await?
        .ok_or(AppError::NotFoundOrUsed)?;

    if found.is_expired_at(now) {
        return Err(AppError::Expired);
    }

    // Lost the race to a concurrent redemption
    let redeemed = store
        .mark_used(found.id, now)
        .await?
        .ok_or(AppError::NotFoundOrUsed)?;

    tracing::info!(code_id = %redeemed.id, status = ?redeemed.status(), "download code redeemed");

    Ok(redeemed)
}
