//! Download code data models and API request/response types.
//!
//! This module defines:
//! - `DownloadCode`: Database entity representing one issued code
//! - `NewDownloadCode`: A freshly sampled code waiting to be persisted
//! - Request and response bodies for the generate and verify endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a code. Transitions only from `Unused` to `Used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStatus {
    Unused,
    Used,
}

/// Represents a code record from the database.
///
/// # Database Table
///
/// Maps to the `download_codes` table. The `code` column carries a UNIQUE
/// constraint, and a CHECK constraint keeps `used_at` set exactly when `used` is true.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DownloadCode {
    /// Surrogate key used by the conditional redeem update
    pub id: Uuid,

    /// The 8-character value handed to end users, always uppercase
    pub code: String,

    /// Whether the code has been redeemed
    pub used: bool,

    /// When the code was redeemed
    pub used_at: Option<DateTime<Utc>>,

    /// End of the validity window, fixed at creation
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl DownloadCode {
    pub fn status(&self) -> CodeStatus {
        if self.used {
            CodeStatus::Used
        } else {
            CodeStatus::Unused
        }
    }

    /// A code is expired only once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// A sampled code that has not been written to the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDownloadCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Response body for `POST /api/generate-code`.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": true,
///   "codes": ["AB3XK9Q1", "..."],
///   "expires_at": "2026-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct GenerateCodesResponse {
    pub success: bool,
    pub codes: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// Request body for `POST /api/verify-code`.
///
/// A missing `code` field deserializes to an empty string and is rejected
/// by the redemption engine with "Code is required".
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub code: String,
}

/// Response body for a successful redemption.
#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: String,

    /// Signed proof of this redemption, accepted by `/api/verify-download-token`
    pub download_token: String,
}

/// Request body for `POST /api/verify-download-token`.
#[derive(Debug, Deserialize)]
pub struct VerifyDownloadTokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyDownloadTokenResponse {
    pub success: bool,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code_expiring_at(expires_at: DateTime<Utc>) -> DownloadCode {
        DownloadCode {
            id: Uuid::new_v4(),
            code: "AB3XK9Q1".to_string(),
            used: false,
            used_at: None,
            expires_at,
            created_at: expires_at - Duration::hours(8760),
        }
    }

    #[test]
    fn code_is_still_valid_at_its_expiry_instant() {
        let now = Utc::now();
        let code = code_expiring_at(now);

        assert!(!code.is_expired_at(now));
        assert!(code.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn status_follows_used_flag() {
        let now = Utc::now();
        let mut code = code_expiring_at(now + Duration::hours(1));
        assert_eq!(code.status(), CodeStatus::Unused);

        code.used = true;
        code.used_at = Some(now);
        assert_eq!(code.status(), CodeStatus::Used);
    }

    #[test]
    fn missing_code_field_defaults_to_empty() {
        let req: VerifyCodeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.code.is_empty());
    }
}
