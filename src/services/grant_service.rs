//! Download grants - signed proof that a code was redeemed.
//!
//! A grant lets the download page confirm a recent redemption without
//! touching the code again.
//!
//! # Format
//!
//! `<CODE>.<issued_at_unix>.<hex(HMAC-SHA256(secret, "<CODE>.<issued_at_unix>"))>`

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Issue a grant for a redeemed code.
pub fn issue(secret: &str, code: &str, issued_at: DateTime<Utc>) -> String {
    let claims = format!("{}.{}", code, issued_at.timestamp());
    let signature = hex::encode(mac_for(secret, &claims).finalize().into_bytes());
    format!("{claims}.{signature}")
}

/// Check a grant's signature and age, returning the code it was issued for.
///
/// # Errors
///
/// `InvalidDownloadToken` if the token is malformed, was signed with a
/// different secret, is older than `ttl`, or claims to be issued in the future.
pub fn verify(
    secret: &str,
    token: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, AppError> {
    let (claims, signature) = token
        .rsplit_once('.')
        .ok_or(AppError::InvalidDownloadToken)?;
    let (code, issued_at) = claims
        .split_once('.')
        .ok_or(AppError::InvalidDownloadToken)?;

    let signature = hex::decode(signature).map_err(|_| AppError::InvalidDownloadToken)?;
    // Constant-time comparison
    mac_for(secret, claims)
        .verify_slice(&signature)
        .map_err(|_| AppError::InvalidDownloadToken)?;

    let issued_at = issued_at
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or(AppError::InvalidDownloadToken)?;

    let age = now.signed_duration_since(issued_at);
    if age < Duration::zero() || age > ttl {
        return Err(AppError::InvalidDownloadToken);
    }

    Ok(code.to_string())
}

fn mac_for(secret: &str, claims: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(claims.as_bytes());
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_grant_verifies_for_its_code() {
        let now = Utc::now();
        let token = issue(SECRET, "AB3XK9Q1", now);

        let code = verify(SECRET, &token, now, Duration::hours(1)).unwrap();

        assert_eq!(code, "AB3XK9Q1");
        assert!(token.starts_with("AB3XK9Q1."));
    }

    #[test]
    fn tampered_code_fails_verification() {
        let now = Utc::now();
        let token = issue(SECRET, "AB3XK9Q1", now).replacen("AB3XK9Q1", "AB3XK9Q2", 1);

        let result = verify(SECRET, &token, now, Duration::hours(1));

        assert!(matches!(result, Err(AppError::InvalidDownloadToken)));
    }

    #[test]
    fn other_secret_fails_verification() {
        let now = Utc::now();
        let token = issue("another-secret", "AB3XK9Q1", now);

        assert!(verify(SECRET, &token, now, Duration::hours(1)).is_err());
    }

    #[test]
    fn grant_expires_after_ttl() {
        let issued = Utc::now();
        let token = issue(SECRET, "AB3XK9Q1", issued);

        let just_inside = issued + Duration::minutes(59);
        let past = issued + Duration::minutes(61);

        assert!(verify(SECRET, &token, just_inside, Duration::hours(1)).is_ok());
        assert!(verify(SECRET, &token, past, Duration::hours(1)).is_err());
    }

    #[test]
    fn grant_from_the_future_is_rejected() {
        let now = Utc::now();
        let token = issue(SECRET, "AB3XK9Q1", now + Duration::hours(1));

        assert!(verify(SECRET, &token, now, Duration::hours(2)).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let now = Utc::now();
        for token in ["", "AB3XK9Q1", "AB3XK9Q1.123", "AB3XK9Q1.abc.zz", "a.b.c.d"] {
            assert!(
                verify(SECRET, token, now, Duration::hours(1)).is_err(),
                "accepted {token:?}"
            );
        }
    }
}
