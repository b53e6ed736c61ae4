//! Settings service - persistence for the singleton business profile.
//!
//! The profile lives in one row under the reserved key `1`. Saves are an
//! upsert on that key, so two concurrent first-time saves cannot create
//! two rows.

use chrono::{DateTime, Utc};

use crate::{
    db::DbPool,
    error::AppError,
    models::settings::{BusinessSettings, SettingsExport},
};

/// Fetch the stored profile, if one has been saved.
pub async fn find_settings(pool: &DbPool) -> Result<Option<BusinessSettings>, AppError> {
    let settings = sqlx::query_as::<_, BusinessSettings>(
        r#"
        SELECT business_name, business_address, business_phone, business_email,
               business_logo_url, signature_url, tax_rate, currency
        FROM business_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Fetch the stored profile, falling back to defaults.
pub async fn get_or_default(pool: &DbPool) -> Result<BusinessSettings, AppError> {
    Ok(find_settings(pool).await?.unwrap_or_default())
}

/// Replace the stored profile.
pub async fn upsert_settings(
    pool: &DbPool,
    settings: &BusinessSettings,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO business_settings (
            id,
            business_name,
            business_address,
            business_phone,
            business_email,
            business_logo_url,
            signature_url,
            tax_rate,
            currency,
            updated_at
        )
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, NOW())
        ON CONFLICT (id) DO UPDATE SET
            business_name = EXCLUDED.business_name,
            business_address = EXCLUDED.business_address,
            business_phone = EXCLUDED.business_phone,
            business_email = EXCLUDED.business_email,
            business_logo_url = EXCLUDED.business_logo_url,
            signature_url = EXCLUDED.signature_url,
            tax_rate = EXCLUDED.tax_rate,
            currency = EXCLUDED.currency,
            updated_at = NOW()
        "#,
    )
    .bind(&settings.business_name)
    .bind(&settings.business_address)
    .bind(&settings.business_phone)
    .bind(&settings.business_email)
    .bind(&settings.business_logo_url)
    .bind(&settings.signature_url)
    .bind(settings.tax_rate)
    .bind(&settings.currency)
    .execute(pool)
    .await?;

    tracing::info!("business settings saved");

    Ok(())
}

/// Build an export of the stored profile.
///
/// # Errors
///
/// `SettingsNotFound` if nothing has been saved yet.
pub async fn export_settings(
    pool: &DbPool,
    now: DateTime<Utc>,
) -> Result<(SettingsExport, String), AppError> {
    let settings = find_settings(pool)
        .await?
        .ok_or(AppError::SettingsNotFound)?;

    Ok((
        SettingsExport {
            settings,
            export_date: now,
        },
        export_filename(now),
    ))
}

/// File name offered to the browser for a settings export.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("business_settings_{}.json", now.format("%Y%m%d_%H%M%S"))
}
