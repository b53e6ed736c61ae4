//! Business settings model and API request/response types.
//!
//! The settings are a single profile record consumed by the document
//! rendering layer. Field names on the wire are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

/// The business profile, as stored and as returned to clients.
///
/// # Database Table
///
/// Maps to the `business_settings` table, which holds at most one row
/// under the reserved primary key `1`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub business_name: String,
    pub business_address: String,
    pub business_phone: String,
    pub business_email: String,
    pub business_logo_url: String,
    pub signature_url: String,
    pub tax_rate: f64,
    pub currency: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            business_address: String::new(),
            business_phone: String::new(),
            business_email: String::new(),
            business_logo_url: String::new(),
            signature_url: String::new(),
            tax_rate: 0.0,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Incoming profile fields for save and import.
///
/// Every field is optional; absent or null fields fall back to the
/// defaults rather than keeping the previously stored value.
///
/// # JSON Example
///
/// ```json
/// {
///   "businessName": "Acme Ltd",
///   "businessEmail": "billing@acme.test",
///   "taxRate": "7.5",
///   "currency": "EUR"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub business_logo_url: Option<String>,
    pub signature_url: Option<String>,

    /// Accepts either a JSON number or a numeric string
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tax_rate: Option<f64>,

    pub currency: Option<String>,
}

impl From<SettingsPayload> for BusinessSettings {
    fn from(payload: SettingsPayload) -> Self {
        Self {
            business_name: payload.business_name.unwrap_or_default(),
            business_address: payload.business_address.unwrap_or_default(),
            business_phone: payload.business_phone.unwrap_or_default(),
            business_email: payload.business_email.unwrap_or_default(),
            business_logo_url: payload.business_logo_url.unwrap_or_default(),
            signature_url: payload.signature_url.unwrap_or_default(),
            tax_rate: payload.tax_rate.unwrap_or(0.0),
            currency: payload.currency.unwrap_or_else(default_currency),
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let rate = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrString::Number(n)) => n,
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("taxRate is not a number: {s:?}")))?,
    };

    // "NaN" and "inf" parse as f64 but cannot be stored or serialized as JSON.
    if !rate.is_finite() {
        return Err(de::Error::custom(format!("taxRate must be finite: {rate}")));
    }

    Ok(Some(rate))
}

/// Request body for `POST /api/import-settings`.
#[derive(Debug, Deserialize)]
pub struct ImportSettingsRequest {
    #[serde(default)]
    pub settings: SettingsPayload,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: BusinessSettings,
}

/// Exported profile, stamped with the export time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    #[serde(flatten)]
    pub settings: BusinessSettings,
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportSettingsResponse {
    pub success: bool,
    pub data: SettingsExport,
    pub filename: String,
}
