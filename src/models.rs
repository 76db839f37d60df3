use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::zodiac::ZodiacSign;

// ============ Database Models ============

/// A captured lead as stored by the backend.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Storage-assigned identifier (uuid or bigint, carried as text).
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub birth_year: i32,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub coupon_code: String,
    pub coupon_condition: Option<String>,
    pub zodiac_sign_name: String,
    pub pin: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new lead; `id` and `created_at` are left to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub birth_year: i32,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub coupon_code: String,
    pub coupon_condition: Option<String>,
    pub zodiac_sign_name: String,
    pub pin: Option<String>,
}

impl NewLead {
    /// Snapshots the resolved sign and coupon into a lead row.
    pub fn from_form(form: &crate::validation::ValidLeadForm, sign: &ZodiacSign, pin: Option<String>) -> Self {
        Self {
            birth_year: form.birth_year,
            name: form.name.clone(),
            email: form.email.clone(),
            whatsapp: form.whatsapp.clone(),
            coupon_code: sign.coupon_code.to_string(),
            coupon_condition: Some(sign.coupon_condition.to_string()),
            zodiac_sign_name: sign.name.to_string(),
            pin,
        }
    }
}

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    pub access_token: String,
    pub email: String,
    /// Absent when the backend does not report expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Accepts either a JSON string or a JSON integer as an id.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// ============ API Request Models ============

/// Birth year as typed by the visitor; frontends send either `"1992"` or `1992`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

impl YearInput {
    pub fn as_text(&self) -> String {
        match self {
            YearInput::Number(n) => n.to_string(),
            YearInput::Text(s) => s.trim().to_string(),
        }
    }
}

/// Request body for POST /api/v1/zodiac/reveal.
#[derive(Debug, Clone, Deserialize)]
pub struct RevealRequest {
    pub birth_year: YearInput,
    /// Rotation the wheel currently shows, in degrees.
    #[serde(default)]
    pub current_rotation: Option<f64>,
}

/// Request body for POST /api/v1/leads.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadRequest {
    pub birth_year: YearInput,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whatsapp: String,
}

/// Request body for POST /api/v1/admin/login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Query string for GET /api/v1/admin/leads/export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    /// Comma-separated column keys; all columns when absent.
    pub columns: Option<String>,
}

// ============ API Response Models ============

#[derive(Debug, Clone, Serialize)]
pub struct RevealResponse {
    pub sign: ZodiacSign,
    /// Rotation (degrees) the wheel should animate to.
    pub rotation: f64,
}

/// Coupon handed back after a successful lead submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponGrant {
    pub zodiac_sign_name: String,
    pub prediction: String,
    pub coupon_code: String,
    pub coupon_condition: Option<String>,
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    /// Whether the operation was successful.
    pub success: bool,
    /// Message describing the result.
    pub message: String,
    pub data: Option<CouponGrant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadListResponse {
    pub total: usize,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_accepts_numeric_and_text_ids() {
        let numeric: Lead = serde_json::from_value(serde_json::json!({
            "id": 42,
            "birth_year": 1992,
            "name": "Ana",
            "email": "ana@example.com",
            "whatsapp": "(11) 98765-4321",
            "coupon_code": "30OFF",
            "coupon_condition": null,
            "zodiac_sign_name": "Macaco",
            "pin": null,
            "created_at": "2026-02-10T15:30:00+00:00"
        }))
        .unwrap();
        assert_eq!(numeric.id, "42");

        let text: Lead = serde_json::from_value(serde_json::json!({
            "id": "4b1c0c1e-7d7a-4b8a-9d61-0f3f1b2f0d11",
            "birth_year": 1992,
            "name": "Ana",
            "email": "ana@example.com",
            "whatsapp": "(11) 98765-4321",
            "coupon_code": "30OFF",
            "coupon_condition": "(NOS PEDIDOS ACIMA DE R$200)",
            "zodiac_sign_name": "Macaco",
            "pin": "4821",
            "created_at": "2026-02-10T15:30:00.123456+00:00"
        }))
        .unwrap();
        assert_eq!(text.id, "4b1c0c1e-7d7a-4b8a-9d61-0f3f1b2f0d11");
        assert_eq!(text.pin.as_deref(), Some("4821"));
    }

    #[test]
    fn test_year_input_forms() {
        let from_text: YearInput = serde_json::from_str("\" 1992 \"").unwrap();
        let from_number: YearInput = serde_json::from_str("1992").unwrap();
        assert_eq!(from_text.as_text(), "1992");
        assert_eq!(from_number.as_text(), "1992");
    }
}
