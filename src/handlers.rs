use crate::backend::LeadBackend;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use crate::validation::{validate_birth_year, validate_lead_form};
use crate::zodiac::{self, ZodiacSign};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lead store and admin authentication.
    pub backend: LeadBackend,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "zodiac-leads-api",
            "version": env!("CARGO_PKG_VERSION"),
            "backend": state.backend.name(),
        })),
    )
}

/// GET /api/v1/zodiac/signs
///
/// The full catalog, in wheel order.
pub async fn list_signs() -> Json<&'static [ZodiacSign]> {
    Json(zodiac::signs())
}

/// POST /api/v1/zodiac/reveal
///
/// Resolves the sign for a birth year and tells the wheel where to stop.
pub async fn reveal_sign(Json(payload): Json<RevealRequest>) -> Result<Json<RevealResponse>, AppError> {
    let year = validate_birth_year(&payload.birth_year)?;
    let sign = zodiac::resolve(year);
    let rotation = zodiac::spin_rotation(payload.current_rotation.unwrap_or(0.0), sign.id);

    tracing::debug!("Revealed {} for {} (rotation {})", sign.name, year, rotation);

    Ok(Json(RevealResponse {
        sign: *sign,
        rotation,
    }))
}

/// POST /api/v1/leads
///
/// Validates the lead form, snapshots the resolved sign and coupon, and
/// stores exactly one lead. Nothing is stored when validation fails.
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), AppError> {
    let form = validate_lead_form(&payload)?;
    let sign = zodiac::resolve(form.birth_year);
    let pin = state.config.pin_for(sign.coupon_code);

    tracing::info!(
        "POST /leads - birth_year: {}, sign: {}",
        form.birth_year,
        sign.name
    );

    let lead = NewLead::from_form(&form, sign, pin);
    state.backend.insert_lead(&lead).await?;

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            success: true,
            message: "Cupom gerado com sucesso".to_string(),
            data: Some(CouponGrant {
                zodiac_sign_name: lead.zodiac_sign_name,
                prediction: sign.prediction.to_string(),
                coupon_code: lead.coupon_code,
                coupon_condition: lead.coupon_condition,
                pin: lead.pin,
            }),
        }),
    ))
}
