use crate::csv_export::{self, parse_columns};
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::*;
use crate::validation::validate_login_form;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

/// Resolves the admin session from `Authorization: Bearer <token>`.
async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    state
        .backend
        .current_session(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// POST /api/v1/admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AdminSession>, AppError> {
    validate_login_form(&payload)?;
    let session = state
        .backend
        .sign_in(payload.email.trim(), &payload.password)
        .await?;
    Ok(Json(session))
}

/// POST /api/v1/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session = require_session(&state, &headers).await?;
    state.backend.sign_out(&session.access_token).await?;
    tracing::info!("Admin signed out: {}", session.email);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/session
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AdminSession>, AppError> {
    Ok(Json(require_session(&state, &headers).await?))
}

/// GET /api/v1/admin/leads
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<LeadListResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    let leads = state.backend.list_leads(&session).await?;
    Ok(Json(LeadListResponse {
        total: leads.len(),
        leads,
    }))
}

/// DELETE /api/v1/admin/leads/:id
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    state.backend.delete_lead(&session, &id).await?;
    tracing::info!("Lead {} deleted by {}", id, session.email);
    Ok(Json(DeleteResponse { success: true, id }))
}

/// GET /api/v1/admin/leads/export?columns=email,name
///
/// Downloads the selected columns as `leads-<date>.csv` (UTF-8 with BOM).
pub async fn export_leads(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let session = require_session(&state, &headers).await?;
    let columns = parse_columns(query.columns.as_deref())?;
    let offset = state
        .config
        .display_offset()
        .ok_or_else(|| AppError::InternalError("Invalid display offset".to_string()))?;

    let leads = state.backend.list_leads(&session).await?;
    let body = csv_export::with_bom(&csv_export::export(&leads, &columns, &offset));
    let filename = csv_export::export_filename(Utc::now().date_naive());

    tracing::info!(
        "Exported {} leads ({} columns) as {}",
        leads.len(),
        columns.len(),
        filename
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
