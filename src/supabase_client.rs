use crate::errors::AppError;
use crate::models::{AdminSession, Lead, NewLead};
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

/// Table holding captured leads.
const LEADS_TABLE: &str = "leads";

/// Postgres error code for insufficient privilege (row-level security).
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Postgres error code for a value that does not parse as the column type.
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Operation named in the permission-denied message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOperation {
    Insert,
    List,
    Delete,
}

impl LeadOperation {
    fn action(self) -> &'static str {
        match self {
            LeadOperation::Insert => "salvar os dados",
            LeadOperation::List => "consultar os leads",
            LeadOperation::Delete => "excluir o lead",
        }
    }
}

/// Friendly message for store permission failures.
pub fn permission_denied_message(operation: LeadOperation) -> String {
    format!(
        "Sem permissão para {}. Verifique as políticas de acesso da tabela leads.",
        operation.action()
    )
}

/// Client for a hosted Supabase project.
///
/// Rows go through the REST interface (`/rest/v1`), admin sign-in through
/// the auth interface (`/auth/v1`). The anon key is always sent as `apikey`;
/// row reads and deletes carry the admin's access token instead of the anon key.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Creates a new `SupabaseClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Project URL, e.g. `https://xyz.supabase.co`.
    /// * `anon_key` - Public anon key of the project.
    pub fn new(base_url: String, anon_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Supabase client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, LEADS_TABLE)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Inserts one lead with the anon key. The row is not read back because
    /// visitors are not allowed to select from the table.
    pub async fn insert_lead(&self, lead: &NewLead) -> Result<(), AppError> {
        let url = self.table_url();
        tracing::info!("Inserting lead into Supabase: sign={}", lead.zodiac_sign_name);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=minimal")
            .json(lead)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rest_error(response, LeadOperation::Insert).await);
        }

        tracing::info!("✓ Lead stored in Supabase");
        Ok(())
    }

    /// Lists every lead, newest first.
    pub async fn list_leads(&self, session: &AdminSession) -> Result<Vec<Lead>, AppError> {
        let url = self.table_url();

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rest_error(response, LeadOperation::List).await);
        }

        let leads: Vec<Lead> = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Supabase leads: {}", e))
        })?;

        tracing::debug!("Fetched {} leads from Supabase", leads.len());
        Ok(leads)
    }

    /// Deletes a lead by id. A delete that matches no row is reported as not found.
    pub async fn delete_lead(&self, session: &AdminSession, id: &str) -> Result<(), AppError> {
        let url = self.table_url();
        tracing::info!("Deleting lead {} from Supabase", id);

        let response = self
            .client
            .delete(&url)
            .query(&[("id", format!("eq.{}", id))])
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            // An id the column type cannot represent matches no row.
            if error_code(&text) == PG_INVALID_TEXT_REPRESENTATION {
                return Err(AppError::NotFound(format!("Lead {} not found", id)));
            }
            return Err(map_rest_error(status, &text, LeadOperation::Delete));
        }

        let deleted: Vec<Value> = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Supabase delete response: {}", e))
        })?;

        if deleted.is_empty() {
            return Err(AppError::NotFound(format!("Lead {} not found", id)));
        }

        tracing::info!("✓ Lead {} deleted", id);
        Ok(())
    }

    /// Signs an admin in with e-mail and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AppError> {
        let url = self.auth_url("token");
        tracing::info!("Admin sign-in attempt: {}", email);

        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase auth request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = auth_error_message(&body);
            tracing::warn!("Supabase sign-in rejected ({}): {}", status, message);
            return Err(AppError::AuthFailed(crate::backend::friendly_sign_in_message(&message)));
        }

        let access_token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AppError::ExternalApiError("Sign-in response missing 'access_token'".to_string())
            })?
            .to_string();

        let expires_at = body
            .get("expires_at")
            .and_then(|v| v.as_i64())
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| {
                body.get("expires_in")
                    .and_then(|v| v.as_i64())
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        let email = body
            .get("user")
            .and_then(|u| u.get("email"))
            .and_then(|v| v.as_str())
            .unwrap_or(email)
            .to_string();

        tracing::info!("✓ Admin signed in: {}", email);
        Ok(AdminSession {
            access_token,
            email,
            expires_at,
        })
    }

    /// Revokes the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let url = self.auth_url("logout");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase auth request failed: {}", e)))?;

        // An already-expired token has nothing left to revoke.
        if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(AppError::ExternalApiError(format!(
                "Supabase sign-out failed {}: {}",
                status,
                auth_error_message(&body)
            )));
        }

        Ok(())
    }

    /// Resolves the session behind `access_token`; `None` when it is not valid.
    pub async fn current_session(&self, access_token: &str) -> Result<Option<AdminSession>, AppError> {
        let url = self.auth_url("user");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Supabase auth request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                let user: Value = response.json().await.map_err(|e| {
                    AppError::ExternalApiError(format!("Failed to parse Supabase user: {}", e))
                })?;
                let email = user
                    .get("email")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                Ok(Some(AdminSession {
                    access_token: access_token.to_string(),
                    email,
                    expires_at: None,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                Err(AppError::ExternalApiError(format!(
                    "Supabase session lookup failed {}: {}",
                    status,
                    auth_error_message(&body)
                )))
            }
        }
    }
}

/// Maps a failed REST response to an `AppError`, translating permission failures.
async fn rest_error(response: reqwest::Response, operation: LeadOperation) -> AppError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    map_rest_error(status, &text, operation)
}

fn error_code(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(|c| c.as_str()).map(str::to_string))
        .unwrap_or_default()
}

/// REST errors come back as `{code, message, details, hint}`.
pub fn map_rest_error(status: StatusCode, body: &str, operation: LeadOperation) -> AppError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let code = error_code(body);
    let message = parsed
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or(body);

    if code == PG_INSUFFICIENT_PRIVILEGE
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        tracing::warn!("Supabase refused operation ({} {}): {}", status, code, message);
        return AppError::PermissionDenied(permission_denied_message(operation));
    }

    AppError::ExternalApiError(format!("Supabase returned {}: {}", status, message))
}

/// Auth errors use `msg`, `error_description` or `message` depending on version.
fn auth_error_message(body: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .unwrap_or("Unknown error")
        .to_string()
}
