//! Persistence and admin-auth boundary.
//!
//! Handlers only see `LeadBackend`; which store sits behind it is chosen
//! from configuration at startup.

use std::time::Duration;

use crate::config::{BackendKind, Config};
use crate::db::Database;
use crate::db_storage::LeadStorage;
use crate::errors::AppError;
use crate::local_auth::{LocalAdminAuth, INVALID_CREDENTIALS};
use crate::models::{AdminSession, Lead, NewLead};
use crate::supabase_client::SupabaseClient;

/// Shown instead of the raw credentials-rejected message.
pub const FRIENDLY_INVALID_CREDENTIALS: &str = "E-mail ou senha incorretos.";

/// Translates known sign-in failures; anything else is shown verbatim.
pub fn friendly_sign_in_message(raw: &str) -> String {
    if raw == INVALID_CREDENTIALS {
        FRIENDLY_INVALID_CREDENTIALS.to_string()
    } else {
        raw.to_string()
    }
}

/// Postgres rows plus locally configured admin credentials.
#[derive(Clone)]
pub struct PostgresBackend {
    pub storage: LeadStorage,
    pub auth: LocalAdminAuth,
}

#[derive(Clone)]
pub enum LeadBackend {
    Supabase(SupabaseClient),
    Postgres(PostgresBackend),
}

impl LeadBackend {
    /// Builds the backend selected by `config.backend`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.backend {
            BackendKind::Supabase => {
                let url = config
                    .supabase_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("SUPABASE_URL is not configured"))?;
                let key = config
                    .supabase_anon_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("SUPABASE_ANON_KEY is not configured"))?;
                let client = SupabaseClient::new(url, key)?;
                Ok(LeadBackend::Supabase(client))
            }
            BackendKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not configured"))?;
                let db = Database::new(url).await?;
                db.ensure_schema().await?;
                tracing::info!("Database connection pool established");

                let auth = LocalAdminAuth::new(
                    config
                        .admin_email
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("ADMIN_EMAIL is not configured"))?,
                    config
                        .admin_password_sha256
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("ADMIN_PASSWORD_SHA256 is not configured"))?,
                    Duration::from_secs(config.session_ttl_secs),
                );

                Ok(LeadBackend::Postgres(PostgresBackend {
                    storage: LeadStorage::new(db.pool),
                    auth,
                }))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeadBackend::Supabase(_) => "supabase",
            LeadBackend::Postgres(_) => "postgres",
        }
    }

    pub async fn insert_lead(&self, lead: &NewLead) -> Result<(), AppError> {
        match self {
            LeadBackend::Supabase(client) => client.insert_lead(lead).await,
            LeadBackend::Postgres(pg) => pg.storage.insert_lead(lead).await.map(|_| ()),
        }
    }

    /// Leads newest first. The session is forwarded to stores that enforce
    /// row access themselves.
    pub async fn list_leads(&self, session: &AdminSession) -> Result<Vec<Lead>, AppError> {
        match self {
            LeadBackend::Supabase(client) => client.list_leads(session).await,
            LeadBackend::Postgres(pg) => pg.storage.list_leads().await,
        }
    }

    pub async fn delete_lead(&self, session: &AdminSession, id: &str) -> Result<(), AppError> {
        match self {
            LeadBackend::Supabase(client) => client.delete_lead(session, id).await,
            LeadBackend::Postgres(pg) => pg.storage.delete_lead(id).await,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AppError> {
        match self {
            LeadBackend::Supabase(client) => client.sign_in(email, password).await,
            LeadBackend::Postgres(pg) => pg.auth.sign_in(email, password).await,
        }
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        match self {
            LeadBackend::Supabase(client) => client.sign_out(access_token).await,
            LeadBackend::Postgres(pg) => {
                pg.auth.sign_out(access_token).await;
                Ok(())
            }
        }
    }

    pub async fn current_session(&self, access_token: &str) -> Result<Option<AdminSession>, AppError> {
        match self {
            LeadBackend::Supabase(client) => client.current_session(access_token).await,
            LeadBackend::Postgres(pg) => Ok(pg.auth.current_session(access_token).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_sign_in_message() {
        assert_eq!(
            friendly_sign_in_message("Invalid login credentials"),
            "E-mail ou senha incorretos."
        );
        assert_eq!(
            friendly_sign_in_message("Email not confirmed"),
            "Email not confirmed"
        );
    }
}
