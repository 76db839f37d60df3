use chrono::Utc;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::AdminSession;

/// Message the hosted auth service returns for a wrong e-mail/password pair.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// Single-admin authentication for the Postgres backend.
///
/// Credentials come from configuration (e-mail plus a hex SHA-256 of the
/// password). Sessions are opaque random tokens kept in a TTL cache, so a
/// restart signs everyone out.
#[derive(Clone)]
pub struct LocalAdminAuth {
    email: String,
    password_sha256: String,
    ttl: Duration,
    sessions: Cache<String, AdminSession>,
}

impl LocalAdminAuth {
    pub fn new(email: String, password_sha256: String, ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(1_000)
            .build();

        Self {
            email: email.to_lowercase(),
            password_sha256: password_sha256.to_lowercase(),
            ttl,
            sessions,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AppError> {
        let email_ok = constant_time_compare(&email.trim().to_lowercase(), &self.email);
        let password_ok = constant_time_compare(&hash_password(password), &self.password_sha256);

        if !(email_ok && password_ok) {
            tracing::warn!("Rejected admin sign-in for {}", email);
            return Err(AppError::AuthFailed(crate::backend::friendly_sign_in_message(
                INVALID_CREDENTIALS,
            )));
        }

        let session = AdminSession {
            access_token: new_token(),
            email: self.email.clone(),
            expires_at: chrono::Duration::from_std(self.ttl)
                .ok()
                .map(|ttl| Utc::now() + ttl),
        };

        self.sessions
            .insert(session.access_token.clone(), session.clone())
            .await;
        tracing::info!("✓ Admin signed in: {}", session.email);

        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) {
        self.sessions.invalidate(access_token).await;
    }

    pub async fn current_session(&self, access_token: &str) -> Option<AdminSession> {
        self.sessions.get(access_token).await
    }
}

/// Hex SHA-256 digest of a password, the format expected in `ADMIN_PASSWORD_SHA256`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// 64 hex characters derived from two random v4 UUIDs.
fn new_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
