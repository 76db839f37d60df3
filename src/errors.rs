use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, keyed by the form field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Form validation failed; carries one message per offending field.
    Validation(FieldErrors),
    /// Resource not found error.
    NotFound(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Error interacting with the hosted backend.
    ExternalApiError(String),
    /// The store refused the operation (row-level security, missing grants).
    PermissionDenied(String),
    /// Internal server error.
    InternalError(String),
    /// Missing or invalid admin session.
    Unauthorized(String),
    /// Sign-in rejected; the message is shown to the user as-is.
    AuthFailed(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::Validation(fields) => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(f, "Validation failed: {}", names.join(", "))
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::AuthFailed(msg) => write!(f, "Sign-in failed: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Maps each variant to a status code and a JSON `{"error": ...}` body.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Validation(fields) => {
                let body = Json(json!({
                    "error": "Dados inválidos",
                    "fields": fields,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::PermissionDenied(msg) => {
                tracing::warn!("Permission denied by store: {}", msg);
                (StatusCode::FORBIDDEN, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::AuthFailed(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.clone().into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl Clone for AppError {
    /// `sqlx::Error` is not cloneable, so `DatabaseError` degrades to `RowNotFound`.
    fn clone(&self) -> Self {
        match self {
            AppError::DatabaseError(_e) => AppError::DatabaseError(sqlx::Error::RowNotFound),
            AppError::Validation(fields) => AppError::Validation(fields.clone()),
            AppError::NotFound(msg) => AppError::NotFound(msg.clone()),
            AppError::BadRequest(msg) => AppError::BadRequest(msg.clone()),
            AppError::ExternalApiError(msg) => AppError::ExternalApiError(msg.clone()),
            AppError::PermissionDenied(msg) => AppError::PermissionDenied(msg.clone()),
            AppError::InternalError(msg) => AppError::InternalError(msg.clone()),
            AppError::Unauthorized(msg) => AppError::Unauthorized(msg.clone()),
            AppError::AuthFailed(msg) => AppError::AuthFailed(msg.clone()),
            AppError::WithContext { source, context } => AppError::WithContext {
                source: source.clone(),
                context: context.clone(),
            },
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: f(),
        })
    }
}
