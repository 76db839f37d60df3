//! Route table for the HTTP API.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::AppState;

pub mod handlers {
    pub use crate::handlers::*;
}

pub mod admin_handlers {
    pub use crate::admin_handlers::*;
}

/// Serves the OpenAPI specification YAML file from the working directory.
async fn serve_openapi_spec() -> impl IntoResponse {
    match tokio::fs::read_to_string("openapi.yml").await {
        Ok(content) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "OpenAPI spec not found").into_response(),
    }
}

/// Swagger UI page pointing at `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Zodiac Leads API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Visitor-facing routes: catalog, reveal and lead capture.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/zodiac/signs", get(handlers::list_signs))
        .route("/api/v1/zodiac/reveal", post(handlers::reveal_sign))
        .route("/api/v1/leads", post(handlers::submit_lead))
}

/// Admin routes; everything but login checks the bearer session.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/admin/login", post(admin_handlers::login))
        .route("/api/v1/admin/logout", post(admin_handlers::logout))
        .route("/api/v1/admin/session", get(admin_handlers::current_session))
        .route("/api/v1/admin/leads", get(admin_handlers::list_leads))
        .route(
            "/api/v1/admin/leads/export",
            get(admin_handlers::export_leads),
        )
        .route("/api/v1/admin/leads/:id", delete(admin_handlers::delete_lead))
}

/// Health check and API documentation.
pub fn service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
}

/// Every route, without rate limiting.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(service_routes())
        .merge(public_routes())
        .merge(admin_routes())
        .with_state(state)
}
