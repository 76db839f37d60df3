use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zodiac_leads_api::api;
use zodiac_leads_api::backend::LeadBackend;
use zodiac_leads_api::config::Config;
use zodiac_leads_api::handlers::AppState;

/// Main entry point for the application.
///
/// Initializes logging, configuration and the lead backend, then serves
/// the API. Public routes are rate limited per client IP; the health check
/// and admin routes are not.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zodiac_leads_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let backend = LeadBackend::from_config(&config).await?;
    tracing::info!("✓ Lead backend initialized: {}", backend.name());

    let app_state = Arc::new(AppState {
        config: config.clone(),
        backend,
    });

    // Lead capture is open to anyone: 5 requests/second per IP, burst of 10
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(10)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let public_routes = api::public_routes().layer(
        ServiceBuilder::new()
            // Forms are tiny; 64KB is plenty
            .layer(RequestBodyLimitLayer::new(64 * 1024))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    let app = Router::new()
        .merge(api::service_routes())
        .merge(api::admin_routes())
        .merge(public_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
