use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zoho_lead_api::config::Config;
use zoho_lead_api::handlers::AppState;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the Zoho client and
/// routes (with per-IP rate limiting on the submission endpoint), then starts
/// the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zoho_lead_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let port = config.port;
    let app_state = Arc::new(AppState::new(config)?);
    tracing::info!("✓ Zoho client initialized");

    // Rate limiting: one request replenished every 2s per IP, burst of 10
    let submission_routes = zoho_lead_api::rate_limited_submission_routes(2, 10)?;

    // Health check stays outside the rate limiter
    let app = zoho_lead_api::app(submission_routes, app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
