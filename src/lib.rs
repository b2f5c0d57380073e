//! Zoho Lead API Library
//!
//! Receives service and fleet inquiries from the website and creates them as
//! leads in Zoho CRM.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `lead_mapping`: Service catalog and form-to-lead transformation.
//! - `lead_models`: Submission and lead data models.
//! - `zoho_client`: Zoho OAuth and CRM client.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod lead_mapping;
pub mod lead_models;
pub mod zoho_client;

use axum::{
    middleware::map_response,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::AppState;

/// Path of the lead submission endpoint.
pub const SUBMIT_PATH: &str = "/api/submitToZoho";

/// Form submissions are small; larger bodies are rejected by the handler
/// before parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// POST goes to the submission handler; every other method reaches the same
/// handler through the fallback, which answers 405. Layers added with
/// `route_layer` therefore only ever see POST.
pub fn submission_endpoint() -> MethodRouter<Arc<AppState>> {
    post(handlers::submit_to_zoho).fallback(handlers::submit_to_zoho)
}

/// Submission routes without rate limiting.
pub fn submission_routes() -> Router<Arc<AppState>> {
    Router::new().route(SUBMIT_PATH, submission_endpoint())
}

/// Submission routes with a per-IP rate limit on POST.
///
/// One request is replenished every `replenish_secs` seconds, up to `burst`.
/// Clients are keyed by `SmartIpKeyExtractor` (forwarding headers, then the
/// peer address), so the server must be served with connect info.
pub fn rate_limited_submission_routes(
    replenish_secs: u64,
    burst: u32,
) -> anyhow::Result<Router<Arc<AppState>>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(replenish_secs)
            .burst_size(burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let endpoint = submission_endpoint()
        .route_layer(GovernorLayer {
            config: governor_conf,
        })
        .route_layer(map_response(errors::json_rate_limit_rejection));

    Ok(Router::new().route(SUBMIT_PATH, endpoint))
}

/// Assembles the application: health check, the given submission routes,
/// state, and the shared middleware (request tracing, CORS).
pub fn app(submission: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(submission)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The forms are served from a different origin than this API
        .layer(CorsLayer::permissive())
}

/// Builds the application router without rate limiting.
pub fn build_router(state: Arc<AppState>) -> Router {
    app(submission_routes(), state)
}
