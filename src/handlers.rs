use crate::config::Config;
use crate::errors::AppError;
use crate::lead_mapping::build_lead_record;
use crate::lead_models::{SubmissionPayload, SubmissionResponse};
use crate::zoho_client::ZohoClient;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Method, StatusCode},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup.
    pub config: Config,
    /// Client for the Zoho token and CRM endpoints.
    pub zoho_client: ZohoClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let zoho_client = ZohoClient::from_config(&config)?;
        Ok(Self {
            config,
            zoho_client,
        })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "zoho-lead-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// /api/submitToZoho
///
/// Forwards a website inquiry to Zoho CRM as a lead.
///
/// Flow:
/// 1. Reject anything but POST.
/// 2. Check the Zoho secrets are configured.
/// 3. Parse the submission.
/// 4. Exchange the refresh token for an access token.
/// 5. Build the lead and create it in Zoho CRM.
/// 6. Relay Zoho's response.
///
/// Non-POST requests reach this handler through the route's fallback so the
/// method check answers with the same JSON error shape as the other failures.
/// The body is read here, after the method and configuration checks, and is
/// capped at [`MAX_BODY_BYTES`](crate::MAX_BODY_BYTES).
///
/// # Returns
///
/// * `Result<(StatusCode, Json<SubmissionResponse>), AppError>` - 200 with Zoho's
///   response, or an error converted to a JSON response.
pub async fn submit_to_zoho(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Body,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let submission_id = Uuid::new_v4();
    let span = tracing::info_span!("submission", %submission_id);

    async move {
        let credentials = state
            .config
            .credentials()
            .ok_or(AppError::ConfigurationError)?;

        let body = to_bytes(body, crate::MAX_BODY_BYTES).await.map_err(|e| {
            AppError::UnhandledError(format!("Failed to read request body: {}", e))
        })?;
        let payload: SubmissionPayload = serde_json::from_slice(&body)?;
        tracing::info!(
            "📨 Received {} submission",
            payload.entity_type.as_str()
        );

        let access_token = state.zoho_client.fetch_access_token(&credentials).await?;

        let lead = build_lead_record(&payload);
        let data = state.zoho_client.create_lead(&access_token, &lead).await?;

        tracing::info!("✅ Submission forwarded to Zoho CRM");

        Ok((
            StatusCode::OK,
            Json(SubmissionResponse {
                success: true,
                data,
            }),
        ))
    }
    .instrument(span)
    .await
}
