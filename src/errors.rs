use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failure kinds of a lead submission. Every variant becomes a JSON
/// `{"error": ...}` response; none of them escape the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The request used a method other than POST.
    MethodNotAllowed,
    /// One or more Zoho secrets are not configured.
    ConfigurationError,
    /// The Zoho token endpoint refused the refresh token or returned no access token.
    /// The detail is logged, never returned.
    UpstreamAuthError(String),
    /// Zoho CRM rejected the lead. The detail (status and provider body) is logged, never returned.
    UpstreamSubmitError(String),
    /// Anything else: transport failures, malformed JSON.
    UnhandledError(String),
}

impl AppError {
    /// Maps the error kind to the status code and the message exposed to the caller.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::ConfigurationError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Zoho credentials not configured".to_string(),
            ),
            AppError::UpstreamAuthError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get Zoho access token".to_string(),
            ),
            AppError::UpstreamSubmitError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create lead in Zoho CRM".to_string(),
            ),
            AppError::UnhandledError(msg) if msg.trim().is_empty() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
            ),
            AppError::UnhandledError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::ConfigurationError => write!(f, "Zoho credentials not configured"),
            AppError::UpstreamAuthError(detail) => write!(f, "Zoho auth error: {}", detail),
            AppError::UpstreamSubmitError(detail) => write!(f, "Zoho CRM error: {}", detail),
            AppError::UnhandledError(msg) => write!(f, "Unhandled error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Upstream details are logged here and dropped from the body.
    fn into_response(self) -> Response {
        match &self {
            AppError::MethodNotAllowed => {
                tracing::debug!("Rejected non-POST request");
            }
            AppError::ConfigurationError => {
                tracing::error!("❌ Zoho credentials not configured");
            }
            AppError::UpstreamAuthError(detail) => {
                tracing::error!("❌ Zoho token exchange failed: {}", detail);
            }
            AppError::UpstreamSubmitError(detail) => {
                tracing::error!("❌ Zoho CRM error: {}", detail);
            }
            AppError::UnhandledError(msg) => {
                tracing::error!("Error: {}", msg);
            }
        }

        let (status, error_message) = self.status_and_message();
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UnhandledError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::UnhandledError(err.to_string())
    }
}

/// Rewrites the rate limiter's plain-text 429 into the JSON `{"error": ...}`
/// shape, keeping its `retry-after` and rate limit headers.
pub async fn json_rate_limit_rejection(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    tracing::warn!("⚠️  Submission rate limited");
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let body = json!({ "error": "Too many requests" }).to_string();
    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_maps_to_405() {
        let (status, message) = AppError::MethodNotAllowed.status_and_message();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(message, "Method not allowed");
    }

    #[test]
    fn test_upstream_errors_hide_detail() {
        let (status, message) =
            AppError::UpstreamSubmitError("400 INVALID_DATA secret stuff".to_string())
                .status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to create lead in Zoho CRM");

        let (status, message) =
            AppError::UpstreamAuthError("invalid_code".to_string()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to get Zoho access token");
    }

    #[test]
    fn test_configuration_error_message() {
        let (status, message) = AppError::ConfigurationError.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Zoho credentials not configured");
    }

    #[test]
    fn test_unhandled_error_falls_back_to_generic_message() {
        let (_, message) = AppError::UnhandledError(String::new()).status_and_message();
        assert_eq!(message, "Server error");

        let (status, message) =
            AppError::UnhandledError("connection reset".to_string()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "connection reset");
    }

    #[test]
    fn test_json_error_converts_to_unhandled() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        match AppError::from(err) {
            AppError::UnhandledError(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_rejection_becomes_json() {
        let response = Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header("retry-after", "2")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("Too Many Requests! Wait for 2s"))
            .unwrap();

        let rewritten = json_rate_limit_rejection(response).await;
        assert_eq!(rewritten.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(rewritten.headers()["retry-after"], "2");
        assert_eq!(rewritten.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(rewritten.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Too many requests"}));
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = AppError::MethodNotAllowed.into_response();
        let passed = json_rate_limit_rejection(response).await;
        assert_eq!(passed.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
