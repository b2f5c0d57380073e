use crate::config::{Config, ZohoCredentials};
use crate::errors::AppError;
use crate::lead_models::{LeadRecord, LeadsRequest, ZohoTokenResponse};

/// Client for the Zoho OAuth token endpoint and the CRM Leads API.
///
/// Holds no tokens: every submission exchanges the refresh token again.
#[derive(Clone)]
pub struct ZohoClient {
    client: reqwest::Client,
    accounts_url: String,
    api_url: String,
}

impl ZohoClient {
    /// Creates a new `ZohoClient`.
    ///
    /// # Arguments
    ///
    /// * `accounts_url` - Base URL of the Zoho accounts server (e.g. `https://accounts.zoho.com`).
    /// * `api_url` - Base URL of the Zoho API (e.g. `https://www.zohoapis.com`).
    pub fn new(accounts_url: String, api_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::UnhandledError(format!("Failed to create Zoho client: {}", e))
        })?;

        Ok(Self {
            client,
            accounts_url,
            api_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config.zoho_accounts_url.clone(), config.zoho_api_url.clone())
    }

    /// Exchanges the refresh token for a short-lived access token.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The access token, or `UpstreamAuthError` when
    ///   Zoho refuses the exchange or answers without a token.
    pub async fn fetch_access_token(
        &self,
        credentials: &ZohoCredentials<'_>,
    ) -> Result<String, AppError> {
        let url = format!("{}/oauth/v2/token", self.accounts_url);
        tracing::info!("Requesting Zoho access token: {}", url);

        let params = [
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("refresh_token", credentials.refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamAuthError(format!(
                "token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let token: ZohoTokenResponse = response.json().await?;

        match token.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => {
                tracing::debug!("✓ Zoho access token obtained");
                Ok(access_token)
            }
            None => Err(AppError::UpstreamAuthError(format!(
                "token response without access_token (error: {})",
                token.error.as_deref().unwrap_or("none")
            ))),
        }
    }

    /// Creates a lead in Zoho CRM.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Bearer token from [`ZohoClient::fetch_access_token`].
    /// * `lead` - The lead to create.
    ///
    /// # Returns
    ///
    /// * `Result<serde_json::Value, AppError>` - Zoho's response body, unchanged.
    pub async fn create_lead(
        &self,
        access_token: &str,
        lead: &LeadRecord,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/crm/v2/Leads", self.api_url);
        tracing::info!("Creating lead in Zoho CRM: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&LeadsRequest { data: [lead] })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamSubmitError(format!(
                "Zoho CRM returned {}: {}",
                status, error_text
            )));
        }

        let data: serde_json::Value = response.json().await?;

        tracing::info!("✓ Lead created in Zoho CRM");
        Ok(data)
    }
}
