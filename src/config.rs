use serde::Deserialize;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.zoho.com";
const DEFAULT_API_URL: &str = "https://www.zohoapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Zoho OAuth client id. Checked per request, not at startup.
    pub zoho_client_id: Option<String>,
    pub zoho_client_secret: Option<String>,
    pub zoho_refresh_token: Option<String>,
    /// Base URL of the Zoho accounts (OAuth) server for the account's data center.
    pub zoho_accounts_url: String,
    /// Base URL of the Zoho CRM API for the account's data center.
    pub zoho_api_url: String,
}

/// Borrowed view of the three Zoho secrets, only obtainable when all are set.
#[derive(Debug, Clone, Copy)]
pub struct ZohoCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub refresh_token: &'a str,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            zoho_client_id: optional_secret("ZOHO_CLIENT_ID"),
            zoho_client_secret: optional_secret("ZOHO_CLIENT_SECRET"),
            zoho_refresh_token: optional_secret("ZOHO_REFRESH_TOKEN"),
            zoho_accounts_url: base_url("ZOHO_ACCOUNTS_URL", DEFAULT_ACCOUNTS_URL)?,
            zoho_api_url: base_url("ZOHO_API_URL", DEFAULT_API_URL)?,
        };

        // Never log the secrets themselves
        if config.credentials().is_none() {
            tracing::warn!(
                "⚠️  Zoho credentials incomplete - submissions will fail until ZOHO_CLIENT_ID, ZOHO_CLIENT_SECRET and ZOHO_REFRESH_TOKEN are set"
            );
        }
        tracing::debug!("Zoho accounts URL: {}", config.zoho_accounts_url);
        tracing::debug!("Zoho API URL: {}", config.zoho_api_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Returns the Zoho credentials if all three are present.
    pub fn credentials(&self) -> Option<ZohoCredentials<'_>> {
        Some(ZohoCredentials {
            client_id: self.zoho_client_id.as_deref()?,
            client_secret: self.zoho_client_secret.as_deref()?,
            refresh_token: self.zoho_refresh_token.as_deref()?,
        })
    }
}

/// Reads a secret; unset and blank values are both treated as absent.
fn optional_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn base_url(name: &str, default: &str) -> anyhow::Result<String> {
    let raw = std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    validate_base_url(name, &raw)
}

fn validate_base_url(name: &str, raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    url::Url::parse(trimmed).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(id: Option<&str>, secret: Option<&str>, refresh: Option<&str>) -> Config {
        Config {
            port: 3000,
            zoho_client_id: id.map(String::from),
            zoho_client_secret: secret.map(String::from),
            zoho_refresh_token: refresh.map(String::from),
            zoho_accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            zoho_api_url: DEFAULT_API_URL.to_string(),
        }
    }

    #[test]
    fn test_credentials_present() {
        let config = config_with(Some("id"), Some("secret"), Some("refresh"));
        let creds = config.credentials().expect("all three set");
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
        assert_eq!(creds.refresh_token, "refresh");
    }

    #[test]
    fn test_credentials_missing_any() {
        assert!(config_with(None, Some("s"), Some("r")).credentials().is_none());
        assert!(config_with(Some("i"), None, Some("r")).credentials().is_none());
        assert!(config_with(Some("i"), Some("s"), None).credentials().is_none());
    }

    #[test]
    fn test_base_url_validation() {
        assert_eq!(
            validate_base_url("X", "https://accounts.zoho.eu/").unwrap(),
            "https://accounts.zoho.eu"
        );
        assert_eq!(
            validate_base_url("X", "http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
        assert!(validate_base_url("X", "accounts.zoho.com").is_err());
        assert!(validate_base_url("X", "ftp://accounts.zoho.com").is_err());
    }

    #[test]
    fn test_blank_secret_is_absent() {
        std::env::set_var("ZOHO_LEAD_API_TEST_BLANK_SECRET", "   ");
        std::env::set_var("ZOHO_LEAD_API_TEST_SET_SECRET", "abc");
        std::env::remove_var("ZOHO_LEAD_API_TEST_UNSET_SECRET");

        assert_eq!(optional_secret("ZOHO_LEAD_API_TEST_BLANK_SECRET"), None);
        assert_eq!(optional_secret("ZOHO_LEAD_API_TEST_UNSET_SECRET"), None);
        assert_eq!(
            optional_secret("ZOHO_LEAD_API_TEST_SET_SECRET").as_deref(),
            Some("abc")
        );
    }
}
