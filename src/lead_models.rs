use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body posted by the website's inquiry forms.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionPayload {
    /// Raw form fields as the web client collected them. Required: a body
    /// without it is rejected before any call to Zoho.
    #[serde(rename = "formData")]
    pub form_data: FormData,

    /// Which form produced the submission
    #[serde(rename = "entityType", default)]
    pub entity_type: EntityType,
}

/// Discriminator selecting the lead transformation rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EntityType {
    ServiceInquiry,
    FleetInquiry,
    /// Any other value; the lead only carries contact fields.
    Other(String),
}

impl Default for EntityType {
    fn default() -> Self {
        EntityType::Other(String::new())
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ServiceInquiry" => EntityType::ServiceInquiry,
            "FleetInquiry" => EntityType::FleetInquiry,
            _ => EntityType::Other(value),
        }
    }
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::ServiceInquiry => "ServiceInquiry",
            EntityType::FleetInquiry => "FleetInquiry",
            EntityType::Other(value) => value,
        }
    }
}

/// Form fields shared by the service and fleet inquiry forms.
///
/// Every field is optional; defaults are applied when the lead is built.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,

    // Service inquiry
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vehicle_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,

    // Fleet inquiry
    #[serde(default, deserialize_with = "lenient_string")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fleet_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub additional_details: Option<String>,

    /// Selected service codes, in the order the user picked them
    #[serde(default, deserialize_with = "service_codes")]
    pub service_type: Vec<String>,
}

/// Lead in Zoho CRM's field naming. Absent optional fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First_Name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "Last_Name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /crm/v2/Leads`.
#[derive(Debug, Serialize)]
pub struct LeadsRequest<'a> {
    pub data: [&'a LeadRecord; 1],
}

/// Success response relayed to the web client.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    /// Zoho CRM response body, unchanged
    pub data: Value,
}

/// Subset of the Zoho token endpoint response.
///
/// Zoho answers some refresh failures with HTTP 200 and an `error` field,
/// so `access_token` is optional here.
#[derive(Debug, Deserialize)]
pub struct ZohoTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Text form of a scalar JSON value; `null` is absent.
fn scalar_text(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a text value, got {}", other)),
    }
}

/// Accepts strings, numbers and booleans as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_text(value).map_err(serde::de::Error::custom),
    }
}

/// `service_type` arrives as an array from checkbox groups, or a single
/// value from a select. Elements get the same leniency as text fields;
/// a `null` element becomes an empty code.
fn service_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| scalar_text(item).map(Option::unwrap_or_default))
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom),
        Some(value) => Ok(scalar_text(value)
            .map_err(serde::de::Error::custom)?
            .into_iter()
            .collect()),
    }
}
