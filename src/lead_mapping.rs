//! Pure transformation of form submissions into Zoho CRM leads.

use crate::lead_models::{EntityType, FormData, LeadRecord, SubmissionPayload};

/// Service codes offered on the forms and their display labels.
pub const SERVICE_CATALOG: [(&str, &str); 6] = [
    ("oil_change", "Oil Change"),
    ("brakes", "Brake Service"),
    ("detailing", "Auto Detailing"),
    ("preventive_maintenance", "Preventive Maintenance"),
    ("battery_services", "Battery Services"),
    ("multi_point_inspection", "Multi-Point Inspection"),
];

const DEFAULT_FIRST_NAME: &str = "Customer";
const DEFAULT_LAST_NAME: &str = "Inquiry";
const DEFAULT_VEHICLE_INFO: &str = "Not specified";
const DEFAULT_MESSAGE: &str = "No additional message";

/// Label for a service code; unknown codes are returned unchanged.
pub fn service_label(code: &str) -> &str {
    SERVICE_CATALOG
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Maps each code to its label and joins them with ", ", keeping order.
pub fn format_services<S: AsRef<str>>(codes: &[S]) -> String {
    codes
        .iter()
        .map(|code| service_label(code.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Non-empty value or the fallback. Empty strings count as missing.
fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// Builds the CRM lead for a submission.
pub fn build_lead_record(payload: &SubmissionPayload) -> LeadRecord {
    let form = &payload.form_data;
    let mut lead = LeadRecord {
        phone: form.phone.clone(),
        email: or_default(form.email.as_deref(), "").to_string(),
        ..Default::default()
    };

    match &payload.entity_type {
        EntityType::ServiceInquiry => {
            lead.first_name =
                Some(or_default(form.first_name.as_deref(), DEFAULT_FIRST_NAME).to_string());
            lead.last_name =
                Some(or_default(form.last_name.as_deref(), DEFAULT_LAST_NAME).to_string());
            lead.description = Some(service_description(form));
        }
        EntityType::FleetInquiry => {
            lead.last_name = form.business_name.clone();
            lead.description = Some(fleet_description(form));
        }
        EntityType::Other(other) => {
            tracing::warn!(
                "Unknown entity type '{}' - lead will only carry contact fields",
                other
            );
        }
    }

    lead
}

fn service_description(form: &FormData) -> String {
    format!(
        "Vehicle: {}\n\nServices: {}\n\nMessage: {}",
        or_default(form.vehicle_info.as_deref(), DEFAULT_VEHICLE_INFO),
        format_services(&form.service_type),
        or_default(form.message.as_deref(), DEFAULT_MESSAGE),
    )
}

fn fleet_description(form: &FormData) -> String {
    format!(
        "Fleet Info: {}\n\nServices: {}\n\nAdditional Details: {}",
        form.fleet_info.as_deref().unwrap_or_default(),
        format_services(&form.service_type),
        or_default(form.additional_details.as_deref(), ""),
    )
}
