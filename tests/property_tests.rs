/// Property-based tests using proptest
/// Tests invariants of the service catalog and lead transformation
use proptest::prelude::*;
use zoho_lead_api::lead_mapping::{
    build_lead_record, format_services, service_label, SERVICE_CATALOG,
};
use zoho_lead_api::lead_models::{EntityType, FormData, SubmissionPayload};

fn is_known_code(code: &str) -> bool {
    SERVICE_CATALOG.iter().any(|(known, _)| *known == code)
}

// Property: unknown codes map to themselves
proptest! {
    #[test]
    fn unknown_codes_pass_through(code in "\\PC*") {
        prop_assume!(!is_known_code(&code));
        prop_assert_eq!(service_label(&code), code.as_str());
    }

    #[test]
    fn labels_are_stable_under_relabeling(code in "[a-z_]{0,25}") {
        // A label is never itself a code, so mapping twice changes nothing
        let once = service_label(&code).to_string();
        prop_assert_eq!(service_label(&once), once.as_str());
    }
}

// Property: joined output keeps the selection order
proptest! {
    #[test]
    fn format_services_preserves_order(
        indices in prop::collection::vec(0usize..SERVICE_CATALOG.len(), 0..8)
    ) {
        let codes: Vec<&str> = indices.iter().map(|i| SERVICE_CATALOG[*i].0).collect();
        let expected: Vec<&str> = indices.iter().map(|i| SERVICE_CATALOG[*i].1).collect();
        prop_assert_eq!(format_services(&codes), expected.join(", "));
    }

    #[test]
    fn format_services_never_panics(codes in prop::collection::vec("\\PC*", 0..6)) {
        let _ = format_services(&codes);
    }
}

// Property: contact fields survive every entity type
proptest! {
    #[test]
    fn phone_and_email_always_copied(
        phone in "[0-9-]{1,15}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        entity in prop::sample::select(vec!["ServiceInquiry", "FleetInquiry", "Careers", ""])
    ) {
        let payload = SubmissionPayload {
            form_data: FormData {
                phone: Some(phone.clone()),
                email: Some(email.clone()),
                ..Default::default()
            },
            entity_type: EntityType::from(entity.to_string()),
        };

        let lead = build_lead_record(&payload);
        prop_assert_eq!(lead.phone, Some(phone));
        prop_assert_eq!(lead.email, email);
    }

    #[test]
    fn service_inquiry_always_named(first in "[A-Za-z]{0,10}", last in "[A-Za-z]{0,10}") {
        let payload = SubmissionPayload {
            form_data: FormData {
                first_name: Some(first.clone()),
                last_name: Some(last.clone()),
                ..Default::default()
            },
            entity_type: EntityType::ServiceInquiry,
        };

        let lead = build_lead_record(&payload);
        let first_name = lead.first_name.unwrap();
        let last_name = lead.last_name.unwrap();
        prop_assert!(!first_name.is_empty());
        prop_assert!(!last_name.is_empty());
        if !first.is_empty() {
            prop_assert_eq!(first_name, first);
        }
        if !last.is_empty() {
            prop_assert_eq!(last_name, last);
        }
    }
}
