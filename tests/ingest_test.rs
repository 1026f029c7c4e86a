//! Tests for relation payload ingestion

use rstest::rstest;

use refnet::application::ingest::parse_entries;
use refnet::application::ApplicationError;
use refnet::domain::{DomainError, RelationEntry};

#[test]
fn given_camel_case_export_when_parsing_then_maps_all_fields() {
    let json = r#"[
        {"id": "u1", "referrerId": null, "level": 1, "displayName": "Uma", "email": "uma@example.com", "qualifies": true},
        {"id": "u2", "referrerId": "u1", "level": 2, "displayName": "Ugo", "email": "ugo@example.com", "qualifies": false}
    ]"#;

    let entries = parse_entries(json).unwrap();

    assert_eq!(
        entries[0],
        RelationEntry::new("u1", None, 1)
            .with_name("Uma")
            .with_email("uma@example.com")
            .qualified(true)
    );
    assert_eq!(entries[1].referrer_id.as_deref(), Some("u1"));
    assert_eq!(entries[1].level, 2);
}

#[rstest]
#[case(r#"{"entries": [{"id": "a"}]}"#)]
#[case(r#"{"data": [{"id": "a"}], "total": 1}"#)]
#[case(r#"[{"id": "a"}]"#)]
fn given_supported_shapes_when_parsing_then_reads_rows(#[case] json: &str) {
    let entries = parse_entries(json).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "a");
    assert_eq!(entries[0].level, 0);
    assert_eq!(entries[0].referrer_id, None);
}

#[test]
fn given_snake_case_and_numeric_ids_when_parsing_then_coerces() {
    let json = r#"[{"id": 12, "referrer_id": 11, "level": "3", "qualifies": "yes"}]"#;

    let entries = parse_entries(json).unwrap();

    assert_eq!(entries[0].id, "12");
    assert_eq!(entries[0].referrer_id.as_deref(), Some("11"));
    assert_eq!(entries[0].level, 3);
    assert!(entries[0].qualifies);
}

#[test]
fn given_blank_referrer_when_parsing_then_treated_as_root_referral() {
    let entries = parse_entries(r#"[{"id": "a", "referrerId": "  ", "level": 1}]"#).unwrap();

    assert_eq!(entries[0].referrer_id, None);
}

#[rstest]
#[case(r#"[{"id": ""}]"#, "missing or empty id")]
#[case(r#"[{"id": "a", "level": -1}]"#, "level")]
#[case(r#"[{"id": "a", "referrerId": ["x"]}]"#, "referrerId")]
#[case(r#"[{"id": "a", "qualifies": "maybe"}]"#, "qualifies")]
#[case(r#"["a"]"#, "expected object")]
fn given_bad_row_when_parsing_then_reports_invalid_entry(#[case] json: &str, #[case] reason: &str) {
    let err = parse_entries(json).unwrap_err();

    match err {
        ApplicationError::Domain(DomainError::InvalidEntry { index, reason: got }) => {
            assert_eq!(index, 0);
            assert!(got.contains(reason), "{} does not mention {}", got, reason);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[rstest]
#[case("not json")]
#[case(r#"{"rows": []}"#)]
#[case("42")]
fn given_unusable_payload_when_parsing_then_reports_payload_error(#[case] json: &str) {
    let err = parse_entries(json).unwrap_err();

    assert!(matches!(err, ApplicationError::Payload { .. }), "{:?}", err);
}
