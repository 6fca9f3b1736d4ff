use certifile::{
    check, derive_identifier, derive_verification_code, issue, CertificateDetails,
    CertificateRequest, CertificateStore, CheckOutcome, ValidationReport,
};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> CertificateStore {
    CertificateStore::new(dir.path().join("certificates_db.json"))
}

fn ada() -> CertificateRequest {
    CertificateRequest::new("Ada Lovelace", "Distributed Systems", "2024-03-15")
}

#[test]
fn issue_then_check_classifies_three_ways() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let issued = issue(&store, ada()).unwrap();
    assert!(issued.certificate_id.starts_with("KC-202403-"));
    assert_eq!(
        issued.verification_code,
        derive_verification_code(&issued.certificate_id, "Ada Lovelace", "Distributed Systems")
    );

    let valid = check(&store, &issued.certificate_id, Some(&issued.verification_code)).unwrap();
    assert!(valid.is_valid());
    let record = valid.record().unwrap();
    assert_eq!(record.subject_name, "Ada Lovelace");
    assert_eq!(record.issue_date, "2024-03-15");

    let wrong = check(&store, &issued.certificate_id, Some("WRONG")).unwrap();
    assert!(matches!(wrong, CheckOutcome::InvalidCode(_)));
    assert!(wrong.record().is_none());
    let public = wrong.public_fields().unwrap();
    assert_eq!(public.course_name, "Distributed Systems");
    let exposed = format!("{wrong:?}");
    assert!(!exposed.contains(&issued.verification_code));
    let report = serde_json::to_string(&ValidationReport::from(&wrong)).unwrap();
    assert!(!report.contains(&issued.verification_code));

    let missing = check(&store, "KC-000000-AAAAAA-BBBB", None).unwrap();
    assert_eq!(missing, CheckOutcome::NotFound);
}

#[test]
fn reissue_in_same_month_replaces_details() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut first = ada();
    first.details = CertificateDetails {
        instructor: "Grace Hopper".into(),
        organization: "Analytical Engines Ltd".into(),
        ..Default::default()
    };
    let a = issue(&store, first).unwrap();

    let mut second =
        CertificateRequest::new("Ada Lovelace", "Distributed Systems", "28 March, 2024");
    second.details.venue = "London".into();
    let b = issue(&store, second).unwrap();

    assert_eq!(a, b);
    let record = store.get(&a.certificate_id).unwrap().unwrap();
    assert_eq!(record.issue_date, "28 March, 2024");
    assert_eq!(record.details.venue, "London");
    assert_eq!(record.details.instructor, "");
    assert_eq!(record.details.organization, "");
}

#[test]
fn different_month_gives_a_new_identifier() {
    let a = derive_identifier("Ada Lovelace", "Distributed Systems", "2024-03-15");
    let b = derive_identifier("Ada Lovelace", "Distributed Systems", "2024-04-01");
    assert_ne!(a, b);
    assert_eq!(a.split('-').nth(2), b.split('-').nth(2));
}

#[test]
fn corrupt_store_is_not_found_then_recovers() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), [0xff, 0xfe, 0x00, b'{']).unwrap();

    let issued_id = derive_identifier("Ada Lovelace", "Distributed Systems", "2024-03-15");
    assert_eq!(check(&store, &issued_id, None).unwrap(), CheckOutcome::NotFound);

    let issued = issue(&store, ada()).unwrap();
    let text = fs::read_to_string(store.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(parsed.get(&issued.certificate_id).is_some());
}

#[test]
fn validation_report_matches_page_shape() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let issued = issue(&store, ada()).unwrap();

    let outcome = check(&store, &issued.certificate_id, Some("nope")).unwrap();
    let report = serde_json::to_value(ValidationReport::from(&outcome)).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["message"], "Invalid verification code");
    assert!(report.get("certificate_data").is_none());
}

#[test]
fn input_file_issues_like_flags() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let input = dir.path().join("input.txt");
    let text = "student: Ada Lovelace\ncourse: Distributed Systems\ndate: 2024-03-15\nhours: 40\n";
    fs::write(&input, text).unwrap();

    let request = certifile::file_ops::read_input_file(&input).unwrap();
    let from_file = issue(&store, request).unwrap();
    let from_flags = issue(&store, ada()).unwrap();
    assert_eq!(from_file, from_flags);
}
