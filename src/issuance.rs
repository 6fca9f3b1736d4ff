//! The two operations collaborators call: issue a certificate and check a
//! presented identifier/code pair.

use crate::error::Result;
use crate::identity::{derive_identifier, derive_verification_code};
use crate::models::{CertificateRecord, CertificateRequest, CheckOutcome, IssuedCertificate};
use crate::storage::CertificateStore;
use chrono::Local;
use tracing::info;

/// Derive the identifier and code for `request` and persist the record.
/// Re-issuing the same subject and course within a month replaces the
/// earlier record.
pub fn issue(store: &CertificateStore, request: CertificateRequest) -> Result<IssuedCertificate> {
    let id = derive_identifier(&request.subject_name, &request.course_name, &request.issue_date);
    let code = derive_verification_code(&id, &request.subject_name, &request.course_name);

    let record = CertificateRecord {
        id: id.clone(),
        verification_code: code.clone(),
        subject_name: request.subject_name,
        course_name: request.course_name,
        issue_date: request.issue_date,
        created_at: Local::now().naive_local(),
        details: request.details,
    };
    store.upsert(record)?;
    info!(certificate_id = %id, "issued certificate");

    Ok(IssuedCertificate {
        certificate_id: id,
        verification_code: code,
    })
}

pub fn check(store: &CertificateStore, id: &str, code: Option<&str>) -> Result<CheckOutcome> {
    let outcome = store.validate(id, code)?;
    info!(certificate_id = %id, outcome = %outcome, "checked certificate");
    Ok(outcome)
}
