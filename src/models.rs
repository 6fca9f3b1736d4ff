use crate::error::{Error, Result};
use crate::utils;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive fields printed on a certificate. Absent keys in an older
/// store file load as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateDetails {
    pub instructor: String,
    pub instructor_title: String,
    pub co_instructor: String,
    pub co_instructor_title: String,
    pub organization: String,
    #[serde(rename = "place")]
    pub venue: String,
    #[serde(rename = "certification_type")]
    pub category: String,
    #[serde(rename = "hours")]
    pub duration: String,
}

/// One issued certificate as persisted in the store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: String,
    pub verification_code: String,
    #[serde(rename = "student_name")]
    pub subject_name: String,
    pub course_name: String,
    pub issue_date: String,
    #[serde(rename = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(flatten)]
    pub details: CertificateDetails,
}

/// Everything a caller supplies to issue a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateRequest {
    pub subject_name: String,
    pub course_name: String,
    pub issue_date: String,
    pub details: CertificateDetails,
}

impl CertificateRequest {
    pub fn new(
        subject_name: impl Into<String>,
        course_name: impl Into<String>,
        issue_date: impl Into<String>,
    ) -> Self {
        CertificateRequest {
            subject_name: subject_name.into(),
            course_name: course_name.into(),
            issue_date: issue_date.into(),
            details: CertificateDetails::default(),
        }
    }

    /// Build a request from `key: value` lines.
    ///
    /// `student`, `course` and `hours` must be present; a missing `date`
    /// becomes today's ISO date.
    pub fn from_input_text(text: &str) -> Result<Self> {
        let fields = utils::parse_input_text(text);

        let missing: Vec<String> = ["student", "course", "hours"]
            .iter()
            .filter(|k| !fields.contains_key(**k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingFields { missing });
        }

        let pick = |keys: &[&str]| -> String {
            keys.iter()
                .find_map(|k| fields.get(*k).cloned())
                .unwrap_or_default()
        };

        let issue_date = match fields.get("date") {
            Some(d) if !d.is_empty() => d.clone(),
            _ => Local::now().date_naive().format("%Y-%m-%d").to_string(),
        };

        Ok(CertificateRequest {
            subject_name: pick(&["student"]),
            course_name: pick(&["course"]),
            issue_date,
            details: CertificateDetails {
                instructor: pick(&["teacher", "instructor"]),
                instructor_title: pick(&["teacher_title", "instructor_title"]),
                co_instructor: pick(&["co-teacher", "co_instructor"]),
                co_instructor_title: pick(&["co-teacher_title", "co_instructor_title"]),
                organization: pick(&["organization"]),
                venue: pick(&["place"]),
                category: pick(&["type", "certification_type"]),
                duration: pick(&["hours"]),
            },
        })
    }
}

/// Identifier and code handed back to whoever renders the certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCertificate {
    pub certificate_id: String,
    pub verification_code: String,
}

/// Result of checking a presented identifier/code pair. A wrong code only
/// gets the public fields back, never the stored code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Valid(CertificateRecord),
    InvalidCode(PublicCertificate),
    NotFound,
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, CheckOutcome::Valid(_))
    }

    /// The full record, only when the check passed.
    pub fn record(&self) -> Option<&CertificateRecord> {
        match self {
            CheckOutcome::Valid(r) => Some(r),
            _ => None,
        }
    }

    pub fn public_fields(&self) -> Option<PublicCertificate> {
        match self {
            CheckOutcome::Valid(r) => Some(r.into()),
            CheckOutcome::InvalidCode(p) => Some(p.clone()),
            CheckOutcome::NotFound => None,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Valid(_) => write!(f, "Certificate is valid"),
            CheckOutcome::InvalidCode(_) => write!(f, "Invalid verification code"),
            CheckOutcome::NotFound => write!(f, "Certificate not found"),
        }
    }
}

/// Record fields safe to show to anyone holding the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCertificate {
    pub id: String,
    pub student_name: String,
    pub course_name: String,
    pub issue_date: String,
    #[serde(flatten)]
    pub details: CertificateDetails,
}

impl From<&CertificateRecord> for PublicCertificate {
    fn from(record: &CertificateRecord) -> Self {
        PublicCertificate {
            id: record.id.clone(),
            student_name: record.subject_name.clone(),
            course_name: record.course_name.clone(),
            issue_date: record.issue_date.clone(),
            details: record.details.clone(),
        }
    }
}

/// Presentation shape of a check, as served to the validation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_data: Option<PublicCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&CheckOutcome> for ValidationReport {
    fn from(outcome: &CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Valid(record) => ValidationReport {
                valid: true,
                certificate_data: Some(record.into()),
                message: None,
            },
            other => ValidationReport {
                valid: false,
                certificate_data: None,
                message: Some(other.to_string()),
            },
        }
    }
}
