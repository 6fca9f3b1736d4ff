//! Issue and verify completion certificates.
//!
//! A certificate's identifier is derived from the subject, course and issue
//! month; its verification code from the identifier and names. Records live
//! in a single JSON file managed by [`CertificateStore`].

pub mod config;
pub mod error;
pub mod file_ops;
pub mod identity;
pub mod issuance;
pub mod models;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};
pub use identity::{derive_identifier, derive_verification_code};
pub use issuance::{check, issue};
pub use models::{
    CertificateDetails, CertificateRecord, CertificateRequest, CheckOutcome, IssuedCertificate,
    ValidationReport,
};
pub use storage::CertificateStore;
