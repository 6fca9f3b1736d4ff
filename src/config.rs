//! Environment-driven settings.

use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "CERT_DB_PATH";
pub const DEFAULT_DB_PATH: &str = "data/certificates_db.json";

/// Location of the certificate store file.
pub fn db_path() -> PathBuf {
    std::env::var_os(DB_PATH_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}
