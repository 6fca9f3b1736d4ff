use crate::error::{Error, Result};
use crate::file_ops;
use crate::models::{CertificateRecord, CheckOutcome};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Records stay as raw JSON until read, so an entry this version cannot
/// decode survives rewrites of its neighbours.
type Records = BTreeMap<String, Value>;

/// Issued certificates keyed by identifier, kept in one JSON file.
///
/// Every call reads the whole file and every write replaces it, so there
/// is no cross-process coordination: two concurrent writers race and the
/// later one wins.
#[derive(Debug, Clone)]
pub struct CertificateStore {
    path: PathBuf,
}

impl CertificateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CertificateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or overwrite the record under `record.id`.
    pub fn upsert(&self, record: CertificateRecord) -> Result<()> {
        let mut records = self.load()?;
        let value = serde_json::to_value(&record)?;
        if records.insert(record.id, value).is_some() {
            debug!("overwriting existing certificate record");
        }
        self.save(&records)
    }

    /// Look up a record; `None` means no usable record under `id`.
    pub fn get(&self, id: &str) -> Result<Option<CertificateRecord>> {
        let mut records = self.load()?;
        let Some(value) = records.remove(id) else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(certificate_id = %id, error = %e, "stored certificate record is malformed");
                Ok(None)
            }
        }
    }

    /// Classify a presented identifier and optional code. An empty code is
    /// treated as no code; otherwise it must match exactly.
    pub fn validate(&self, id: &str, code: Option<&str>) -> Result<CheckOutcome> {
        let Some(record) = self.get(id)? else {
            return Ok(CheckOutcome::NotFound);
        };
        match code {
            Some(c) if !c.is_empty() && c != record.verification_code => {
                Ok(CheckOutcome::InvalidCode((&record).into()))
            }
            _ => Ok(CheckOutcome::Valid(record)),
        }
    }

    fn load(&self) -> Result<Records> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "certificate store missing, starting empty");
                return Ok(Records::new());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        match serde_json::from_slice::<Records>(&bytes) {
            Ok(records) => {
                debug!(
                    path = %self.path.display(),
                    count = records.len(),
                    "loaded certificate store"
                );
                Ok(records)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "certificate store unreadable, treating as empty"
                );
                Ok(Records::new())
            }
        }
    }

    fn save(&self, records: &Records) -> Result<()> {
        let s = serde_json::to_string_pretty(records)?;
        file_ops::write_atomic(&self.path, &s)?;
        debug!(path = %self.path.display(), count = records.len(), "saved certificate store");
        Ok(())
    }
}
