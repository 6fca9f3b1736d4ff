use crate::error::{Error, Result};
use crate::models::CertificateRequest;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace the file at `path` with `content` via a temp file in the same
/// directory, so readers never see a half-written file. Missing parent
/// directories are created.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(temp_file.path(), e))?;
    temp_file.flush().map_err(|e| Error::io(path, e))?;
    temp_file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Read a `key: value` certificate input file into a request.
pub fn read_input_file(path: &Path) -> Result<CertificateRequest> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    CertificateRequest::from_input_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/db.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_input_file(&dir.path().join("input.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
