//! Quick grid file validation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::format::GRID_MAGIC;

/// Check that a file starts with the `Marthe_Grid` header.
///
/// Reads only the first bytes, so it is cheap on large `chasim.out` files.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use rmarthe_format::validate_grid_file;
///
/// validate_grid_file(Path::new("mona.permh")).unwrap();
/// ```
pub fn validate_grid_file(path: &Path) -> Result<(), ValidationError> {
    let mut file =
        File::open(path).map_err(|e| ValidationError::IoError(format!("cannot open file: {e}")))?;

    let mut head = [0u8; 64];
    let n = file
        .read(&mut head)
        .map_err(|e| ValidationError::IoError(format!("cannot read header: {e}")))?;

    let start = head[..n]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(n);
    let magic = GRID_MAGIC.as_bytes();
    if head[start..n].starts_with(magic) {
        Ok(())
    } else {
        let end = (start + magic.len()).min(n);
        Err(ValidationError::InvalidMagic {
            actual: String::from_utf8_lossy(&head[start..end]).into_owned(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Not a MARTHE grid file: expected 'Marthe_Grid', got '{actual}'")]
    InvalidMagic { actual: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_valid_header() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Marthe_Grid Version=9.0\nTitle=x\n").unwrap();
        file.flush().unwrap();
        assert!(validate_grid_file(file.path()).is_ok());
    }

    #[test]
    fn test_invalid_header() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"GGUF....").unwrap();
        file.flush().unwrap();
        let err = validate_grid_file(file.path()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidMagic { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = validate_grid_file(Path::new("/nonexistent/a.permh")).unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }
}
