//! Executable validation.

use std::path::{Path, PathBuf};

use crate::error::ExecutableError;

/// Validate that `path` exists, is a file and (on unix) carries an execute bit.
pub fn validate_executable(label: &str, path: &Path) -> Result<PathBuf, ExecutableError> {
    if !path.exists() {
        return Err(ExecutableError::NotFound {
            label: label.to_string(),
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(ExecutableError::NotAFile {
            label: label.to_string(),
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path).map_err(|e| ExecutableError::Inspect {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        // Any execute bit (owner, group, or other)
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(ExecutableError::NotExecutable {
                label: label.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_not_found() {
        let result = validate_executable("marthe", Path::new("/nonexistent/marthe"));
        assert!(matches!(result, Err(ExecutableError::NotFound { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let tmp = TempDir::new().unwrap();
        let result = validate_executable("marthe", tmp.path());
        assert!(matches!(result, Err(ExecutableError::NotAFile { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("marthe");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(matches!(
            validate_executable("marthe", &exe),
            Err(ExecutableError::NotExecutable { .. })
        ));

        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(validate_executable("marthe", &exe).unwrap(), exe);
    }
}
