//! Error types for executable resolution.

use std::path::PathBuf;

use rmarthe_core::ProcessError;
use thiserror::Error;

/// Errors that can occur when resolving or validating an executable.
#[derive(Debug, Error)]
pub enum ExecutableError {
    /// No executable was configured and none is on `PATH`.
    #[error(
        "{label} executable not found. Set {env_var} or pass its path explicitly (looked for '{program}' on PATH)"
    )]
    NotConfigured {
        label: String,
        env_var: &'static str,
        program: String,
    },

    /// The configured path does not exist.
    #[error("{label} executable not found at: {path}")]
    NotFound { label: String, path: PathBuf },

    /// The path exists but is a directory or a special file.
    #[error("{label} path is not a file: {path}")]
    NotAFile { label: String, path: PathBuf },

    /// The file has no execute permission.
    #[error("{label} executable is not executable: {path}\n\nPlease check file permissions.")]
    NotExecutable { label: String, path: PathBuf },

    /// Metadata could not be read.
    #[error("Failed to inspect {path}: {reason}")]
    Inspect { path: PathBuf, reason: String },
}

impl From<ExecutableError> for ProcessError {
    fn from(err: ExecutableError) -> Self {
        match err {
            ExecutableError::NotConfigured { .. } | ExecutableError::NotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            ExecutableError::NotAFile { .. } | ExecutableError::NotExecutable { .. } => {
                Self::Invalid(err.to_string())
            }
            ExecutableError::Inspect { .. } => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_process_error() {
        let err = ExecutableError::NotExecutable {
            label: "marthe".into(),
            path: PathBuf::from("/opt/marthe"),
        };
        assert!(matches!(ProcessError::from(err), ProcessError::Invalid(m) if m.contains("/opt/marthe")));

        let err = ExecutableError::NotConfigured {
            label: "pest".into(),
            env_var: "RMARTHE_PEST_EXE",
            program: "pestpp-glm".into(),
        };
        assert!(matches!(ProcessError::from(err), ProcessError::NotFound(m) if m.contains("RMARTHE_PEST_EXE")));
    }
}
