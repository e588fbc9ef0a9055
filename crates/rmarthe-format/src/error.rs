//! Internal error types for MARTHE file parsing.
//!
//! These errors carry line numbers and details about the offending content.
//! They convert to `MartheFilesError` from `rmarthe-core` for the port API.

use std::io;

use rmarthe_core::MartheFilesError;

/// Internal errors that can occur while reading or writing MARTHE files.
///
/// Line numbers are 1-based, as shown by text editors.
#[derive(Debug)]
pub enum FormatError {
    /// The file does not exist.
    FileNotFound(String),

    /// An I/O error occurred.
    Io(io::Error),

    /// A required `Key=` entry is absent from a grid header.
    MissingKey { key: &'static str, line: usize },

    /// A token could not be parsed as the expected type.
    InvalidValue { line: usize, token: String },

    /// A grid block does not hold the announced number of rows.
    RowCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// A grid row does not hold the announced number of values.
    ValueCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// A grid block is not closed by `[End_Grid]`.
    Unterminated { line: usize },

    /// A required line is absent (e.g. simulation start date).
    Missing(&'static str),

    /// An error located in a given file.
    InFile { path: String, source: Box<Self> },
}

impl FormatError {
    /// Attach the file path to an error.
    #[must_use]
    pub fn in_file(self, path: &std::path::Path) -> Self {
        match self {
            Self::InFile { .. } => self,
            other => Self::InFile {
                path: path.display().to_string(),
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn invalid(line: usize, token: impl Into<String>) -> Self {
        Self::InvalidValue {
            line,
            token: token.into(),
        }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {path}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingKey { key, line } => {
                write!(f, "Missing '{key}=' in grid header starting line {line}")
            }
            Self::InvalidValue { line, token } => {
                write!(f, "Invalid value '{token}' at line {line}")
            }
            Self::RowCount {
                line,
                expected,
                actual,
            } => write!(
                f,
                "Grid starting line {line} has {actual} data rows, expected {expected}"
            ),
            Self::ValueCount {
                line,
                expected,
                actual,
            } => write!(f, "Line {line} has {actual} values, expected {expected}"),
            Self::Unterminated { line } => {
                write!(f, "Grid starting line {line} is not closed by [End_Grid]")
            }
            Self::Missing(what) => write!(f, "Missing {what}"),
            Self::InFile { path, source } => write!(f, "{path}: {source}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InFile { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound(err.to_string())
        } else {
            Self::Io(err)
        }
    }
}

/// Convert internal errors to the domain-facing port error.
impl From<FormatError> for MartheFilesError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::FileNotFound(path) => Self::NotFound(path),
            FormatError::Io(e) => Self::Io(e.to_string()),
            FormatError::InFile { path, source } => match *source {
                FormatError::FileNotFound(_) => Self::NotFound(path),
                FormatError::Io(e) => Self::Io(format!("{path}: {e}")),
                other => Self::InvalidFormat {
                    path,
                    message: other.to_string(),
                },
            },
            other => Self::InvalidFormat {
                path: String::from("<memory>"),
                message: other.to_string(),
            },
        }
    }
}

/// Result type for internal format operations.
pub type FormatResult<T> = Result<T, FormatError>;
