//! Error types for PEST++ file generation and forward runs.

use std::path::Path;

use chrono::NaiveDate;
use rmarthe_core::{
    FieldError, MartheFilesError, ModelError, PathError, ProcessError, TransformError,
};
use thiserror::Error;

/// Errors raised by the PEST++ protocol layer.
#[derive(Debug, Error)]
pub enum PestError {
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// A PEST++ file does not follow the expected layout.
    #[error("{path}, line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Invalid registry {path}: {reason}")]
    Registry { path: String, reason: String },

    #[error("Parameter '{0}' is already registered")]
    DuplicateParameter(String),

    #[error("Observation '{0}' is already registered")]
    DuplicateObservation(String),

    #[error("Parameter set '{0}' is already registered")]
    DuplicateSet(String),

    #[error("Parameter '{0}' is missing from its parameter file")]
    MissingParameter(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A value has no finite image through the set's transform.
    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: f64,
        reason: String,
    },

    #[error("Parameter name '{name}' does not fit in a {width}-character marker")]
    MarkerTooNarrow { name: String, width: usize },

    #[error("Nothing to register: {0}")]
    Empty(String),

    #[error("Invalid bounds for '{name}': {lbnd} <= {value} <= {ubnd} does not hold")]
    Bounds {
        name: String,
        value: f64,
        lbnd: f64,
        ubnd: f64,
    },

    #[error("Simulated series has no column '{0}'")]
    MissingSimulatedColumn(String),

    #[error("Simulated series '{locnme}' has no value on {date}")]
    MissingSimulatedDate { locnme: String, date: NaiveDate },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Files(#[from] MartheFilesError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl PestError {
    pub(crate) fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            line,
            message: message.into(),
        }
    }
}

pub type PestResult<T> = Result<T, PestError>;
