//! CLI-specific error types and mappings.
//!
//! Library errors are folded into a few categories, each with its own
//! process exit code.

use rmarthe_core::{CoreError, MartheFilesError, ModelError, ProcessError, SettingsError};
use rmarthe_pest::PestError;
use rmarthe_runtime::ExecutableError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Core(String),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A model or PEST++ file does not have the expected content.
    #[error("{0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// External executable missing or failed.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where a category fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Format(_) => 65,   // EX_DATAERR
            Self::Process(_) => 71,  // EX_OSERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

/// Exit code of an error returned by a handler.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

impl From<MartheFilesError> for CliError {
    fn from(err: MartheFilesError) -> Self {
        match err {
            MartheFilesError::Io(_) => Self::Io(err.to_string()),
            MartheFilesError::NotFound(_) | MartheFilesError::InvalidFormat { .. } => {
                Self::Format(err.to_string())
            }
        }
    }
}

impl From<ModelError> for CliError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Files(files) => files.into(),
            ModelError::PropertyNotLoaded(_)
            | ModelError::NodeNotFound { .. }
            | ModelError::InvalidNode(_)
            | ModelError::FieldNotLoaded(_)
            | ModelError::NameCount { .. } => Self::Arguments(err.to_string()),
            _ => Self::Format(err.to_string()),
        }
    }
}

impl From<ProcessError> for CliError {
    fn from(err: ProcessError) -> Self {
        Self::Process(err.to_string())
    }
}

impl From<ExecutableError> for CliError {
    fn from(err: ExecutableError) -> Self {
        Self::Process(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Files(files) => files.into(),
            CoreError::Process(process) => process.into(),
            CoreError::Settings(settings) => settings.into(),
            CoreError::Field(field) => Self::Format(field.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<PestError> for CliError {
    fn from(err: PestError) -> Self {
        match err {
            PestError::Io { .. } => Self::Io(err.to_string()),
            PestError::Registry { .. } => Self::Config(err.to_string()),
            PestError::Process(process) => process.into(),
            PestError::Model(model) => model.into(),
            PestError::Files(files) => files.into(),
            PestError::DuplicateParameter(_)
            | PestError::DuplicateObservation(_)
            | PestError::DuplicateSet(_)
            | PestError::InvalidName { .. }
            | PestError::InvalidValue { .. }
            | PestError::MarkerTooNarrow { .. }
            | PestError::Empty(_)
            | PestError::Bounds { .. }
            | PestError::Transform(_) => Self::Arguments(err.to_string()),
            _ => Self::Format(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
