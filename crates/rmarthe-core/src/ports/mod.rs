//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No parsing or process details in any signature
//! - Intent-based methods for the process runner

pub mod marthe_files;
pub mod process_runner;
pub mod progress;

use thiserror::Error;

pub use marthe_files::{GridWriteOptions, MartheFilesError, MartheFilesPort};
pub use process_runner::{ProcessRunner, RunOutcome, RunRequest};
pub use progress::{NoopProgress, ProgressReporter};

/// Errors raised while running an external program.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be found.
    #[error("Executable not found: {0}")]
    NotFound(String),

    /// The executable exists but cannot be run.
    #[error("Invalid executable: {0}")]
    Invalid(String),

    /// Failed to start the process.
    #[error("Failed to start {label}: {message}")]
    StartFailed { label: String, message: String },

    /// The process ran and exited with a failure status.
    #[error("{label} failed with exit code {code:?}")]
    Failed { label: String, code: Option<i32> },

    /// Internal process error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Files(#[from] MartheFilesError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Field(#[from] crate::domain::FieldError),

    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
