//! Process runner trait definition.
//!
//! This port runs an external program (MARTHE, PEST++) to completion.
//! Implementations handle spawning, log streaming and exit status.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProcessError;

/// What to run and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Executable path.
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory of the child process.
    pub workdir: PathBuf,
    /// Short name used in logs (e.g. `marthe`).
    pub label: String,
}

impl RunRequest {
    #[must_use]
    pub fn new(label: impl Into<String>, program: PathBuf, workdir: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            workdir,
            label: label.into(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub duration: Duration,
}

impl RunOutcome {
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Runs external programs to completion.
///
/// Implementations must return `ProcessError::Failed` for a non-zero exit
/// so that callers never have to inspect the outcome code themselves.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, request: &RunRequest) -> Result<RunOutcome, ProcessError>;
}
