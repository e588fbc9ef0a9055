//! `ProcessRunner` implementation backed by `tokio::process`.

use std::time::Instant;

use async_trait::async_trait;
use rmarthe_core::{ProcessError, ProcessRunner, RunOutcome, RunRequest};
use tracing::{debug, info, warn};

use crate::command::{spawn, spawn_log_readers};
use crate::validate::validate_executable;

/// Runs external programs to completion, streaming their output to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct ExternalRunner;

impl ExternalRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for ExternalRunner {
    async fn run(&self, request: &RunRequest) -> Result<RunOutcome, ProcessError> {
        validate_executable(&request.label, &request.program)?;
        if !request.workdir.is_dir() {
            return Err(ProcessError::Invalid(format!(
                "working directory does not exist: {}",
                request.workdir.display()
            )));
        }

        info!(
            label = %request.label,
            program = %request.program.display(),
            args = ?request.args,
            workdir = %request.workdir.display(),
            "Starting process"
        );
        let started = Instant::now();
        let mut child = spawn(request)?;
        let readers = spawn_log_readers(&mut child, &request.label);

        let status = child.wait().await.map_err(|e| {
            ProcessError::Internal(format!("failed to wait for {}: {e}", request.label))
        })?;
        // Drain the output before reporting
        for reader in readers {
            if let Err(e) = reader.await {
                warn!(label = %request.label, error = %e, "Log reader task failed");
            }
        }

        let outcome = RunOutcome {
            code: status.code(),
            duration: started.elapsed(),
        };
        if !outcome.success() {
            warn!(label = %request.label, code = ?outcome.code, "Process failed");
            return Err(ProcessError::Failed {
                label: request.label.clone(),
                code: outcome.code,
            });
        }
        debug!(
            label = %request.label,
            seconds = outcome.duration.as_secs_f64(),
            "Process finished"
        );
        Ok(outcome)
    }
}
