//! Command builder and log streaming.
//!
//! This module builds the child process command for a [`RunRequest`] and
//! forwards its stdout/stderr to `tracing`.

use std::process::Stdio;

use rmarthe_core::{ProcessError, RunRequest};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Build the command for a request, with piped stdio for log streaming.
pub fn build_command(request: &RunRequest) -> Command {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .current_dir(&request.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Spawn the process of a request.
pub fn spawn(request: &RunRequest) -> Result<Child, ProcessError> {
    build_command(request)
        .spawn()
        .map_err(|e| ProcessError::StartFailed {
            label: request.label.clone(),
            message: e.to_string(),
        })
}

fn stream_lines<R>(reader: R, label: String, stream: &'static str) -> JoinHandle<usize>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut count = 0;
        while let Ok(Some(text)) = lines.next_line().await {
            count += 1;
            if stream == "stderr" {
                warn!(label = %label, "stderr: {}", text);
            } else {
                info!(label = %label, "{}", text);
            }
        }
        count
    })
}

/// Spawn background tasks streaming stdout/stderr lines to `tracing`.
///
/// The tasks end when the streams close; each returns the number of lines
/// it forwarded.
pub fn spawn_log_readers(child: &mut Child, label: &str) -> Vec<JoinHandle<usize>> {
    let mut handles = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        handles.push(stream_lines(stdout, label.to_string(), "stdout"));
    }
    if let Some(stderr) = child.stderr.take() {
        handles.push(stream_lines(stderr, label.to_string(), "stderr"));
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_command_sets_workdir_and_args() {
        let request = RunRequest::new("marthe", PathBuf::from("/opt/marthe"), PathBuf::from("/m"))
            .with_arg("mona.rma");
        let cmd = build_command(&request);
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "/opt/marthe");
        assert_eq!(std_cmd.get_args().collect::<Vec<_>>(), vec!["mona.rma"]);
        assert_eq!(std_cmd.get_current_dir(), Some(std::path::Path::new("/m")));
    }

    #[tokio::test]
    async fn test_spawn_missing_program_fails_to_start() {
        let request = RunRequest::new(
            "marthe",
            PathBuf::from("/nonexistent/marthe"),
            std::env::temp_dir(),
        );
        let err = spawn(&request).unwrap_err();
        assert!(matches!(err, ProcessError::StartFailed { label, .. } if label == "marthe"));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_log_readers_count_lines() {
        let request = RunRequest::new("sh", PathBuf::from("/bin/sh"), std::env::temp_dir())
            .with_arg("-c")
            .with_arg("echo one; echo two; echo oops >&2");
        let mut child = spawn(&request).unwrap();
        let handles = spawn_log_readers(&mut child, "sh");
        child.wait().await.unwrap();
        let mut counts = Vec::new();
        for h in handles {
            counts.push(h.await.unwrap());
        }
        assert_eq!(counts, vec![2, 1]);
    }
}
