//! Progress reporting for long reads and runs.
//!
//! Adapters receive progress updates without the core depending on any
//! terminal or UI library.

/// Receives progress updates during long-running operations.
pub trait ProgressReporter: Send + Sync {
    /// Called when an operation starts, with the number of steps if known.
    fn start(&self, message: &str, total: Option<u64>);

    /// Called to update progress.
    fn update(&self, current: u64, total: Option<u64>);

    /// Log a message during the operation.
    fn message(&self, msg: &str);

    fn finish(&self, message: &str);

    fn finish_with_error(&self, message: &str);
}

/// Progress reporter that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _message: &str, _total: Option<u64>) {}
    fn update(&self, _current: u64, _total: Option<u64>) {}
    fn message(&self, _msg: &str) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_progress_does_not_panic() {
        let progress = NoopProgress;
        progress.start("Reading chasim.out", Some(10));
        progress.update(5, Some(10));
        progress.message("halfway");
        progress.finish("Done");
        progress.finish_with_error("Failed");
    }
}
