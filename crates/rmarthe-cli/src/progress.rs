//! Terminal progress for long reads (`chasim.out` steps).

use std::sync::{Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use rmarthe_core::ProgressReporter;

/// CLI progress reporter with terminal progress bars.
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub const fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliProgress {
    fn start(&self, message: &str, total: Option<u64>) {
        let pb = match total {
            Some(t) if t > 0 => Self::create_bar(t),
            _ => Self::create_spinner(),
        };
        pb.set_message(message.to_string());
        *self.guard() = Some(pb);
    }

    fn update(&self, current: u64, total: Option<u64>) {
        if let Some(ref pb) = *self.guard() {
            if let Some(t) = total {
                pb.set_length(t);
            }
            pb.set_position(current);
        }
    }

    fn message(&self, msg: &str) {
        match *self.guard() {
            Some(ref pb) => pb.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn finish(&self, message: &str) {
        if let Some(pb) = self.guard().take() {
            pb.finish_with_message(message.to_string());
        }
    }

    fn finish_with_error(&self, message: &str) {
        if let Some(pb) = self.guard().take() {
            pb.abandon_with_message(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_lifecycle() {
        let progress = CliProgress::new();
        progress.update(1, None);
        progress.start("Loading CHARGE", Some(3));
        progress.update(2, Some(3));
        progress.message("step 2");
        progress.finish("Loaded 3 steps");
        assert!(progress.guard().is_none());

        progress.start("Loading", None);
        progress.finish_with_error("failed");
        assert!(progress.guard().is_none());
    }
}
