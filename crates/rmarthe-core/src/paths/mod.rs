//! Path utilities for calibration directories.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod ensure;
mod error;
mod workdirs;

pub use ensure::ensure_directory;
pub use error::PathError;
pub use workdirs::WorkDirs;
