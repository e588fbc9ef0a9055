//! Plain text file access for PEST++ files.

use std::fs;
use std::path::Path;

use crate::error::{PestError, PestResult};

pub fn read_text(path: &Path) -> PestResult<String> {
    fs::read_to_string(path).map_err(|e| PestError::io(path, &e))
}

/// Write `content`, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> PestResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PestError::io(parent, &e))?;
    }
    fs::write(path, content).map_err(|e| PestError::io(path, &e))
}

/// PEST-style number: full precision in exponent notation.
pub fn format_value(value: f64) -> String {
    format!("{value:.15E}")
}
