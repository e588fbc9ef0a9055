//! Latin-1 text file access.
//!
//! MARTHE writes latin-1 text. Every byte maps to the Unicode code point of
//! the same value, so decoding never fails and writing back is lossless for
//! text that was read this way.

use std::fs;
use std::path::Path;

use crate::error::{FormatError, FormatResult};

/// Read a latin-1 file into a `String`.
pub fn read_latin1(path: &Path) -> FormatResult<String> {
    let bytes = fs::read(path).map_err(|e| FormatError::from(e).in_file(path))?;
    Ok(decode_latin1(&bytes))
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text as latin-1; characters outside the range become `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Write text as latin-1, creating parent directories as needed.
pub fn write_latin1(path: &Path, text: &str) -> FormatResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| FormatError::from(e).in_file(path))?;
    }
    fs::write(path, encode_latin1(text)).map_err(|e| FormatError::from(e).in_file(path))
}
