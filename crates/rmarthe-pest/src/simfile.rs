//! Simulated-value files, read by PEST++ through the instruction files.

use std::path::Path;

use crate::error::PestResult;
use crate::parfile::{format_parfile, parse_parfile};
use crate::text::{read_text, write_text};

/// Same `name value` layout as parameter files.
pub fn write_simfile(path: &Path, values: &[(String, f64)]) -> PestResult<()> {
    write_text(path, &format_parfile(values))
}

/// Values in file order.
pub fn read_simfile(path: &Path) -> PestResult<Vec<(String, f64)>> {
    let text = read_text(path)?;
    let values = parse_parfile(path, &text)?;
    Ok(text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|n| {
            let n = n.to_ascii_lowercase();
            values.get(&n).map(|v| (n, *v))
        })
        .collect())
}
