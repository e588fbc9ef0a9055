//! Instruction files.
//!
//! Simulated-value files hold one `obsnme value` line per observation;
//! each instruction moves one line down, skips the name and reads the
//! value.

use std::path::Path;

use crate::error::PestResult;
use crate::text::write_text;

/// Marker delimiter declared on the `pif` line.
pub const MARKER: char = '~';

pub fn format_instructions(obsnmes: &[String]) -> String {
    let mut out = format!("pif {MARKER}\n");
    for obsnme in obsnmes {
        out.push_str(&format!("l1 w !{obsnme}!\n"));
    }
    out
}

pub fn write_instructions(path: &Path, obsnmes: &[String]) -> PestResult<()> {
    write_text(path, &format_instructions(obsnmes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_observation() {
        let text = format_instructions(&["p01n0".to_string(), "p01n1".to_string()]);
        assert_eq!(text, "pif ~\nl1 w !p01n0!\nl1 w !p01n1!\n");
    }
}
