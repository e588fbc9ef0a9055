//! Parameter value files: one `parnme value` line per parameter.
//!
//! PEST++ writes these from the templates before each model run; the
//! initial files are written from the registry so that a forward run can
//! be tested without PEST++.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PestError, PestResult};
use crate::text::{format_value, read_text, write_text};

fn parse_value(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse().ok())
}

/// Parse a parameter file content. Names are lowercased.
pub fn parse_parfile(path: &Path, text: &str) -> PestResult<BTreeMap<String, f64>> {
    let mut values = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let token = tokens
            .next()
            .ok_or_else(|| PestError::parse(path, idx + 1, format!("no value for '{name}'")))?;
        let value = parse_value(token)
            .ok_or_else(|| PestError::parse(path, idx + 1, format!("invalid value '{token}'")))?;
        values.insert(name.to_ascii_lowercase(), value);
    }
    Ok(values)
}

pub fn read_parfile(path: &Path) -> PestResult<BTreeMap<String, f64>> {
    parse_parfile(path, &read_text(path)?)
}

pub fn format_parfile(values: &[(String, f64)]) -> String {
    let width = values.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    values
        .iter()
        .map(|(name, value)| format!("{name:<width$}   {}\n", format_value(*value)))
        .collect()
}

pub fn write_parfile(path: &Path, values: &[(String, f64)]) -> PestResult<()> {
    write_text(path, &format_parfile(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_then_parse() {
        let values = vec![
            ("kepon_l00_z01".to_string(), -4.5),
            ("q_l00_i001_j002".to_string(), 1.0),
        ];
        let text = format_parfile(&values);
        assert!(text.starts_with("kepon_l00_z01     -4.500000000000000E0\n"));
        let parsed = parse_parfile(Path::new("hk.dat"), &text).unwrap();
        assert_eq!(parsed["kepon_l00_z01"], -4.5);
        assert_eq!(parsed["q_l00_i001_j002"], 1.0);
    }

    #[test]
    fn test_pest_written_values() {
        let text = "KEPON_L00_Z01   -4.12345678901234E+00\n\nq   1.0D-03\n";
        let parsed = parse_parfile(Path::new("hk.dat"), text).unwrap();
        assert!((parsed["kepon_l00_z01"] + 4.123_456_789_012_34).abs() < 1e-12);
        assert!((parsed["q"] - 1e-3).abs() < 1e-15);
    }

    #[test]
    fn test_missing_value_reports_line() {
        let err = parse_parfile(Path::new("hk.dat"), "a 1\nb\n").unwrap_err();
        assert!(err.to_string().contains("hk.dat, line 2"));
    }
}
