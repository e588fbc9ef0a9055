//! Observed-value files.
//!
//! Two whitespace-separated columns, `date value`. Dates are `dd/mm/yyyy`
//! or `yyyy-mm-dd`. Lines whose first token is not a date (headers,
//! comments) are skipped.

use std::path::Path;

use rmarthe_core::ObservedSeries;

use crate::error::{FormatError, FormatResult};
use crate::format::parse_number;
use crate::prn::parse_date_cell;

/// Location name of an observation file: its stem.
pub fn default_locnme(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Parse observed values for `locnme`.
pub fn parse_obs(text: &str, locnme: &str) -> FormatResult<ObservedSeries> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        if first.starts_with('#') {
            continue;
        }
        let Some(date) = parse_date_cell(first) else {
            continue;
        };
        let token = tokens
            .next()
            .ok_or_else(|| FormatError::invalid(idx + 1, line.trim()))?;
        let value = parse_number(token).ok_or_else(|| FormatError::invalid(idx + 1, token))?;
        records.push((date, value));
    }
    if records.is_empty() {
        return Err(FormatError::Missing("observation records"));
    }
    Ok(ObservedSeries::new(locnme, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_both_date_formats() {
        let text = "# piezometer P01\ndate value\n01/01/2010 12.5\n2010-02-01\t12.0\n\n";
        let series = parse_obs(text, "P01").unwrap();
        assert_eq!(series.locnme, "p01");
        assert_eq!(
            series.records,
            vec![
                (NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(), 12.5),
                (NaiveDate::from_ymd_opt(2010, 2, 1).unwrap(), 12.0),
            ]
        );
    }

    #[test]
    fn test_bad_value_reports_line() {
        let err = parse_obs("01/01/2010 abc\n", "p").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_obs("date value\n", "p").is_err());
    }

    #[test]
    fn test_default_locnme() {
        assert_eq!(default_locnme(Path::new("/obs/P01_Nappe.dat")), "p01_nappe");
    }
}
