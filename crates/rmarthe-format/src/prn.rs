//! `historiq.prn` simulated series.
//!
//! Tab-separated. The header line starts with `Date`; every following line
//! whose first cell is a date holds one value per location column. Column
//! names are lowercased. Cells that are not numbers read as NaN.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rmarthe_core::SimulatedSeries;
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::format::{DATE_FMT, ISO_DATE_FMT, parse_number};

pub(crate) fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    let token = cell.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, DATE_FMT)
        .or_else(|_| NaiveDate::parse_from_str(token, ISO_DATE_FMT))
        .ok()
}

fn is_header(line: &str) -> bool {
    line.split('\t')
        .next()
        .is_some_and(|c| c.trim().to_ascii_lowercase().starts_with("date"))
}

/// Parse the content of a `.prn` file.
pub fn parse_prn(text: &str) -> FormatResult<SimulatedSeries> {
    let mut lines = text.lines();
    let header = lines
        .by_ref()
        .find(|l| is_header(l))
        .ok_or(FormatError::Missing("'Date' header line"))?;

    // (position in the line, name)
    let columns: Vec<(usize, String)> = header
        .split('\t')
        .enumerate()
        .skip(1)
        .map(|(pos, name)| (pos, name.trim().to_ascii_lowercase()))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    let mut series = SimulatedSeries::default();
    let mut values: BTreeMap<String, Vec<f64>> = columns
        .iter()
        .map(|(_, name)| (name.clone(), Vec::new()))
        .collect();

    for line in lines {
        let cells: Vec<&str> = line.split('\t').collect();
        let Some(date) = cells.first().and_then(|c| parse_date_cell(c)) else {
            continue;
        };
        series.dates.push(date);
        for (pos, name) in &columns {
            let value = cells
                .get(*pos)
                .and_then(|c| parse_number(c))
                .unwrap_or(f64::NAN);
            if let Some(column) = values.get_mut(name) {
                column.push(value);
            }
        }
    }

    debug!(
        columns = values.len(),
        dates = series.dates.len(),
        "Parsed simulated series"
    );
    series.columns = values;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRN: &str = "Historique des variables\n\
        Date\tTemps\tP01_Nappe\tRiv_Aval\t\n\
        \tjours\tm\tm3/s\t\n\
        01/01/2010\t0\t12.5\t0.3\t\n\
        31/01/2010\t30\t12.1\t-\t\n\
        \n\
        28/02/2010\t58\t11.9\t0.25\t\n";

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, m, d).unwrap()
    }

    #[test]
    fn test_columns_lowercased() {
        let series = parse_prn(PRN).unwrap();
        let names: Vec<&str> = series.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["p01_nappe", "riv_aval", "temps"]);
        assert_eq!(series.dates, vec![date(1, 1), date(1, 31), date(2, 28)]);
    }

    #[test]
    fn test_values_and_missing_cells() {
        let series = parse_prn(PRN).unwrap();
        assert_eq!(series.column("P01_NAPPE"), Some(&[12.5, 12.1, 11.9][..]));
        let riv = series.column("riv_aval").unwrap();
        assert!(riv[1].is_nan());
        assert_eq!(series.value_at("riv_aval", date(2, 28)), Some(0.25));
    }

    #[test]
    fn test_missing_header() {
        let err = parse_prn("01/01/2010\t1\n").unwrap_err();
        assert!(err.to_string().contains("Date"));
    }
}
