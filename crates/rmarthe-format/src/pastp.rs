//! `.pastp` schedule file.
//!
//! The file is a list of time steps. Each step opens with a
//! `*** Le pas : N : ... fin le : dd/mm/yyyy` line and carries the
//! instructions applied during that step. Lines before the first step line
//! belong to step 0.
//!
//! Only the `V=` value of pumping and soil lines is ever rewritten; every
//! other byte of the file is kept, including `\r` line ends.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use rmarthe_core::{PastpContent, PumpRecord, SoilRecord};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::format::{DATE_FMT, format_number, parse_number};

static START_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)d[ée]but\s+de\s+la\s+simulation.*?(\d{1,2}/\d{1,2}/\d{4})").unwrap()
});

static STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)le\s+pas\s*:\s*(\d+)\s*:.*?(\d{1,2}/\d{1,2}/\d{4})").unwrap()
});

static PUMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)/DEBIT/MAILLE\s+C=\s*(\d+)\s*L=\s*(\d+)\s*P=\s*(\d+)\s*V=\s*([-+0-9.eEdD]+)\s*;",
    )
    .unwrap()
});

static SOIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/([A-Z_]+)/ZONE_SOL\s+Z=\s*(\d+)\s*V=\s*([-+0-9.eEdD]+)\s*;").unwrap()
});

fn parse_date(line: usize, token: &str) -> FormatResult<NaiveDate> {
    NaiveDate::parse_from_str(token, DATE_FMT).map_err(|_| FormatError::invalid(line, token))
}

/// 1-based index in the file to 0-based.
fn index(line: usize, token: &str) -> FormatResult<usize> {
    token
        .parse::<usize>()
        .ok()
        .and_then(|v| v.checked_sub(1))
        .ok_or_else(|| FormatError::invalid(line, token))
}

fn value(line: usize, caps: &Captures<'_>, group: usize) -> FormatResult<f64> {
    let token = &caps[group];
    parse_number(token).ok_or_else(|| FormatError::invalid(line, token))
}

/// Parse a schedule file content.
pub fn parse_pastp(text: &str) -> FormatResult<PastpContent> {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut content = PastpContent::default();
    let mut istep = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;
        if content.dates.is_empty() {
            if let Some(caps) = START_DATE.captures(line) {
                content.dates.push(parse_date(lineno, &caps[1])?);
            }
            continue;
        }
        if let Some(caps) = STEP.captures(line) {
            istep = caps[1]
                .parse()
                .map_err(|_| FormatError::invalid(lineno, &caps[1]))?;
            content.dates.push(parse_date(lineno, &caps[2])?);
            continue;
        }
        if let Some(caps) = PUMP.captures(line) {
            content.pumping.push(PumpRecord {
                istep,
                j: index(lineno, &caps[1])?,
                i: index(lineno, &caps[2])?,
                layer: index(lineno, &caps[3])?,
                value: value(lineno, &caps, 4)?,
                line: idx,
            });
        } else if let Some(caps) = SOIL.captures(line) {
            content.soil.push(SoilRecord {
                istep,
                property: caps[1].to_ascii_lowercase(),
                zone: caps[2]
                    .parse()
                    .map_err(|_| FormatError::invalid(lineno, &caps[2]))?,
                value: value(lineno, &caps, 3)?,
                line: idx,
            });
        }
    }

    if content.dates.is_empty() {
        return Err(FormatError::Missing("simulation start date"));
    }
    debug!(
        steps = content.dates.len() - 1,
        pumping = content.pumping.len(),
        soil = content.soil.len(),
        "Parsed schedule"
    );
    content.lines = lines;
    Ok(content)
}

fn value_range(regex: &Regex, group: usize, line: &str) -> Option<Range<usize>> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(group))
        .map(|m| m.range())
}

fn replace_value(
    lines: &mut [String],
    line: usize,
    regex: &Regex,
    group: usize,
    value: f64,
) -> FormatResult<()> {
    let target = lines
        .get_mut(line)
        .ok_or(FormatError::Missing("schedule line"))?;
    let range = value_range(regex, group, target)
        .ok_or_else(|| FormatError::invalid(line + 1, target.trim().to_string()))?;
    target.replace_range(range, &format_number(value));
    Ok(())
}

/// Render a schedule with the record values written back on their lines.
pub fn format_pastp(content: &PastpContent) -> FormatResult<String> {
    let mut lines = content.lines.clone();
    for record in &content.pumping {
        replace_value(&mut lines, record.line, &PUMP, 4, record.value)?;
    }
    for record in &content.soil {
        replace_value(&mut lines, record.line, &SOIL, 3, record.value)?;
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASTP: &str = "Modèle Mona
 *** Début de la simulation    à la date : 01/01/2010 ; ***
  /CAP_SOL_PROGR/ZONE_SOL      Z=      1V=     100;
  /DEBIT/MAILLE      C=   12L=   34P=    2V=     -0.5;
 /*****
 *** Le pas :     1: fin le : 31/01/2010 ; durée : 30 jours
  /DEBIT/MAILLE      C=   12L=   34P=    2V=     -1.5D-01;
  /RUISSEL/ZONE_SOL      Z=      3V=     0.2;
 /*****
 *** Le pas :     2: fin le : 28/02/2010 ; durée : 28 jours
 ***        :     Fin de la simulation :
";

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, m, d).unwrap()
    }

    #[test]
    fn test_dates_and_steps() {
        let content = parse_pastp(PASTP).unwrap();
        assert_eq!(content.dates, vec![date(1, 1), date(1, 31), date(2, 28)]);
        assert_eq!(content.pumping.len(), 2);
        assert_eq!(content.pumping[0].istep, 0);
        assert_eq!(content.pumping[1].istep, 1);
        assert_eq!(content.soil[1].istep, 1);
    }

    #[test]
    fn test_pump_indices_are_zero_based() {
        let content = parse_pastp(PASTP).unwrap();
        let rec = content.pumping[1];
        assert_eq!((rec.layer, rec.i, rec.j), (1, 33, 11));
        assert!((rec.value + 0.15).abs() < 1e-12);
        assert_eq!(rec.line, 6);
    }

    #[test]
    fn test_soil_records() {
        let content = parse_pastp(PASTP).unwrap();
        assert_eq!(content.soil[0].property, "cap_sol_progr");
        assert_eq!(content.soil[0].zone, 1);
        assert_eq!(content.soil[1].property, "ruissel");
        assert_eq!(content.soil[1].zone, 3);
        assert!((content.soil[1].value - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_unchanged_content_is_byte_identical() {
        let content = parse_pastp(PASTP).unwrap();
        let mut same = content.clone();
        same.pumping.clear();
        same.soil.clear();
        assert_eq!(format_pastp(&same).unwrap(), PASTP);
    }

    #[test]
    fn test_only_values_are_rewritten() {
        let mut content = parse_pastp(PASTP).unwrap();
        content.pumping[1].value = -3.0;
        content.soil[0].value = 42.0;
        let out = format_pastp(&content).unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[2], "  /CAP_SOL_PROGR/ZONE_SOL      Z=      1V=     42;");
        assert_eq!(lines[6], "  /DEBIT/MAILLE      C=   12L=   34P=    2V=     -3;");
        assert_eq!(lines[5], " *** Le pas :     1: fin le : 31/01/2010 ; durée : 30 jours");

        let back = parse_pastp(&out).unwrap();
        assert!((back.pumping[1].value + 3.0).abs() < 1e-12);
        assert!((back.soil[0].value - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_crlf_is_preserved() {
        let text = PASTP.replace('\n', "\r\n");
        let mut content = parse_pastp(&text).unwrap();
        content.pumping[0].value = -2.0;
        let out = format_pastp(&content).unwrap();
        assert_eq!(out.matches("\r\n").count(), text.matches("\r\n").count());
        assert!(out.contains("V=     -2;\r\n"));
    }

    #[test]
    fn test_missing_start_date() {
        let err = parse_pastp(" /DEBIT/MAILLE C= 1 L= 1 P= 1 V= 1;\n").unwrap_err();
        assert!(matches!(err, FormatError::Missing(_)));
    }

    #[test]
    fn test_zero_index_is_invalid() {
        let text = " *** Début de la simulation : 01/01/2010\n /DEBIT/MAILLE C= 0 L= 1 P= 1 V= 1;\n";
        let err = parse_pastp(text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
