//! Template files.
//!
//! A template mirrors a parameter file with each value replaced by a
//! `~ parnme ~` marker. PEST++ writes each parameter value over its whole
//! marker, so the marker width bounds the written precision.

use std::path::Path;

use crate::error::{PestError, PestResult};
use crate::text::write_text;

/// Marker delimiter declared on the `ptf` line.
pub const MARKER: char = '~';

/// One marker of `width` characters, delimiters included.
pub fn marker(parnme: &str, width: usize) -> PestResult<String> {
    let inner = width.saturating_sub(2);
    if parnme.len() > inner {
        return Err(PestError::MarkerTooNarrow {
            name: parnme.to_string(),
            width,
        });
    }
    Ok(format!("{MARKER}{parnme:^inner$}{MARKER}"))
}

pub fn format_template(parnmes: &[String], width: usize) -> PestResult<String> {
    let name_width = parnmes.iter().map(String::len).max().unwrap_or(0);
    let mut out = format!("ptf {MARKER}\n");
    for parnme in parnmes {
        out.push_str(&format!("{parnme:<name_width$}   {}\n", marker(parnme, width)?));
    }
    Ok(out)
}

pub fn write_template(path: &Path, parnmes: &[String], width: usize) -> PestResult<()> {
    write_text(path, &format_template(parnmes, width)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_centered() {
        assert_eq!(marker("hk", 8).unwrap(), "~  hk  ~");
        assert_eq!(marker("kepon_l00_z01", 25).unwrap().len(), 25);
        assert!(matches!(
            marker("a_very_long_parameter_name", 10),
            Err(PestError::MarkerTooNarrow { width: 10, .. })
        ));
    }

    #[test]
    fn test_template_lines() {
        let names = vec!["a".to_string(), "abc".to_string()];
        let text = format_template(&names, 9).unwrap();
        assert_eq!(text, "ptf ~\na     ~   a   ~\nabc   ~  abc  ~\n");
    }
}
