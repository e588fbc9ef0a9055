//! Table formatting utilities for CLI output.

use std::fmt::Write as _;

/// Truncates a string to a maximum length, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use rmarthe_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("permh", 10), "permh");
/// assert_eq!(truncate_string("cap_sol_progr", 8), "cap_s...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Format an optional value for table display, returning a default if None.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

/// Compact number: plain for moderate magnitudes, exponent otherwise.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "--".to_string();
    }
    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e6).contains(&magnitude) {
        let text = format!("{value:.6}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{value:.4e}")
    }
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = String::new();
    for (k, (cell, &width)) in cells.zip(widths).enumerate() {
        if k > 0 {
            out.push_str("  ");
        }
        let _ = write!(out, "{cell:<width$}");
    }
    out.trim_end().to_string()
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (k, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(k) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = table_line(headers.iter().copied(), &widths);
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1e-4), "1.0000e-4");
        assert_eq!(format_value(f64::NAN), "--");
    }

    #[test]
    fn test_render_table() {
        let rows = vec![
            vec!["0".to_string(), "1e-4".to_string()],
            vec!["10".to_string(), "2".to_string()],
        ];
        let table = render_table(&["layer", "value"], &rows);
        assert_eq!(table, "layer  value\n------------\n0      1e-4\n10     2\n");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(&3), "--"), "3");
        assert_eq!(format_optional::<i32>(None, "--"), "--");
    }
}
