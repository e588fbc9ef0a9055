//! Grid block parsing.

use std::collections::HashMap;
use std::str::FromStr;

use ndarray::Array2;
use rmarthe_core::{GridBlockSpan, GridGeometry, MartheGrid, STATIC_ISTEP};

use crate::error::{FormatError, FormatResult};
use crate::format::{
    GRID_MAGIC, SECTION_CONSTANT, SECTION_DATA, SECTION_END, SECTION_WIDTHS, keys, parse_number,
};

/// Parse every grid block of a file content.
pub fn parse_grids(text: &str) -> FormatResult<Vec<MartheGrid>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut grids = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if lines[idx].trim_start().starts_with(GRID_MAGIC) {
            let (grid, end) = parse_block(&lines, idx)?;
            grids.push(grid);
            idx = end + 1;
        } else {
            idx += 1;
        }
    }
    Ok(grids)
}

/// Parse the blocks starting at the given spans.
///
/// Lines past the last requested block are never split.
pub fn parse_spans(text: &str, spans: &[GridBlockSpan]) -> FormatResult<Vec<MartheGrid>> {
    let last = spans.iter().map(|s| s.end_line).max().unwrap_or(0);
    let lines: Vec<&str> = text.lines().take(last + 1).collect();
    spans
        .iter()
        .map(|span| {
            let (grid, _) = parse_block(&lines, span.start_line)?;
            Ok(grid)
        })
        .collect()
}

/// Header values collected while scanning a block.
#[derive(Default)]
struct PartialSpan {
    field: Option<String>,
    istep: Option<i64>,
    layer: Option<usize>,
    inest: Option<usize>,
}

impl PartialSpan {
    fn set(&mut self, key: &str, value: &str, line: usize) -> FormatResult<()> {
        match key {
            keys::FIELD => self.field = Some(value.to_string()),
            keys::TIME_STEP => self.istep = Some(parse_key(value, line)?),
            keys::LAYER => self.layer = Some(parse_key(value, line)?),
            keys::NEST_GRID => self.inest = Some(parse_key(value, line)?),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, start: usize, end: usize) -> FormatResult<GridBlockSpan> {
        let missing = |key| FormatError::MissingKey {
            key,
            line: start + 1,
        };
        Ok(GridBlockSpan {
            field: self.field.ok_or_else(|| missing(keys::FIELD))?,
            istep: self.istep.unwrap_or(STATIC_ISTEP),
            layer: self.layer.ok_or_else(|| missing(keys::LAYER))?.saturating_sub(1),
            inest: self.inest.unwrap_or(0),
            start_line: start,
            end_line: end,
        })
    }
}

/// Locate grid blocks without parsing their data.
pub fn index_grids(text: &str) -> FormatResult<Vec<GridBlockSpan>> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, PartialSpan)> = None;
    let mut in_header = false;

    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.starts_with(GRID_MAGIC) {
            if let Some((start, _)) = current {
                return Err(FormatError::Unterminated { line: start + 1 });
            }
            current = Some((n, PartialSpan::default()));
            in_header = true;
            continue;
        }
        if in_header {
            if line == SECTION_DATA || line == SECTION_CONSTANT {
                in_header = false;
            } else if let Some((_, partial)) = current.as_mut()
                && let Some((k, v)) = line.split_once('=')
            {
                partial.set(k.trim(), v.trim(), n + 1)?;
            }
        } else if line == SECTION_END
            && let Some((start, partial)) = current.take()
        {
            spans.push(partial.finish(start, n)?);
        }
    }

    if let Some((start, _)) = current {
        return Err(FormatError::Unterminated { line: start + 1 });
    }
    Ok(spans)
}

fn parse_key<T: FromStr>(value: &str, line: usize) -> FormatResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FormatError::invalid(line, value))
}

fn number(token: &str, line: usize) -> FormatResult<f64> {
    parse_number(token).ok_or_else(|| FormatError::invalid(line, token))
}

struct Header {
    entries: HashMap<String, String>,
    line: usize,
}

impl Header {
    fn raw(&self, key: &'static str) -> FormatResult<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or(FormatError::MissingKey {
                key,
                line: self.line,
            })
    }

    fn get<T: FromStr>(&self, key: &'static str) -> FormatResult<T> {
        parse_key(self.raw(key)?, self.line)
    }

    fn get_or<T: FromStr>(&self, key: &'static str, default: T) -> FormatResult<T> {
        match self.entries.get(key) {
            Some(v) if !v.is_empty() => parse_key(v, self.line),
            _ => Ok(default),
        }
    }

    fn number(&self, key: &'static str) -> FormatResult<f64> {
        number(self.raw(key)?, self.line)
    }
}

/// Parse the block whose magic line is `lines[start]`.
///
/// Returns the grid and the index of its `[End_Grid]` line.
pub fn parse_block(lines: &[&str], start: usize) -> FormatResult<(MartheGrid, usize)> {
    let first_line = start + 1;
    if !lines
        .get(start)
        .is_some_and(|l| l.trim_start().starts_with(GRID_MAGIC))
    {
        return Err(FormatError::Missing("Marthe_Grid header"));
    }

    let mut entries = HashMap::new();
    let mut idx = start + 1;
    let section = loop {
        let line = lines.get(idx).ok_or(FormatError::Unterminated { line: first_line })?.trim();
        if line == SECTION_DATA || line == SECTION_CONSTANT {
            break line;
        }
        if line == SECTION_END || line.starts_with(GRID_MAGIC) {
            return Err(FormatError::Unterminated { line: first_line });
        }
        if let Some((k, v)) = line.split_once('=') {
            entries.insert(k.trim().to_string(), v.trim().to_string());
        }
        idx += 1;
    };
    let header = Header {
        entries,
        line: first_line,
    };

    let field = header.raw(keys::FIELD)?.to_string();
    let istep = header.get_or(keys::TIME_STEP, STATIC_ISTEP)?;
    let layer = header.get::<usize>(keys::LAYER)?.saturating_sub(1);
    let inest = header.get_or(keys::NEST_GRID, 0usize)?;
    let xl = header.number(keys::X_LEFT)?;
    let yl = header.number(keys::Y_LOWER)?;
    let ncol: usize = header.get(keys::NCOLUMN)?;
    let nrow: usize = header.get(keys::NROWS)?;

    // Body lines up to [End_Grid], blank lines skipped
    let mut body: Vec<(usize, &str)> = Vec::new();
    idx += 1;
    let end = loop {
        let line = lines.get(idx).ok_or(FormatError::Unterminated { line: first_line })?.trim();
        if line == SECTION_END {
            break idx;
        }
        if line.starts_with(GRID_MAGIC) {
            return Err(FormatError::Unterminated { line: first_line });
        }
        if !line.is_empty() {
            body.push((idx + 1, line));
        }
        idx += 1;
    };

    let grid = if section == SECTION_DATA {
        parse_explicit(&body, first_line, nrow, ncol)?
    } else {
        parse_uniform(&body, first_line, nrow, ncol)?
    };
    let (values, dx, dy, uniform) = grid;
    let geometry = GridGeometry {
        layer,
        inest,
        xl,
        yl,
        dx,
        dy,
    };
    let mut grid = MartheGrid::new(field, istep, geometry, values).map_err(|_| {
        FormatError::RowCount {
            line: first_line,
            expected: nrow,
            actual: 0,
        }
    })?;
    grid.uniform = uniform;
    Ok((grid, end))
}

type Body = (Array2<f64>, Vec<f64>, Vec<f64>, bool);

fn tokens(line: usize, text: &str, expected: usize) -> FormatResult<Vec<f64>> {
    let values = text
        .split_whitespace()
        .map(|t| number(t, line))
        .collect::<FormatResult<Vec<f64>>>()?;
    if values.len() != expected {
        return Err(FormatError::ValueCount {
            line,
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// `[Data]`: xcc row, one row per grid row (`i ycc values dy`), dx row.
fn parse_explicit(body: &[(usize, &str)], first_line: usize, nrow: usize, ncol: usize) -> FormatResult<Body> {
    if body.len() != nrow + 2 {
        return Err(FormatError::RowCount {
            line: first_line,
            expected: nrow,
            actual: body.len().saturating_sub(2),
        });
    }
    let (xline, xtext) = body[0];
    tokens(xline, xtext, ncol + 2)?;

    let mut values = Vec::with_capacity(nrow * ncol);
    let mut dy = Vec::with_capacity(nrow);
    for &(line, text) in &body[1..=nrow] {
        let row = tokens(line, text, ncol + 3)?;
        values.extend_from_slice(&row[2..2 + ncol]);
        dy.push(row[ncol + 2]);
    }

    let (dline, dtext) = body[nrow + 1];
    let dx = tokens(dline, dtext, ncol + 2)?[2..].to_vec();

    let array = Array2::from_shape_vec((nrow, ncol), values).map_err(|_| FormatError::RowCount {
        line: first_line,
        expected: nrow,
        actual: dy.len(),
    })?;
    Ok((array, dx, dy, false))
}

/// `[Constant_Data]`: `Uniform_Value=`, then dx and dy widths.
fn parse_uniform(body: &[(usize, &str)], first_line: usize, nrow: usize, ncol: usize) -> FormatResult<Body> {
    let mut value = None;
    let mut widths = Vec::with_capacity(nrow + ncol);
    let mut in_widths = false;
    for &(line, text) in body {
        if text == SECTION_WIDTHS {
            in_widths = true;
        } else if in_widths {
            for t in text.split_whitespace() {
                widths.push(number(t, line)?);
            }
        } else if let Some((k, v)) = text.split_once('=')
            && k.trim() == keys::UNIFORM_VALUE
        {
            value = Some(number(v, line)?);
        }
    }
    let value = value.ok_or(FormatError::MissingKey {
        key: keys::UNIFORM_VALUE,
        line: first_line,
    })?;
    if widths.len() != ncol + nrow {
        return Err(FormatError::ValueCount {
            line: first_line,
            expected: ncol + nrow,
            actual: widths.len(),
        });
    }
    let dy = widths.split_off(ncol);
    Ok((Array2::from_elem((nrow, ncol), value), widths, dy, true))
}
