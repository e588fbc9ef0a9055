//! Series command handler.

use std::path::Path;

use anyhow::Result;
use rmarthe_core::{MartheFieldSeries, TimeSeriesTable};

use crate::bootstrap::CliContext;
use crate::commands::Point;
use crate::error::CliError;
use crate::presentation::{format_optional, format_value, render_table};
use crate::progress::CliProgress;

/// Arguments of the series command.
pub struct SeriesArgs<'a> {
    pub rma: &'a Path,
    pub field: &'a str,
    pub points: &'a [Point],
    pub names: &'a [String],
    pub isteps: &'a [i64],
    pub chasim: Option<&'a Path>,
    pub base: usize,
}

/// One row per time step, one column per point.
pub fn series_table(table: &TimeSeriesTable) -> String {
    let mut headers = vec!["istep", "date"];
    headers.extend(table.columns.iter().map(String::as_str));
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.istep.to_string(), format_optional(row.date.as_ref(), "--")];
            cells.extend(
                row.values
                    .iter()
                    .map(|v| v.map_or_else(|| "--".to_string(), format_value)),
            );
            cells
        })
        .collect();
    render_table(&headers, &rows)
}

pub fn execute(ctx: &CliContext, args: &SeriesArgs<'_>) -> Result<()> {
    let model = ctx.load_model(args.rma)?;
    let chasim = match args.chasim {
        Some(path) => path.to_path_buf(),
        None => {
            let settings = ctx.settings(&model.layout.mldir)?;
            model.layout.in_dir(settings.effective_chasim_file())
        }
    };

    let mut series = MartheFieldSeries::new(&model, Some(&chasim)).map_err(CliError::from)?;
    let check = series.check_field(args.field);
    if !check.exists {
        return Err(CliError::Arguments(format!(
            "field '{}' not found in {}, available: {}",
            args.field,
            chasim.display(),
            series.fields().join(", ")
        ))
        .into());
    }

    let isteps = (!args.isteps.is_empty()).then_some(args.isteps);
    let progress = CliProgress::new();
    let loaded = series
        .load_field(args.field, isteps, &progress)
        .map_err(CliError::from)?;
    if loaded == 0 {
        return Err(CliError::Arguments(format!(
            "none of the requested steps of '{}' is in {}",
            args.field,
            chasim.display()
        ))
        .into());
    }

    let names = (!args.names.is_empty()).then_some(args.names);
    let table = series
        .get_tseries(args.field, args.points, names, args.base)
        .map_err(CliError::from)?;
    print!("{}", series_table(&table));
    Ok(())
}
