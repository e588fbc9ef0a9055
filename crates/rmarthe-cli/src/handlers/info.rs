//! Info command handler.
//!
//! Summarises a MARTHE project: layout, grid, schedule and the fields
//! available in the simulated fields file.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use rmarthe_core::{MartheFieldSeries, MartheModel, Selection};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::presentation::{format_optional, render_table};

/// Text summary of a loaded model.
pub fn summary(model: &MartheModel, simulated_fields: &[&str]) -> String {
    let mut out = String::new();
    let layout = &model.layout;
    let active = model.imask.select(&Selection::all().masking(&[0.0])).len();

    let _ = writeln!(out, "Model:      {}", layout.mlname);
    let _ = writeln!(out, "Directory:  {}", layout.mldir.display());
    let _ = writeln!(
        out,
        "Grid:       {} layer(s), {} nested grid(s), {} cells ({active} active)",
        model.nlay(),
        model.nnest(),
        model.imask.len()
    );

    if model.has_schedule() {
        let dates = model.dates();
        let _ = writeln!(
            out,
            "Schedule:   {} step(s), {} to {}",
            model.nstep(),
            format_optional(dates.first(), "--"),
            format_optional(dates.last(), "--")
        );
        let _ = writeln!(
            out,
            "Pumping:    {} cell(s), {} record(s)",
            model.pump.cells().len(),
            model.pump.records.len()
        );
        let properties = model.soil.properties();
        if !properties.is_empty() {
            let _ = writeln!(out, "Soil:       {}", properties.join(", "));
        }
    } else {
        out.push_str("Schedule:   none\n");
    }

    if !simulated_fields.is_empty() {
        let _ = writeln!(out, "Simulated:  {}", simulated_fields.join(", "));
    }

    out.push('\n');
    let rows: Vec<Vec<String>> = layout
        .files
        .iter()
        .map(|(ext, path)| {
            vec![
                ext.clone(),
                path.display().to_string(),
                if path.exists() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    out.push_str(&render_table(&["file", "path", "exists"], &rows));
    out
}

/// Execute the info command.
pub fn execute(ctx: &CliContext, rma: &Path) -> Result<()> {
    let model = ctx.load_model(rma)?;
    let settings = ctx.settings(&model.layout.mldir)?;
    let chasim = model.layout.in_dir(settings.effective_chasim_file());

    let fields = match MartheFieldSeries::new(&model, Some(&chasim)) {
        Ok(series) => series.fields().into_iter().map(str::to_string).collect(),
        Err(e) => {
            debug!(path = %chasim.display(), error = %e, "No simulated fields");
            Vec::new()
        }
    };
    let names: Vec<&str> = fields.iter().map(String::as_str).collect();
    print!("{}", summary(&model, &names));
    Ok(())
}
