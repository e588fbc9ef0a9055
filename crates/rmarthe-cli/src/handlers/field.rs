//! Field command handlers.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use rmarthe_core::{
    CellRecord, MartheField, MartheModel, Selection, Statistic, ZonalStat, ZonalStatsRequest,
    zonal_stats,
};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::field_commands::{FieldCommand, Polygon};
use crate::presentation::{format_value, render_table};

const SUMMARY_STATS: [Statistic; 4] = [
    Statistic::Count,
    Statistic::Min,
    Statistic::Max,
    Statistic::Mean,
];

/// Dispatch a field subcommand.
pub fn execute(ctx: &CliContext, command: FieldCommand) -> Result<()> {
    match command {
        FieldCommand::Show { rma, field, layer } => show(ctx, &rma, &field, layer),
        FieldCommand::Set {
            rma,
            field,
            value,
            layer,
            inest,
            output,
        } => set(ctx, &rma, &field, value, layer, inest, output.as_deref()),
        FieldCommand::Sample {
            rma,
            field,
            x,
            y,
            layer,
        } => sample(ctx, &rma, &field, x, y, layer),
        FieldCommand::ZonalStats {
            rma,
            field,
            polygons,
            names,
            layers,
            stats,
            trans,
            json,
        } => {
            let request = ZonalStatsRequest {
                stats: if stats.is_empty() {
                    Statistic::ALL.to_vec()
                } else {
                    stats
                },
                polygons: polygons.into_iter().map(|Polygon(p)| p).collect(),
                layers: (!layers.is_empty()).then_some(layers),
                names: (!names.is_empty()).then_some(names),
                transform: trans,
            };
            zonal(ctx, &rma, &field, &request, json)
        }
    }
}

/// Load the model and the property unless it is the mask.
fn load_with_property(ctx: &CliContext, rma: &Path, field: &str) -> Result<MartheModel> {
    let mut model = ctx.load_model(rma)?;
    if !field.eq_ignore_ascii_case("imask") {
        model.load_property(field).map_err(CliError::from)?;
    }
    Ok(model)
}

/// Per layer summary of the active cells of a field.
pub fn layer_summary(field: &MartheField, layer: Option<usize>) -> String {
    let layers: Vec<usize> = layer.map_or_else(|| (0..field.maxlayer()).collect(), |l| vec![l]);
    let rows: Vec<Vec<String>> = layers
        .into_iter()
        .map(|l| {
            let values: Vec<f64> = field
                .select(&Selection::all().layer(l).unmasked())
                .iter()
                .map(|r| r.value)
                .collect();
            let mut row = vec![l.to_string()];
            row.extend(SUMMARY_STATS.iter().map(|s| format_value(s.apply(&values))));
            row
        })
        .collect();
    let mut headers = vec!["layer".to_string()];
    headers.extend(SUMMARY_STATS.iter().map(ToString::to_string));
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    render_table(&headers, &rows)
}

fn show(ctx: &CliContext, rma: &Path, field: &str, layer: Option<usize>) -> Result<()> {
    let model = load_with_property(ctx, rma, field)?;
    let property = model.property(field).map_err(CliError::from)?;
    if let Some(l) = layer
        && l >= property.maxlayer()
    {
        return Err(CliError::Arguments(format!(
            "layer {l} out of range, '{field}' has {} layer(s)",
            property.maxlayer()
        ))
        .into());
    }
    println!("{} ({} cells)", property.name, property.len());
    print!("{}", layer_summary(property, layer));
    Ok(())
}

fn set(
    ctx: &CliContext,
    rma: &Path,
    field: &str,
    value: f64,
    layer: Option<usize>,
    inest: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    if field.eq_ignore_ascii_case("imask") {
        return Err(CliError::Arguments("the active cell mask cannot be edited".into()).into());
    }
    let mut model = load_with_property(ctx, rma, field)?;
    let settings = ctx.settings(&model.layout.mldir)?;
    let changed = model
        .property_mut(field)
        .map_err(CliError::from)?
        .set_value(value, layer, inest);
    model
        .write_property(field, output, settings.effective_keep_uniform_fmt())
        .map_err(CliError::from)?;
    println!("Set {changed} cell(s) of {field} to {}", format_value(value));
    Ok(())
}

/// Table of sampled cells.
pub fn cell_table(cells: &[CellRecord]) -> String {
    let rows: Vec<Vec<String>> = cells
        .iter()
        .map(|c| {
            vec![
                c.layer.to_string(),
                c.inest.to_string(),
                c.i.to_string(),
                c.j.to_string(),
                format_value(c.x),
                format_value(c.y),
                format_value(c.value),
            ]
        })
        .collect();
    render_table(&["layer", "inest", "i", "j", "x", "y", "value"], &rows)
}

fn sample(ctx: &CliContext, rma: &Path, field: &str, x: f64, y: f64, layer: usize) -> Result<()> {
    let model = load_with_property(ctx, rma, field)?;
    let property = model.property(field).map_err(CliError::from)?;
    let cells: Vec<CellRecord> = property
        .sample(x, y, layer, &[])
        .into_iter()
        .map(|n| property.records()[n])
        .collect();
    if cells.is_empty() {
        println!("No cell of {field} contains ({x}, {y}) in layer {layer}");
    } else {
        print!("{}", cell_table(&cells));
    }
    Ok(())
}

/// Table of zonal statistics, one row per zone and layer.
pub fn zonal_table(results: &[ZonalStat], stats: &[Statistic]) -> String {
    let mut headers = vec!["zone".to_string(), "layer".to_string()];
    headers.extend(stats.iter().map(ToString::to_string));
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|z| {
            let mut row = vec![z.zone.clone(), z.layer.to_string()];
            row.extend(
                stats
                    .iter()
                    .map(|s| z.get(*s).map_or_else(|| "--".to_string(), format_value)),
            );
            row
        })
        .collect();
    render_table(&headers, &rows)
}

fn zonal(
    ctx: &CliContext,
    rma: &Path,
    field: &str,
    request: &ZonalStatsRequest,
    json: bool,
) -> Result<()> {
    let model = load_with_property(ctx, rma, field)?;
    let property = model.property(field).map_err(CliError::from)?;
    let results = zonal_stats(property, request).map_err(|e| CliError::Arguments(e.to_string()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let mut out = String::new();
        let _ = writeln!(out, "{} zone(s) on {}", request.polygons.len(), property.name);
        out.push_str(&zonal_table(&results, &request.stats));
        print!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zonal_table_missing_stat() {
        let results = vec![ZonalStat {
            zone: "north".into(),
            layer: 0,
            values: vec![(Statistic::Mean, 2.5)],
        }];
        let out = zonal_table(&results, &[Statistic::Mean, Statistic::Max]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("mean"));
        assert!(lines[0].contains("max"));
        assert!(lines.last().unwrap().contains("north"));
        assert!(lines.last().unwrap().contains("2.5"));
        assert!(lines.last().unwrap().contains("--"));
    }

    #[test]
    fn test_cell_table() {
        let cells = [CellRecord {
            layer: 1,
            inest: 0,
            i: 2,
            j: 3,
            x: 25.0,
            y: 5.0,
            value: 1e-4,
        }];
        let out = cell_table(&cells);
        assert!(out.lines().next().unwrap().starts_with("layer"));
        assert!(out.contains("1.0000e-4"));
    }
}
