//! Gridded property subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use rmarthe_core::{Statistic, Transform};

/// A polygon given as `x1,y1 x2,y2 ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon(pub Vec<(f64, f64)>);

pub fn parse_polygon(s: &str) -> Result<Polygon, String> {
    let vertices = s
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("expected x,y, got '{pair}'"))?;
            let x = x.parse().map_err(|_| format!("invalid x '{x}'"))?;
            let y = y.parse().map_err(|_| format!("invalid y '{y}'"))?;
            Ok((x, y))
        })
        .collect::<Result<Vec<_>, String>>()?;
    if vertices.len() < 3 {
        return Err(format!("a polygon needs at least 3 vertices, got {}", vertices.len()));
    }
    Ok(Polygon(vertices))
}

#[derive(Subcommand)]
pub enum FieldCommand {
    /// Summary of a property per layer
    Show {
        rma: PathBuf,
        /// Property name (permh, kepon, ..., or imask)
        field: String,
        /// Only this layer (0-based)
        #[arg(long)]
        layer: Option<usize>,
    },

    /// Set a property to a value on its active cells and write it back
    Set {
        rma: PathBuf,
        field: String,
        value: f64,
        #[arg(long)]
        layer: Option<usize>,
        /// Nested grid (0 for the main grid)
        #[arg(long)]
        inest: Option<usize>,
        /// Write to this file instead of the model file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Values of the cells containing a point
    Sample {
        rma: PathBuf,
        field: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, default_value_t = 0)]
        layer: usize,
    },

    /// Statistics of a property inside polygons
    ZonalStats {
        rma: PathBuf,
        field: String,
        /// Polygon as "x1,y1 x2,y2 x3,y3 ..."; repeat for several zones
        #[arg(long = "polygon", required = true, value_parser = parse_polygon)]
        polygons: Vec<Polygon>,
        /// Zone names, one per polygon
        #[arg(long = "name")]
        names: Vec<String>,
        /// Layers to aggregate (all when omitted)
        #[arg(long = "layer")]
        layers: Vec<usize>,
        /// Statistics to compute (all when omitted)
        #[arg(long = "stat")]
        stats: Vec<Statistic>,
        /// Transform applied to values before aggregation
        #[arg(long, default_value = "none")]
        trans: Transform,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
