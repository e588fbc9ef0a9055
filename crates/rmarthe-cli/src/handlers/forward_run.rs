//! Forward run handler, the model command PEST++ calls between updates.

use std::path::Path;

use anyhow::Result;
use rmarthe_pest::{ForwardRun, OptimRegistry};

use crate::bootstrap::{CliContext, marthe_exe};
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, registry: &Path) -> Result<()> {
    let registry = OptimRegistry::load(registry).map_err(CliError::from)?;
    let mldir = registry.rma.parent().unwrap_or_else(|| Path::new("."));
    let settings = ctx.settings(mldir)?;
    let exe = marthe_exe(&settings)?;

    let report = ForwardRun::new(ctx.files(), ctx.runner(), exe, settings)
        .run(&registry)
        .await
        .map_err(CliError::from)?;
    println!(
        "Forward run done in {:.1}s: {} parameter(s) applied, {} simulated value(s) written",
        report.duration.as_secs_f64(),
        report.parameters,
        report.observations
    );
    Ok(())
}
