//! Run PEST++ on a written case.

use std::path::Path;

use anyhow::Result;
use rmarthe_pest::{OptimRegistry, pest_request};
use tracing::info;

use crate::bootstrap::{CliContext, pest_exe};
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, registry: &Path, program: Option<&str>) -> Result<()> {
    let registry = OptimRegistry::load(registry).map_err(CliError::from)?;
    let pst = registry.pst_path();
    if !pst.exists() {
        return Err(CliError::Arguments(format!(
            "{} not found, run `rmarthe optim write` first",
            pst.display()
        ))
        .into());
    }

    let mldir = registry.rma.parent().unwrap_or_else(|| Path::new("."));
    let settings = ctx.settings(mldir)?;
    let exe = pest_exe(&settings, program)?;
    info!(exe = %exe.display(), pst = %pst.display(), "Starting PEST++");

    let outcome = ctx
        .runner()
        .run(&pest_request(exe, &pst))
        .await
        .map_err(CliError::from)?;
    println!(
        "PEST++ finished in {:.1}s",
        outcome.duration.as_secs_f64()
    );
    Ok(())
}
