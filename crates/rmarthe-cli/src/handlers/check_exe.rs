//! Report which executables would be used.

use std::path::Path;

use anyhow::Result;

use crate::bootstrap::{CliContext, marthe_exe, pest_exe};
use crate::error::CliError;

fn line(label: &str, resolved: &Result<std::path::PathBuf, CliError>) -> String {
    match resolved {
        Ok(path) => format!("{label:<8} {}", path.display()),
        Err(e) => format!("{label:<8} missing ({e})"),
    }
}

pub fn execute(ctx: &CliContext, dir: &Path) -> Result<()> {
    let settings = ctx.settings(dir)?;
    let marthe = marthe_exe(&settings);
    let pest = pest_exe(&settings, None);
    println!("{}", line("MARTHE", &marthe));
    println!("{}", line("PEST++", &pest));

    marthe?;
    pest?;
    Ok(())
}
