//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - MARTHE file formats (via rmarthe-format)
//! - External process runner (via rmarthe-runtime)
//!
//! Command handlers receive the composed `CliContext` and only see ports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmarthe_core::settings::SETTINGS_FILE_NAME;
use rmarthe_core::{MartheFilesPort, MartheModel, ProcessRunner, Settings};
use rmarthe_format::MartheFileParser;
use rmarthe_runtime::{ExecutableSpec, ExternalRunner, resolve_executable};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Settings file used instead of `<mldir>/rmarthe.json`.
    pub settings_path: Option<PathBuf>,
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub files: Arc<dyn MartheFilesPort>,
    pub runner: Arc<dyn ProcessRunner>,
    settings_path: Option<PathBuf>,
}

impl CliContext {
    pub fn files(&self) -> Arc<dyn MartheFilesPort> {
        Arc::clone(&self.files)
    }

    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }

    /// Settings of the model in `mldir`, with environment overrides.
    pub fn settings(&self, mldir: &Path) -> Result<Settings, CliError> {
        let path = self
            .settings_path
            .clone()
            .unwrap_or_else(|| mldir.join(SETTINGS_FILE_NAME));
        debug!(path = %path.display(), "Reading settings");
        Ok(Settings::load(&path)?.with_env_overrides())
    }

    /// Validate the project path and load the model.
    pub fn load_model(&self, rma: &Path) -> Result<MartheModel, CliError> {
        validate_rma(rma)?;
        Ok(MartheModel::load(rma, self.files())?)
    }
}

/// The path must name an existing `.rma` project file.
fn validate_rma(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::Arguments(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("rma") => Ok(()),
        _ => Err(CliError::Arguments(format!(
            "{} is not a .rma project file",
            path.display()
        ))),
    }
}

/// MARTHE executable: settings > environment > `PATH`.
pub fn marthe_exe(settings: &Settings) -> Result<PathBuf, CliError> {
    Ok(resolve_executable(&ExecutableSpec::marthe(
        settings.marthe_exe.clone(),
    ))?)
}

/// PEST++ executable; `program` replaces the default `pestpp-glm`.
pub fn pest_exe(settings: &Settings, program: Option<&str>) -> Result<PathBuf, CliError> {
    Ok(resolve_executable(&ExecutableSpec::pest(
        settings.pest_exe.clone(),
        program,
    ))?)
}

/// Bootstrap the CLI application with the on-disk parser and the
/// `tokio::process` runner.
pub fn bootstrap(config: CliConfig) -> CliContext {
    bootstrap_with(
        Arc::new(MartheFileParser::new()),
        Arc::new(ExternalRunner::new()),
        config,
    )
}

/// Bootstrap with custom ports (for testing).
pub fn bootstrap_with(
    files: Arc<dyn MartheFilesPort>,
    runner: Arc<dyn ProcessRunner>,
    config: CliConfig,
) -> CliContext {
    CliContext {
        files,
        runner,
        settings_path: config.settings_path,
    }
}
