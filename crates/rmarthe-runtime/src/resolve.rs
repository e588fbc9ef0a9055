//! Executable path resolution.
//!
//! Precedence:
//! 1. explicit value (command line or settings file)
//! 2. environment variable (`RMARTHE_MARTHE_EXE`, `RMARTHE_PEST_EXE`)
//! 3. default program name looked up on `PATH`
//!
//! An explicit or environment value may be a path or a bare program name;
//! bare names are looked up on `PATH` too.

use std::path::{Path, PathBuf};

use rmarthe_core::settings::{
    DEFAULT_MARTHE_PROGRAM, DEFAULT_PEST_PROGRAM, MARTHE_EXE_ENV, PEST_EXE_ENV,
};
use tracing::debug;

use crate::error::ExecutableError;
use crate::validate::validate_executable;

/// Where to look for one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableSpec {
    /// Name used in logs and errors.
    pub label: &'static str,
    pub explicit: Option<String>,
    pub env_var: &'static str,
    pub default_program: String,
}

impl ExecutableSpec {
    /// MARTHE, with an optional explicit path.
    pub fn marthe(explicit: Option<String>) -> Self {
        Self {
            label: "marthe",
            explicit,
            env_var: MARTHE_EXE_ENV,
            default_program: DEFAULT_MARTHE_PROGRAM.to_string(),
        }
    }

    /// PEST++, with an optional explicit path and program (`pestpp-glm`, `pestpp-ies`, ...).
    pub fn pest(explicit: Option<String>, program: Option<&str>) -> Self {
        Self {
            label: "pest++",
            explicit,
            env_var: PEST_EXE_ENV,
            default_program: program.unwrap_or(DEFAULT_PEST_PROGRAM).to_string(),
        }
    }
}

fn is_bare_name(value: &str) -> bool {
    !value.contains(['/', '\\'])
}

fn resolve_value(label: &str, value: &str) -> Result<PathBuf, ExecutableError> {
    if is_bare_name(value) && !Path::new(value).exists() {
        return which::which(value).map_err(|_| ExecutableError::NotFound {
            label: label.to_string(),
            path: PathBuf::from(value),
        });
    }
    validate_executable(label, Path::new(value))
}

/// Resolve and validate an executable.
pub fn resolve_executable(spec: &ExecutableSpec) -> Result<PathBuf, ExecutableError> {
    resolve_with_env(spec, std::env::var(spec.env_var).ok().as_deref())
}

/// Resolution with the environment value passed in.
pub fn resolve_with_env(
    spec: &ExecutableSpec,
    env_value: Option<&str>,
) -> Result<PathBuf, ExecutableError> {
    if let Some(explicit) = spec.explicit.as_deref().filter(|v| !v.trim().is_empty()) {
        debug!(label = spec.label, value = explicit, "Using explicit executable");
        return resolve_value(spec.label, explicit.trim());
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        debug!(label = spec.label, env = spec.env_var, value, "Using executable from environment");
        return resolve_value(spec.label, value.trim());
    }

    which::which(&spec.default_program).map_err(|_| ExecutableError::NotConfigured {
        label: spec.label.to_string(),
        env_var: spec.env_var,
        program: spec.default_program.clone(),
    })
}
