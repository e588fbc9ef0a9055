//! Settings domain types and validation.
//!
//! Settings are read from an optional `rmarthe.json` file in the model
//! directory, then overridden by environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Settings file looked up in the model directory.
pub const SETTINGS_FILE_NAME: &str = "rmarthe.json";

/// Environment variable naming the MARTHE executable.
pub const MARTHE_EXE_ENV: &str = "RMARTHE_MARTHE_EXE";

/// Environment variable naming the PEST++ executable.
pub const PEST_EXE_ENV: &str = "RMARTHE_PEST_EXE";

pub const DEFAULT_CHASIM_FILE: &str = "chasim.out";
pub const DEFAULT_PRN_FILE: &str = "historiq.prn";
pub const DEFAULT_PEST_PROGRAM: &str = "pestpp-glm";
pub const DEFAULT_MARTHE_PROGRAM: &str = "marthe";

/// Width of template markers, delimiters included.
pub const DEFAULT_MARKER_WIDTH: usize = 25;

/// Application settings.
///
/// All fields are optional to support partial files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path or name of the MARTHE executable.
    pub marthe_exe: Option<String>,

    /// Path or name of the PEST++ executable.
    pub pest_exe: Option<String>,

    /// Simulated fields file, relative to the model directory.
    pub chasim_file: Option<String>,

    /// Simulated series file, relative to the model directory.
    pub prn_file: Option<String>,

    /// Keep the light form when writing uniform grids.
    pub keep_uniform_fmt: Option<bool>,

    /// Width of template markers.
    pub marker_width: Option<usize>,
}

impl Settings {
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            marthe_exe: None,
            pest_exe: None,
            chasim_file: Some(DEFAULT_CHASIM_FILE.to_string()),
            prn_file: Some(DEFAULT_PRN_FILE.to_string()),
            keep_uniform_fmt: Some(true),
            marker_width: Some(DEFAULT_MARKER_WIDTH),
        }
    }

    /// Load settings from a JSON file, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::with_defaults());
        }
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let update: SettingsUpdate =
            serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let mut settings = Self::with_defaults();
        settings.merge(&update);
        validate_settings(&settings)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Override executables from the environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(exe) = std::env::var(MARTHE_EXE_ENV)
            && !exe.trim().is_empty()
        {
            self.marthe_exe = Some(exe);
        }
        if let Ok(exe) = std::env::var(PEST_EXE_ENV)
            && !exe.trim().is_empty()
        {
            self.pest_exe = Some(exe);
        }
        self
    }

    #[must_use]
    pub fn effective_chasim_file(&self) -> &str {
        self.chasim_file.as_deref().unwrap_or(DEFAULT_CHASIM_FILE)
    }

    #[must_use]
    pub fn effective_prn_file(&self) -> &str {
        self.prn_file.as_deref().unwrap_or(DEFAULT_PRN_FILE)
    }

    #[must_use]
    pub fn effective_keep_uniform_fmt(&self) -> bool {
        self.keep_uniform_fmt.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_marker_width(&self) -> usize {
        self.marker_width.unwrap_or(DEFAULT_MARKER_WIDTH)
    }

    /// Merge an update into this one, only touching fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref exe) = other.marthe_exe {
            self.marthe_exe.clone_from(exe);
        }
        if let Some(ref exe) = other.pest_exe {
            self.pest_exe.clone_from(exe);
        }
        if let Some(ref file) = other.chasim_file {
            self.chasim_file.clone_from(file);
        }
        if let Some(ref file) = other.prn_file {
            self.prn_file.clone_from(file);
        }
        if let Some(keep) = other.keep_uniform_fmt {
            self.keep_uniform_fmt = keep;
        }
        if let Some(width) = other.marker_width {
            self.marker_width = width;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    #[serde(deserialize_with = "double_option")]
    pub marthe_exe: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub pest_exe: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub chasim_file: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub prn_file: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub keep_uniform_fmt: Option<Option<bool>>,
    #[serde(deserialize_with = "double_option")]
    pub marker_width: Option<Option<usize>>,
}

/// Distinguish an explicit `null` from a missing key.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Template marker width must be between 8 and 64, got {0}")]
    InvalidMarkerWidth(usize),

    #[error("Executable path cannot be empty")]
    EmptyExecutablePath,

    #[error("File name cannot be empty: {0}")]
    EmptyFileName(&'static str),

    #[error("Failed to read settings file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid settings file {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(width) = settings.marker_width
        && !(8..=64).contains(&width)
    {
        return Err(SettingsError::InvalidMarkerWidth(width));
    }

    if [&settings.marthe_exe, &settings.pest_exe]
        .into_iter()
        .flatten()
        .any(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyExecutablePath);
    }

    if settings.chasim_file.as_ref().is_some_and(|f| f.trim().is_empty()) {
        return Err(SettingsError::EmptyFileName("chasim_file"));
    }
    if settings.prn_file.as_ref().is_some_and(|f| f.trim().is_empty()) {
        return Err(SettingsError::EmptyFileName("prn_file"));
    }

    Ok(())
}
