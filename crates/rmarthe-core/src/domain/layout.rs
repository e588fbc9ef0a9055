//! Files making up a MARTHE project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project layout read from the `.rma` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLayout {
    /// Path of the `.rma` file.
    pub rma: PathBuf,
    /// Directory holding the project.
    pub mldir: PathBuf,
    /// Project name (stem of the `.rma` file).
    pub mlname: String,
    /// Model files keyed by extension (`permh`, `pastp`, ...).
    pub files: BTreeMap<String, PathBuf>,
}

impl ModelLayout {
    /// Build a layout from `(extension, file name)` entries.
    ///
    /// Relative names are resolved against the `.rma` directory.
    pub fn new(rma: impl Into<PathBuf>, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let rma = rma.into();
        let mldir = rma
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mlname = rma
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let files = entries
            .into_iter()
            .map(|(ext, name)| {
                let p = PathBuf::from(&name);
                let resolved = if p.is_absolute() { p } else { mldir.join(p) };
                (ext.to_ascii_lowercase(), resolved)
            })
            .collect();
        Self {
            rma,
            mldir,
            mlname,
            files,
        }
    }

    pub fn file(&self, ext: &str) -> Option<&Path> {
        self.files.get(&ext.to_ascii_lowercase()).map(PathBuf::as_path)
    }

    /// File of a property, falling back to `<mldir>/<mlname>.<name>`.
    pub fn property_path(&self, name: &str) -> PathBuf {
        self.file(name).map_or_else(
            || self.mldir.join(format!("{}.{name}", self.mlname)),
            Path::to_path_buf,
        )
    }

    /// Path of a file in the project directory.
    pub fn in_dir(&self, name: &str) -> PathBuf {
        self.mldir.join(name)
    }
}
