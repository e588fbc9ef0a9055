//! Calibration working directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ensure::ensure_directory;
use super::error::PathError;

/// Directories holding PEST++ protocol files, relative to a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDirs {
    pub root: PathBuf,
    /// Parameter value files.
    pub par: PathBuf,
    /// Template files.
    pub tpl: PathBuf,
    /// Instruction files.
    pub ins: PathBuf,
    /// Simulated value files.
    pub sim: PathBuf,
}

impl WorkDirs {
    /// Standard `par/`, `tpl/`, `ins/`, `sim/` layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            par: root.join("par"),
            tpl: root.join("tpl"),
            ins: root.join("ins"),
            sim: root.join("sim"),
            root,
        }
    }

    /// Create every directory.
    pub fn ensure(&self) -> Result<(), PathError> {
        for dir in self.all() {
            ensure_directory(dir)?;
        }
        Ok(())
    }

    pub fn all(&self) -> [&Path; 4] {
        [&self.par, &self.tpl, &self.ins, &self.sim]
    }

    /// Express `path` relative to the root when possible.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_and_ensure() {
        let tmp = TempDir::new().unwrap();
        let dirs = WorkDirs::new(tmp.path());
        dirs.ensure().unwrap();
        for d in dirs.all() {
            assert!(d.is_dir());
        }
        let tpl = dirs.tpl.join("hk.tpl");
        assert_eq!(dirs.relative(&tpl), Path::new("tpl/hk.tpl"));
    }
}
