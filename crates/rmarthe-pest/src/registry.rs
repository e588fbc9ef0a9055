//! Optimisation registry.
//!
//! The registry is the single source of every PEST++ file of a case. It
//! is stored as `<root>/<name>.json` and reloaded by each command and by
//! the forward run.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rmarthe_core::WorkDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::control::ControlFile;
use crate::error::{PestError, PestResult};
use crate::instruction::write_instructions;
use crate::names::check_base_name;
use crate::observations::ObservationSet;
use crate::params::ParameterSet;
use crate::parfile::write_parfile;
use crate::template::write_template;

fn default_noptmax() -> i32 {
    0
}

/// Registered parameters and observations of one calibration case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimRegistry {
    /// Case name: `<name>.pst`, `<name>.json`.
    pub name: String,
    /// Model project file.
    pub rma: PathBuf,
    pub dirs: WorkDirs,
    #[serde(default)]
    pub parameters: Vec<ParameterSet>,
    #[serde(default)]
    pub observations: Vec<ObservationSet>,
    #[serde(default)]
    pub pestpp_options: BTreeMap<String, String>,
    #[serde(default = "default_noptmax")]
    pub noptmax: i32,
    /// Command PEST++ runs between parameter updates.
    pub model_command: String,
}

impl OptimRegistry {
    pub fn new(name: &str, rma: impl Into<PathBuf>, root: impl Into<PathBuf>) -> PestResult<Self> {
        let name = check_base_name(name, false)?;
        Ok(Self {
            model_command: format!("rmarthe forward-run {name}.json"),
            name,
            rma: rma.into(),
            dirs: WorkDirs::new(root),
            parameters: Vec::new(),
            observations: Vec::new(),
            pestpp_options: BTreeMap::new(),
            noptmax: default_noptmax(),
        })
    }

    pub fn registry_path(&self) -> PathBuf {
        self.dirs.root.join(format!("{}.json", self.name))
    }

    pub fn pst_path(&self) -> PathBuf {
        self.dirs.root.join(format!("{}.pst", self.name))
    }

    pub fn load(path: &Path) -> PestResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| PestError::io(path, &e))?;
        let registry: Self = serde_json::from_str(&text).map_err(|e| PestError::Registry {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(
            path = %path.display(),
            parameters = registry.npar(),
            observations = registry.nobs(),
            "Loaded optimisation registry"
        );
        Ok(registry)
    }

    pub fn save(&self) -> PestResult<()> {
        let path = self.registry_path();
        self.dirs.ensure()?;
        let text = serde_json::to_string_pretty(self).map_err(|e| PestError::Registry {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&path, text).map_err(|e| PestError::io(&path, &e))?;
        info!(path = %path.display(), "Saved optimisation registry");
        Ok(())
    }

    pub fn npar(&self) -> usize {
        self.parameters.iter().map(|s| s.parameters.len()).sum()
    }

    pub fn nobs(&self) -> usize {
        self.observations.iter().map(|s| s.observations.len()).sum()
    }

    /// Register a parameter set. Set and parameter names must be new.
    pub fn add_parameter_set(&mut self, set: ParameterSet) -> PestResult<()> {
        if self.parameters.iter().any(|s| s.name == set.name) {
            return Err(PestError::DuplicateSet(set.name));
        }
        let known: HashSet<&str> = self
            .parameters
            .iter()
            .flat_map(|s| s.parameters.iter().map(|p| p.parnme.as_str()))
            .collect();
        let mut seen = HashSet::new();
        for p in &set.parameters {
            if known.contains(p.parnme.as_str()) || !seen.insert(p.parnme.as_str()) {
                return Err(PestError::DuplicateParameter(p.parnme.clone()));
            }
        }
        info!(set = %set.name, count = set.parameters.len(), "Registered parameters");
        self.parameters.push(set);
        Ok(())
    }

    /// Register the observations of a location. Locations must be new.
    pub fn add_observation_set(&mut self, set: ObservationSet) -> PestResult<()> {
        if self.observations.iter().any(|s| s.locnme == set.locnme) {
            return Err(PestError::DuplicateObservation(set.locnme));
        }
        let known: HashSet<&str> = self
            .observations
            .iter()
            .flat_map(|s| s.observations.iter().map(|o| o.obsnme.as_str()))
            .collect();
        if let Some(dup) = set
            .observations
            .iter()
            .find(|o| known.contains(o.obsnme.as_str()))
        {
            return Err(PestError::DuplicateObservation(dup.obsnme.clone()));
        }
        info!(locnme = %set.locnme, count = set.observations.len(), "Registered observations");
        self.observations.push(set);
        Ok(())
    }

    pub fn set_option(&mut self, key: &str, value: &str) {
        self.pestpp_options
            .insert(key.to_ascii_lowercase(), value.to_string());
    }

    pub fn control(&self) -> ControlFile<'_> {
        ControlFile {
            dirs: &self.dirs,
            parameters: &self.parameters,
            observations: &self.observations,
            noptmax: self.noptmax,
            model_command: &self.model_command,
            pestpp_options: &self.pestpp_options,
        }
    }

    /// Regenerate every PEST++ file: initial parameter files, templates,
    /// instructions and the control file.
    pub fn write_files(&self, marker_width: usize) -> PestResult<()> {
        if self.parameters.is_empty() {
            return Err(PestError::Empty("no parameter registered".into()));
        }
        if self.observations.is_empty() {
            return Err(PestError::Empty("no observation registered".into()));
        }
        self.dirs.ensure()?;
        for set in &self.parameters {
            write_parfile(&set.parfile(&self.dirs), &set.transformed_values())?;
            write_template(&set.tplfile(&self.dirs), &set.parnmes(), marker_width)?;
        }
        for set in &self.observations {
            write_instructions(&set.insfile(&self.dirs), &set.obsnmes())?;
        }
        let pst = self.pst_path();
        self.control().write(&pst)?;
        info!(
            pst = %pst.display(),
            npar = self.npar(),
            nobs = self.nobs(),
            "Wrote PEST++ files"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::Observation;
    use crate::params::{Parameter, ParameterKind, Target};
    use chrono::NaiveDate;
    use rmarthe_core::Transform;
    use tempfile::TempDir;

    fn soil_set(name: &str, parnme: &str) -> ParameterSet {
        ParameterSet {
            name: name.into(),
            kind: ParameterKind::Soil,
            transform: Transform::None,
            derinc: 0.01,
            parameters: vec![Parameter {
                parnme: parnme.into(),
                value: 5.0,
                lbnd: 1.0,
                ubnd: 10.0,
                target: Target::Soil {
                    property: "cap".into(),
                    zone: 1,
                },
            }],
        }
    }

    fn obs_set(locnme: &str) -> ObservationSet {
        ObservationSet {
            locnme: locnme.into(),
            weight: 1.0,
            transform: Transform::None,
            observations: vec![Observation {
                obsnme: format!("{locnme}n0"),
                date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
                value: 1.0,
            }],
        }
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut reg = OptimRegistry::new("case", "mona.rma", "/calib").unwrap();
        reg.add_parameter_set(soil_set("soil", "soil_cap_z01")).unwrap();
        assert!(matches!(
            reg.add_parameter_set(soil_set("soil", "soil_cap_z02")),
            Err(PestError::DuplicateSet(_))
        ));
        assert!(matches!(
            reg.add_parameter_set(soil_set("other", "soil_cap_z01")),
            Err(PestError::DuplicateParameter(_))
        ));
        reg.add_observation_set(obs_set("p01")).unwrap();
        assert!(matches!(
            reg.add_observation_set(obs_set("p01")),
            Err(PestError::DuplicateObservation(_))
        ));
        assert_eq!((reg.npar(), reg.nobs()), (1, 1));
    }

    #[test]
    fn test_save_load_and_write_files() {
        let tmp = TempDir::new().unwrap();
        let mut reg = OptimRegistry::new("Case", tmp.path().join("mona.rma"), tmp.path()).unwrap();
        reg.add_parameter_set(soil_set("soil", "soil_cap_z01")).unwrap();
        reg.add_observation_set(obs_set("p01")).unwrap();
        reg.set_option("SVD_PACK", "redsvd");
        reg.save().unwrap();

        let loaded = OptimRegistry::load(&tmp.path().join("case.json")).unwrap();
        assert_eq!(loaded, reg);
        assert_eq!(loaded.model_command, "rmarthe forward-run case.json");

        loaded.write_files(25).unwrap();
        for file in ["par/soil.dat", "tpl/soil.tpl", "ins/p01.ins", "case.pst"] {
            assert!(tmp.path().join(file).is_file(), "{file} missing");
        }
        let pst = fs::read_to_string(tmp.path().join("case.pst")).unwrap();
        assert!(pst.contains("++svd_pack(redsvd)"));
    }

    #[test]
    fn test_write_files_needs_observations() {
        let tmp = TempDir::new().unwrap();
        let mut reg = OptimRegistry::new("case", "mona.rma", tmp.path()).unwrap();
        reg.add_parameter_set(soil_set("soil", "soil_cap_z01")).unwrap();
        assert!(matches!(reg.write_files(25), Err(PestError::Empty(_))));
    }

    #[test]
    fn test_invalid_registry_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            OptimRegistry::load(&path),
            Err(PestError::Registry { .. })
        ));
    }
}
