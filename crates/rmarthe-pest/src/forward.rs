//! Forward run: the model command PEST++ invokes between two parameter
//! updates.
//!
//! 1. read the parameter files written by PEST++ and back-transform
//! 2. update the model files (zpc properties, schedule)
//! 3. run MARTHE through the [`ProcessRunner`] port
//! 4. read `historiq.prn` and write one simulated-value file per location

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rmarthe_core::{
    MartheFilesPort, MartheModel, ProcessRunner, RunRequest, Settings, SimulatedSeries,
};
use tracing::{debug, info};

use crate::error::{PestError, PestResult};
use crate::observations::ObservationSet;
use crate::params::{ParameterKind, ParameterSet, Target, read_izone};
use crate::parfile::read_parfile;
use crate::registry::OptimRegistry;
use crate::simfile::write_simfile;

/// Summary of a completed forward run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReport {
    pub parameters: usize,
    pub observations: usize,
    /// MARTHE run time.
    pub duration: Duration,
}

/// Current parameter values of a set, back-transformed.
pub fn read_parameter_values(set: &ParameterSet, parfile: &Path) -> PestResult<Vec<f64>> {
    let values = read_parfile(parfile)?;
    set.parameters
        .iter()
        .map(|p| {
            values
                .get(&p.parnme)
                .map(|v| set.transform.back(*v))
                .ok_or_else(|| PestError::MissingParameter(p.parnme.clone()))
        })
        .collect()
}

/// Write parameter values into the model files.
///
/// Zpc sets rewrite their property file; pumping and soil sets update the
/// schedule, written once at the end.
pub fn apply_parameters(
    registry: &OptimRegistry,
    model: &mut MartheModel,
    keep_uniform_fmt: bool,
) -> PestResult<usize> {
    let mut count = 0;
    let mut schedule_changed = false;
    for set in &registry.parameters {
        let values = read_parameter_values(set, &set.parfile(&registry.dirs))?;
        count += values.len();
        match &set.kind {
            ParameterKind::Zpc { field, izone, .. } => {
                let izone = read_izone(model, izone)?;
                let zpc: Vec<(usize, i64, f64)> = set
                    .parameters
                    .iter()
                    .zip(&values)
                    .filter_map(|(p, v)| match p.target {
                        Target::Zpc { layer, zone } => {
                            i64::try_from(zone).ok().map(|z| (layer, z, *v))
                        }
                        _ => None,
                    })
                    .collect();
                model.load_property(field)?;
                let cells = model.property_mut(field)?.set_from_zpc(&zpc, &izone)?;
                debug!(field = %field, zones = zpc.len(), cells, "Applied zpc parameters");
                model.write_property(field, None, keep_uniform_fmt)?;
            }
            ParameterKind::Pump => {
                for (p, factor) in set.parameters.iter().zip(&values) {
                    if let Target::Pump { layer, i, j, rates } = &p.target {
                        for (istep, rate) in rates {
                            model
                                .pump
                                .set_value(*layer, *i, *j, Some(&[*istep]), rate * factor);
                        }
                    }
                }
                schedule_changed = true;
            }
            ParameterKind::Soil => {
                for (p, value) in set.parameters.iter().zip(&values) {
                    if let Target::Soil { property, zone } = &p.target {
                        model.soil.set_value(property, *zone, *value);
                    }
                }
                schedule_changed = true;
            }
        }
    }
    if schedule_changed {
        model.write_schedule(None)?;
    }
    Ok(count)
}

/// Simulated values of an observation set, transformed like the observed ones.
pub fn simulated_values(
    set: &ObservationSet,
    simulated: &SimulatedSeries,
) -> PestResult<Vec<(String, f64)>> {
    if simulated.column(&set.locnme).is_none() {
        return Err(PestError::MissingSimulatedColumn(set.locnme.clone()));
    }
    set.observations
        .iter()
        .map(|o| {
            let value = simulated.value_at(&set.locnme, o.date).ok_or_else(|| {
                PestError::MissingSimulatedDate {
                    locnme: set.locnme.clone(),
                    date: o.date,
                }
            })?;
            let transformed = set.transform.apply(value);
            if !transformed.is_finite() {
                return Err(PestError::InvalidValue {
                    name: o.obsnme.clone(),
                    value,
                    reason: format!(
                        "simulated on {} with {} transform",
                        o.date,
                        set.transform.as_str()
                    ),
                });
            }
            Ok((o.obsnme.clone(), transformed))
        })
        .collect()
}

/// Runs one forward model evaluation for a registry.
pub struct ForwardRun {
    files: Arc<dyn MartheFilesPort>,
    runner: Arc<dyn ProcessRunner>,
    marthe_exe: PathBuf,
    settings: Settings,
}

impl ForwardRun {
    pub fn new(
        files: Arc<dyn MartheFilesPort>,
        runner: Arc<dyn ProcessRunner>,
        marthe_exe: PathBuf,
        settings: Settings,
    ) -> Self {
        Self {
            files,
            runner,
            marthe_exe,
            settings,
        }
    }

    pub async fn run(&self, registry: &OptimRegistry) -> PestResult<ForwardReport> {
        let started = Instant::now();
        let mut model = MartheModel::load(&registry.rma, Arc::clone(&self.files))?;
        let parameters =
            apply_parameters(registry, &mut model, self.settings.effective_keep_uniform_fmt())?;

        let mldir = if model.layout.mldir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            model.layout.mldir.clone()
        };
        let rma_name = registry
            .rma
            .file_name()
            .map_or_else(|| registry.rma.display().to_string(), |n| n.to_string_lossy().into_owned());
        let request = RunRequest::new("marthe", self.marthe_exe.clone(), mldir.clone())
            .with_arg(rma_name);
        let outcome = self.runner.run(&request).await?;

        let prn = mldir.join(self.settings.effective_prn_file());
        let simulated = self.files.read_prn(&prn)?;
        let mut observations = 0;
        for set in &registry.observations {
            let values = simulated_values(set, &simulated)?;
            observations += values.len();
            write_simfile(&set.simfile(&registry.dirs), &values)?;
        }

        info!(
            case = %registry.name,
            parameters,
            observations,
            marthe_secs = outcome.duration.as_secs_f64(),
            total_secs = started.elapsed().as_secs_f64(),
            "Forward run complete"
        );
        Ok(ForwardReport {
            parameters,
            observations,
            duration: outcome.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::Observation;
    use chrono::NaiveDate;
    use rmarthe_core::Transform;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 1, d).unwrap()
    }

    fn obs(transform: Transform) -> ObservationSet {
        ObservationSet {
            locnme: "p01".into(),
            weight: 1.0,
            transform,
            observations: vec![
                Observation {
                    obsnme: "p01n0".into(),
                    date: date(1),
                    value: 10.0,
                },
                Observation {
                    obsnme: "p01n1".into(),
                    date: date(3),
                    value: 100.0,
                },
            ],
        }
    }

    fn sim(dates: Vec<NaiveDate>) -> SimulatedSeries {
        let mut sim = SimulatedSeries {
            dates,
            ..Default::default()
        };
        sim.columns
            .insert("p01".to_string(), vec![10.0, 1000.0, 100.0]);
        sim
    }

    #[test]
    fn test_simulated_values_are_transformed() {
        let values = simulated_values(&obs(Transform::Log10), &sim(vec![date(1), date(2), date(3)]))
            .unwrap();
        assert_eq!(values, vec![("p01n0".to_string(), 1.0), ("p01n1".to_string(), 2.0)]);
    }

    #[test]
    fn test_missing_date_is_an_error() {
        let err = simulated_values(&obs(Transform::None), &sim(vec![date(1), date(2), date(4)]))
            .unwrap_err();
        assert!(matches!(err, PestError::MissingSimulatedDate { date: d, .. } if d == date(3)));
    }

    #[test]
    fn test_non_finite_simulated_value_is_an_error() {
        let mut unreadable = sim(vec![date(1), date(2), date(3)]);
        unreadable
            .columns
            .insert("p01".to_string(), vec![f64::NAN, 1.0, 1.0]);
        let err = simulated_values(&obs(Transform::None), &unreadable).unwrap_err();
        assert!(matches!(err, PestError::InvalidValue { ref name, .. } if name == "p01n0"));

        let mut dry = sim(vec![date(1), date(2), date(3)]);
        dry.columns.insert("p01".to_string(), vec![10.0, 1.0, 0.0]);
        let err = simulated_values(&obs(Transform::Log10), &dry).unwrap_err();
        assert!(matches!(
            err,
            PestError::InvalidValue { ref name, value, .. } if name == "p01n1" && value == 0.0
        ));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut set = obs(Transform::None);
        set.locnme = "p02".into();
        assert!(matches!(
            simulated_values(&set, &sim(vec![date(1)])),
            Err(PestError::MissingSimulatedColumn(_))
        ));
    }
}
