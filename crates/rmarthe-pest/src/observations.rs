//! Registered observations.

use std::path::PathBuf;

use chrono::NaiveDate;
use rmarthe_core::{ObservedSeries, Transform, WorkDirs};
use serde::{Deserialize, Serialize};

use crate::error::{PestError, PestResult};

/// Default observation weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub obsnme: String,
    pub date: NaiveDate,
    /// Observed value, untransformed.
    pub value: f64,
}

/// Observations of one location; also one PEST++ observation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    /// Location name, matching a `historiq.prn` column.
    pub locnme: String,
    pub weight: f64,
    /// Applied to observed and simulated values alike.
    pub transform: Transform,
    pub observations: Vec<Observation>,
}

impl ObservationSet {
    /// Build from an observed series; names are `<locnme>n<k>`.
    pub fn from_series(
        series: &ObservedSeries,
        weight: Option<f64>,
        transform: Transform,
    ) -> PestResult<Self> {
        if series.is_empty() {
            return Err(PestError::Empty(format!("observations of '{}'", series.locnme)));
        }
        let observations: Vec<Observation> = series
            .obsnmes()
            .into_iter()
            .zip(&series.records)
            .map(|(obsnme, (date, value))| Observation {
                obsnme,
                date: *date,
                value: *value,
            })
            .collect();
        if let Some(bad) = observations
            .iter()
            .find(|o| !transform.apply(o.value).is_finite())
        {
            return Err(PestError::InvalidValue {
                name: bad.obsnme.clone(),
                value: bad.value,
                reason: format!("cannot be transformed with {}", transform.as_str()),
            });
        }
        Ok(Self {
            locnme: series.locnme.clone(),
            weight: weight.unwrap_or(DEFAULT_WEIGHT),
            transform,
            observations,
        })
    }

    pub fn simfile(&self, dirs: &WorkDirs) -> PathBuf {
        dirs.sim.join(format!("{}.dat", self.locnme))
    }

    pub fn insfile(&self, dirs: &WorkDirs) -> PathBuf {
        dirs.ins.join(format!("{}.ins", self.locnme))
    }

    pub fn obsnmes(&self) -> Vec<String> {
        self.observations.iter().map(|o| o.obsnme.clone()).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// Observed values in transformed space, as declared to PEST++.
    pub fn transformed_values(&self) -> Vec<(String, f64)> {
        self.observations
            .iter()
            .map(|o| (o.obsnme.clone(), self.transform.apply(o.value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> ObservedSeries {
        let records = values
            .iter()
            .enumerate()
            .map(|(k, v)| {
                (
                    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap() + chrono::Days::new(k as u64),
                    *v,
                )
            })
            .collect();
        ObservedSeries::new("P01", records)
    }

    #[test]
    fn test_names_and_defaults() {
        let set = ObservationSet::from_series(&series(&[10.0, 100.0]), None, Transform::Log10)
            .unwrap();
        assert_eq!(set.locnme, "p01");
        assert_eq!(set.obsnmes(), vec!["p01n0", "p01n1"]);
        assert_eq!(set.weight, 1.0);
        assert_eq!(set.transformed_values()[1].1, 2.0);
    }

    #[test]
    fn test_untransformable_value() {
        let err = ObservationSet::from_series(&series(&[-1.0]), None, Transform::Log10).unwrap_err();
        assert!(matches!(
            &err,
            PestError::InvalidValue { name, value, .. } if name == "p01n0" && *value == -1.0
        ));
        assert!(err.to_string().contains("log10"));
    }

    #[test]
    fn test_file_names() {
        let set = ObservationSet::from_series(&series(&[1.0]), Some(2.0), Transform::None).unwrap();
        let dirs = WorkDirs::new("/calib");
        assert_eq!(set.simfile(&dirs), PathBuf::from("/calib/sim/p01.dat"));
        assert_eq!(set.insfile(&dirs), PathBuf::from("/calib/ins/p01.ins"));
    }
}
