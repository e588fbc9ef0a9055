//! Observed and simulated time series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Observed values at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedSeries {
    /// Location name; also the observation group.
    pub locnme: String,
    pub records: Vec<(NaiveDate, f64)>,
}

impl ObservedSeries {
    pub fn new(locnme: impl Into<String>, records: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            locnme: locnme.into().to_ascii_lowercase(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|(d, _)| *d).collect()
    }

    /// Observation names `<locnme>n<k>`, zero-padded to the series length.
    pub fn obsnmes(&self) -> Vec<String> {
        let digits = self.records.len().saturating_sub(1).max(1).to_string().len();
        (0..self.records.len())
            .map(|k| format!("{}n{k:0digits$}", self.locnme))
            .collect()
    }

    pub fn transformed(&self, transform: Transform) -> Vec<f64> {
        self.records.iter().map(|(_, v)| transform.apply(*v)).collect()
    }
}

/// Simulated series from `historiq.prn`, keyed by location name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatedSeries {
    pub dates: Vec<NaiveDate>,
    /// Column name (lowercase) to values aligned with `dates`.
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl SimulatedSeries {
    pub fn column(&self, locnme: &str) -> Option<&[f64]> {
        self.columns
            .get(&locnme.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Simulated value of a location on a date.
    pub fn value_at(&self, locnme: &str, date: NaiveDate) -> Option<f64> {
        let idx = self.dates.iter().position(|d| *d == date)?;
        self.column(locnme)?.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 1, d).unwrap()
    }

    #[test]
    fn test_obsnmes_padding() {
        let small = ObservedSeries::new("P1", vec![(date(1), 1.0), (date(2), 2.0)]);
        assert_eq!(small.obsnmes(), vec!["p1n0", "p1n1"]);
        let big = ObservedSeries::new("p2", (1..=12).map(|d| (date(d), 0.0)).collect());
        let names = big.obsnmes();
        assert_eq!(names[0], "p2n00");
        assert_eq!(names[11], "p2n11");
    }

    #[test]
    fn test_simulated_lookup() {
        let mut sim = SimulatedSeries {
            dates: vec![date(1), date(2)],
            ..Default::default()
        };
        sim.columns.insert("p1".to_string(), vec![10.0, 11.0]);
        assert_eq!(sim.value_at("P1", date(2)), Some(11.0));
        assert_eq!(sim.value_at("p1", date(3)), None);
        assert_eq!(sim.value_at("p9", date(1)), None);
    }
}
