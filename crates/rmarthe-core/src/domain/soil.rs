//! Soil properties defined per zone in the schedule file.

use serde::{Deserialize, Serialize};

/// One `/<PROP>/ZONE_SOL` line of the schedule file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    pub istep: usize,
    /// Property name, lowercase (e.g. `cap_sol_progr`).
    pub property: String,
    pub zone: usize,
    pub value: f64,
    /// 0-based line in the schedule file.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MartheSoil {
    pub records: Vec<SoilRecord>,
}

impl MartheSoil {
    pub const fn new(records: Vec<SoilRecord>) -> Self {
        Self { records }
    }

    /// Distinct property names, sorted.
    pub fn properties(&self) -> Vec<String> {
        let mut props: Vec<String> = self.records.iter().map(|r| r.property.clone()).collect();
        props.sort();
        props.dedup();
        props
    }

    /// Distinct zones of a property, sorted.
    pub fn zones(&self, property: &str) -> Vec<usize> {
        let mut zones: Vec<usize> = self
            .records
            .iter()
            .filter(|r| r.property.eq_ignore_ascii_case(property))
            .map(|r| r.zone)
            .collect();
        zones.sort_unstable();
        zones.dedup();
        zones
    }

    /// First value defined for a property zone.
    pub fn value(&self, property: &str, zone: usize) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.zone == zone && r.property.eq_ignore_ascii_case(property))
            .map(|r| r.value)
    }

    /// Set a property zone on every step that defines it.
    pub fn set_value(&mut self, property: &str, zone: usize, value: f64) -> usize {
        self.records
            .iter_mut()
            .filter(|r| r.zone == zone && r.property.eq_ignore_ascii_case(property))
            .map(|r| r.value = value)
            .count()
    }
}
