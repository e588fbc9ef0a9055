//! Pumping schedule.

use serde::{Deserialize, Serialize};

/// One `/DEBIT/MAILLE` line of the schedule file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpRecord {
    pub istep: usize,
    /// 0-based.
    pub layer: usize,
    /// 0-based row.
    pub i: usize,
    /// 0-based column.
    pub j: usize,
    /// Pumping rate (negative for withdrawals).
    pub value: f64,
    /// 0-based line in the schedule file.
    pub line: usize,
}

/// Pumping records of a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarthePump {
    pub records: Vec<PumpRecord>,
}

impl MarthePump {
    pub const fn new(records: Vec<PumpRecord>) -> Self {
        Self { records }
    }

    pub fn select(&self, isteps: Option<&[usize]>, layers: Option<&[usize]>) -> Vec<&PumpRecord> {
        self.records
            .iter()
            .filter(|r| {
                isteps.is_none_or(|s| s.contains(&r.istep))
                    && layers.is_none_or(|l| l.contains(&r.layer))
            })
            .collect()
    }

    /// Distinct pumped cells `(layer, i, j)`, in order of first appearance.
    pub fn cells(&self) -> Vec<(usize, usize, usize)> {
        let mut out = Vec::new();
        for r in &self.records {
            let key = (r.layer, r.i, r.j);
            if !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }

    /// Multiply every rate of a cell. Returns the number of records changed.
    pub fn scale_cell(&mut self, layer: usize, i: usize, j: usize, factor: f64) -> usize {
        self.records
            .iter_mut()
            .filter(|r| (r.layer, r.i, r.j) == (layer, i, j))
            .map(|r| r.value *= factor)
            .count()
    }

    /// Set the rate of a cell on the given steps (all steps when `None`).
    pub fn set_value(
        &mut self,
        layer: usize,
        i: usize,
        j: usize,
        isteps: Option<&[usize]>,
        value: f64,
    ) -> usize {
        self.records
            .iter_mut()
            .filter(|r| {
                (r.layer, r.i, r.j) == (layer, i, j) && isteps.is_none_or(|s| s.contains(&r.istep))
            })
            .map(|r| r.value = value)
            .count()
    }
}
