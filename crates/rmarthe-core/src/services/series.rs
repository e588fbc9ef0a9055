//! Simulated field series read from `chasim.out`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::model::{MartheModel, ModelError};
use crate::domain::{GridBlockSpan, MartheField, is_masked};
use crate::ports::ProgressReporter;
use crate::settings::DEFAULT_CHASIM_FILE;

/// Values treated as missing in simulated series.
const SERIES_MASKED_VALUES: [f64; 2] = [-9999.0, 9999.0];

/// Existence and loading state of a simulated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck {
    pub exists: bool,
    pub loaded: bool,
}

/// One row of a [`TimeSeriesTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub istep: i64,
    pub date: Option<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// Values of a simulated field at a set of points, one row per step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    pub columns: Vec<String>,
    pub rows: Vec<TimeSeriesRow>,
}

impl TimeSeriesTable {
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

/// Simulated fields of a model, loaded step by step on request.
pub struct MartheFieldSeries<'a> {
    model: &'a MartheModel,
    chasim: PathBuf,
    index: Vec<GridBlockSpan>,
    data: BTreeMap<String, BTreeMap<i64, MartheField>>,
}

impl<'a> MartheFieldSeries<'a> {
    /// Index `chasim` (default `<mldir>/chasim.out`).
    pub fn new(model: &'a MartheModel, chasim: Option<&Path>) -> Result<Self, ModelError> {
        let chasim = chasim.map_or_else(|| model.layout.in_dir(DEFAULT_CHASIM_FILE), Path::to_path_buf);
        let index = model.files().index_grids(&chasim)?;
        debug!(path = %chasim.display(), blocks = index.len(), "Indexed simulated fields");
        Ok(Self {
            model,
            chasim,
            index,
            data: BTreeMap::new(),
        })
    }

    pub fn chasim(&self) -> &Path {
        &self.chasim
    }

    /// Available field names, in file order.
    pub fn fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for span in &self.index {
            if !names.contains(&span.field.as_str()) {
                names.push(&span.field);
            }
        }
        names
    }

    /// Steps available for a field, sorted.
    pub fn isteps(&self, field: &str) -> Vec<i64> {
        let mut steps: Vec<i64> = self
            .index
            .iter()
            .filter(|s| s.field == field)
            .map(|s| s.istep)
            .collect();
        steps.sort_unstable();
        steps.dedup();
        steps
    }

    pub fn check_field(&self, field: &str) -> FieldCheck {
        let exists = self.index.iter().any(|s| s.field == field);
        FieldCheck {
            exists,
            loaded: exists && self.data.contains_key(field),
        }
    }

    /// Loaded steps of a field, or an error when absent or not loaded.
    pub fn loaded(&self, field: &str) -> Result<&BTreeMap<i64, MartheField>, ModelError> {
        let check = self.check_field(field);
        if !check.exists {
            return Err(self.not_found(field));
        }
        self.data
            .get(field)
            .ok_or_else(|| ModelError::FieldNotLoaded(field.to_string()))
    }

    fn not_found(&self, field: &str) -> ModelError {
        ModelError::FieldNotFound {
            field: field.to_string(),
            path: self.chasim.display().to_string(),
        }
    }

    /// Build one field per requested step that exists in the file.
    ///
    /// Fields are named `<FIELD>_<istep>` with the step zero-padded to the
    /// width of the largest step loaded. Returns the number of steps loaded.
    pub fn load_field(
        &mut self,
        field: &str,
        isteps: Option<&[i64]>,
        progress: &dyn ProgressReporter,
    ) -> Result<usize, ModelError> {
        if !self.check_field(field).exists {
            return Err(self.not_found(field));
        }
        let available = self.isteps(field);
        let steps: Vec<i64> = match isteps {
            Some(requested) => available
                .into_iter()
                .filter(|s| requested.contains(s))
                .collect(),
            None => available,
        };
        let digits = steps.iter().max().map_or(1, |m| m.to_string().len());

        // One pass over the file for every requested step
        let spans: Vec<GridBlockSpan> = self
            .index
            .iter()
            .filter(|s| s.field == field && steps.contains(&s.istep))
            .cloned()
            .collect();
        progress.start(&format!("Loading {field}"), Some(steps.len() as u64));
        let grids = match self.model.files().read_grid_blocks(&self.chasim, &spans) {
            Ok(g) => g,
            Err(e) => {
                progress.finish_with_error(&e.to_string());
                return Err(e.into());
            }
        };
        let mut by_step: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for grid in &grids {
            by_step
                .entry(grid.istep)
                .or_default()
                .extend(grid.values.iter().copied());
        }

        let mut loaded = BTreeMap::new();
        for (n, (istep, values)) in by_step.into_iter().enumerate() {
            let name = format!("{field}_{istep:0digits$}");
            let mf = self.model.imask.with_values(name, istep, &values)?;
            loaded.insert(istep, mf);
            progress.update(n as u64 + 1, None);
        }
        progress.finish(&format!("Loaded {} steps of {field}", steps.len()));
        info!(field, steps = steps.len(), "Loaded simulated field");

        let count = loaded.len();
        self.data.insert(field.to_string(), loaded);
        Ok(count)
    }

    /// Values of a loaded field at `(x, y, layer)` points for every step.
    ///
    /// Default column names are `<i>i_<j>j_<layer>k` shifted by `base`.
    pub fn get_tseries(
        &self,
        field: &str,
        points: &[(f64, f64, usize)],
        names: Option<&[String]>,
        base: usize,
    ) -> Result<TimeSeriesTable, ModelError> {
        let steps = self.loaded(field)?;
        if let Some(n) = names
            && n.len() != points.len()
        {
            return Err(ModelError::NameCount {
                expected: points.len(),
                actual: n.len(),
            });
        }

        let nodes = points
            .iter()
            .map(|(x, y, layer)| self.model.get_node(*x, *y, *layer))
            .collect::<Result<Vec<_>, _>>()?;

        let columns = match names {
            Some(n) => n.to_vec(),
            None => nodes
                .iter()
                .map(|node| {
                    self.model.query_cell(*node).map(|c| {
                        format!("{}i_{}j_{}k", c.i + base, c.j + base, c.layer + base)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let rows = steps
            .iter()
            .map(|(istep, mf)| TimeSeriesRow {
                istep: *istep,
                date: self.model.date_of(*istep),
                values: nodes
                    .iter()
                    .map(|n| {
                        let v = mf.records()[*n].value;
                        (!is_masked(v, &SERIES_MASKED_VALUES)).then_some(v)
                    })
                    .collect(),
            })
            .collect();

        Ok(TimeSeriesTable { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopProgress;
    use crate::services::testing::FakeFiles;
    use std::sync::Arc;

    fn model() -> MartheModel {
        MartheModel::load(Path::new("/m/mona.rma"), Arc::new(FakeFiles::default())).unwrap()
    }

    #[test]
    fn test_fields_and_check() {
        let m = model();
        let mfs = MartheFieldSeries::new(&m, None).unwrap();
        assert_eq!(mfs.chasim(), Path::new("/m/chasim.out"));
        assert_eq!(mfs.fields(), vec!["CHARGE", "DEBIT_RIVI"]);
        assert_eq!(
            mfs.check_field("CHARGE"),
            FieldCheck {
                exists: true,
                loaded: false
            }
        );
        assert!(!mfs.check_field("SATURATION").exists);
        assert!(matches!(mfs.loaded("CHARGE"), Err(ModelError::FieldNotLoaded(_))));
        assert!(matches!(mfs.loaded("NOPE"), Err(ModelError::FieldNotFound { .. })));
    }

    #[test]
    fn test_load_field_subset() {
        let m = model();
        let mut mfs = MartheFieldSeries::new(&m, None).unwrap();
        let n = mfs.load_field("CHARGE", Some(&[1, 2, 7]), &NoopProgress).unwrap();
        assert_eq!(n, 2);
        let loaded = mfs.loaded("CHARGE").unwrap();
        assert_eq!(loaded[&2].name, "CHARGE_2");
        assert_eq!(loaded[&2].len(), 8);
        assert!(mfs.load_field("NOPE", None, &NoopProgress).is_err());
    }

    #[test]
    fn test_load_field_reads_file_once() {
        let files = FakeFiles::default();
        let reads = Arc::clone(&files.block_reads);
        let m = MartheModel::load(Path::new("/m/mona.rma"), Arc::new(files)).unwrap();
        let mut mfs = MartheFieldSeries::new(&m, None).unwrap();

        assert_eq!(mfs.load_field("CHARGE", None, &NoopProgress).unwrap(), 3);
        assert_eq!(reads.load(std::sync::atomic::Ordering::Relaxed), 1);
        let loaded = mfs.loaded("CHARGE").unwrap();
        // Both layers of step 1, in layer order
        assert_eq!(loaded[&1].values()[..2], [10.0, 10.5]);
        assert_eq!(loaded[&1].values()[4..6], [11.0, 11.5]);
    }

    #[test]
    fn test_get_tseries_default_names() {
        let m = model();
        let mut mfs = MartheFieldSeries::new(&m, None).unwrap();
        mfs.load_field("CHARGE", None, &NoopProgress).unwrap();
        // (15, 15) is cell (0, 1); (5, 5) on layer 1 is cell (1, 0) holding 9999
        let table = mfs
            .get_tseries("CHARGE", &[(15.0, 15.0, 0), (5.0, 5.0, 1)], None, 1)
            .unwrap();
        assert_eq!(table.columns, vec!["1i_2j_1k", "2i_1j_2k"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].date, NaiveDate::from_ymd_opt(2010, 2, 1));
        assert_eq!(table.column("1i_2j_1k").unwrap(), vec![Some(0.5), Some(10.5), Some(20.5)]);
        assert_eq!(table.column("2i_1j_2k").unwrap(), vec![None, None, None]);
    }

    #[test]
    fn test_get_tseries_name_count_checked() {
        let m = model();
        let mut mfs = MartheFieldSeries::new(&m, None).unwrap();
        mfs.load_field("CHARGE", None, &NoopProgress).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            mfs.get_tseries("CHARGE", &[(15.0, 15.0, 0)], Some(&names), 0),
            Err(ModelError::NameCount { .. })
        ));
    }
}
