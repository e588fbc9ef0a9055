//! In-memory `MartheFilesPort` for service tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use ndarray::Array2;

use crate::domain::{
    GridBlockSpan, GridGeometry, MartheGrid, ModelLayout, ObservedSeries, PastpContent,
    PumpRecord, STATIC_ISTEP, SimulatedSeries, SoilRecord,
};
use crate::ports::{GridWriteOptions, MartheFilesError, MartheFilesPort};

pub type WriteLog = Arc<Mutex<Vec<(String, GridWriteOptions, usize)>>>;

/// Two 2x2 layers; cell (1, 0) of layer 0 and (1, 1) of layer 1 are inactive.
#[derive(Default)]
pub struct FakeFiles {
    pub without_permh: bool,
    pub without_pastp: bool,
    pub written: WriteLog,
    pub pastps: Arc<Mutex<Vec<PastpContent>>>,
    /// Calls to `read_grid_blocks`.
    pub block_reads: Arc<AtomicUsize>,
}

pub fn grid_2x2(layer: usize, values: [f64; 4]) -> MartheGrid {
    let geometry = GridGeometry {
        layer,
        inest: 0,
        xl: 0.0,
        yl: 0.0,
        dx: vec![10.0, 10.0],
        dy: vec![10.0, 10.0],
    };
    MartheGrid::new(
        "permh",
        STATIC_ISTEP,
        geometry,
        Array2::from_shape_vec((2, 2), values.to_vec()).unwrap(),
    )
    .unwrap()
}

fn chasim_grid(istep: i64, layer: usize) -> MartheGrid {
    #[allow(clippy::cast_precision_loss)]
    let base = (istep * 10) as f64 + layer as f64;
    let mut g = grid_2x2(layer, [base, base + 0.5, 9999.0, base + 1.0]);
    g.field = "CHARGE".to_string();
    g.istep = istep;
    g
}

impl MartheFilesPort for FakeFiles {
    fn read_rma(&self, path: &Path) -> Result<ModelLayout, MartheFilesError> {
        let mut entries = vec![("pastp".to_string(), "mona.pastp".to_string())];
        if !self.without_permh {
            entries.push(("permh".to_string(), "mona.permh".to_string()));
        }
        Ok(ModelLayout::new(path, entries))
    }

    fn read_grids(&self, path: &Path) -> Result<Vec<MartheGrid>, MartheFilesError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("permh") => Ok(vec![
                grid_2x2(0, [1e-4, 1e-4, 0.0, 1e-4]),
                grid_2x2(1, [1e-5, 1e-5, 1e-5, 0.0]),
            ]),
            Some(_) => Ok(vec![grid_2x2(0, [5.0; 4]), grid_2x2(1, [5.0; 4])]),
            None => Err(MartheFilesError::NotFound(path.display().to_string())),
        }
    }

    fn index_grids(&self, _path: &Path) -> Result<Vec<GridBlockSpan>, MartheFilesError> {
        let mut spans = Vec::new();
        for istep in 0..3 {
            for layer in 0..2 {
                let start = usize::try_from(istep * 2).unwrap_or(0) + layer;
                spans.push(GridBlockSpan {
                    field: "CHARGE".to_string(),
                    istep,
                    layer,
                    inest: 0,
                    start_line: start * 10,
                    end_line: start * 10 + 9,
                });
            }
        }
        spans.push(GridBlockSpan {
            field: "DEBIT_RIVI".to_string(),
            istep: 0,
            layer: 0,
            inest: 0,
            start_line: 60,
            end_line: 69,
        });
        Ok(spans)
    }

    fn read_grid_blocks(
        &self,
        _path: &Path,
        spans: &[GridBlockSpan],
    ) -> Result<Vec<MartheGrid>, MartheFilesError> {
        self.block_reads.fetch_add(1, Ordering::Relaxed);
        Ok(spans
            .iter()
            .map(|s| chasim_grid(s.istep, s.layer))
            .collect())
    }

    fn write_grids(
        &self,
        path: &Path,
        grids: &[MartheGrid],
        options: &GridWriteOptions,
    ) -> Result<(), MartheFilesError> {
        self.written
            .lock()
            .unwrap()
            .push((path.display().to_string(), *options, grids.len()));
        Ok(())
    }

    fn read_pastp(&self, path: &Path) -> Result<PastpContent, MartheFilesError> {
        if self.without_pastp {
            return Err(MartheFilesError::NotFound(path.display().to_string()));
        }
        Ok(PastpContent {
            lines: Vec::new(),
            dates: vec![
                NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 3, 1).unwrap(),
            ],
            pumping: vec![PumpRecord {
                istep: 0,
                layer: 0,
                i: 0,
                j: 1,
                value: -10.0,
                line: 3,
            }],
            soil: vec![SoilRecord {
                istep: 0,
                property: "cap_sol_progr".to_string(),
                zone: 1,
                value: 100.0,
                line: 4,
            }],
        })
    }

    fn write_pastp(&self, _path: &Path, content: &PastpContent) -> Result<(), MartheFilesError> {
        self.pastps.lock().unwrap().push(content.clone());
        Ok(())
    }

    fn read_prn(&self, path: &Path) -> Result<SimulatedSeries, MartheFilesError> {
        Err(MartheFilesError::NotFound(path.display().to_string()))
    }

    fn read_obs(
        &self,
        path: &Path,
        _locnme: Option<&str>,
    ) -> Result<ObservedSeries, MartheFilesError> {
        Err(MartheFilesError::NotFound(path.display().to_string()))
    }
}
