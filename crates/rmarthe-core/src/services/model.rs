//! MARTHE project service.
//!
//! `MartheModel` ties the project layout to the properties, the active
//! cell mask and the schedule file. All file access goes through the
//! injected [`MartheFilesPort`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    CellRecord, FieldError, MartheField, MarthePump, MartheSoil, ModelLayout, PastpContent,
    STATIC_ISTEP, is_masked,
};
use crate::ports::{GridWriteOptions, MartheFilesError, MartheFilesPort};

/// Errors raised by model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Files(#[from] MartheFilesError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Project {0} does not reference a permh file")]
    MissingPermh(String),

    #[error("Property '{0}' is not loaded")]
    PropertyNotLoaded(String),

    #[error("Project has no schedule (.pastp) file")]
    NoSchedule,

    #[error("No active cell at x={x}, y={y}, layer={layer}")]
    NodeNotFound { x: f64, y: f64, layer: usize },

    #[error("Node {0} is out of range")]
    InvalidNode(usize),

    #[error("Field '{field}' not found in {path}")]
    FieldNotFound { field: String, path: String },

    #[error("Field '{0}' is not loaded yet")]
    FieldNotLoaded(String),

    #[error("Expected {expected} names, got {actual}")]
    NameCount { expected: usize, actual: usize },
}

/// A loaded MARTHE project.
pub struct MartheModel {
    pub layout: ModelLayout,
    /// Active cells: 1 where permh is non-zero, 0 elsewhere.
    pub imask: MartheField,
    pub pump: MarthePump,
    pub soil: MartheSoil,
    properties: BTreeMap<String, MartheField>,
    pastp: Option<PastpContent>,
    files: Arc<dyn MartheFilesPort>,
}

impl std::fmt::Debug for MartheModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MartheModel")
            .field("mlname", &self.layout.mlname)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("nstep", &self.nstep())
            .finish_non_exhaustive()
    }
}

impl MartheModel {
    /// Load a project from its `.rma` file.
    pub fn load(rma: &Path, files: Arc<dyn MartheFilesPort>) -> Result<Self, ModelError> {
        let layout = files.read_rma(rma)?;
        let permh_path = layout
            .file("permh")
            .ok_or_else(|| ModelError::MissingPermh(rma.display().to_string()))?
            .to_path_buf();

        let permh = MartheField::from_grids("permh", &files.read_grids(&permh_path)?)?;
        let active: Vec<f64> = permh
            .records()
            .iter()
            .map(|r| if is_masked(r.value, &[0.0]) { 0.0 } else { 1.0 })
            .collect();
        let imask = permh.with_values("imask", STATIC_ISTEP, &active)?;

        let pastp = match layout.file("pastp").map(|p| files.read_pastp(p)) {
            Some(Ok(content)) => Some(content),
            Some(Err(MartheFilesError::NotFound(path))) => {
                debug!(path = %path, "Schedule file referenced but absent");
                None
            }
            Some(Err(e)) => return Err(e.into()),
            None => None,
        };
        let (pump, soil) = pastp.as_ref().map_or_else(
            || (MarthePump::default(), MartheSoil::default()),
            |c| (MarthePump::new(c.pumping.clone()), MartheSoil::new(c.soil.clone())),
        );

        let mut properties = BTreeMap::new();
        properties.insert("permh".to_string(), permh);

        let model = Self {
            layout,
            imask,
            pump,
            soil,
            properties,
            pastp,
            files,
        };
        info!(
            mlname = %model.layout.mlname,
            nlay = model.nlay(),
            nnest = model.nnest(),
            nstep = model.nstep(),
            "Loaded MARTHE model"
        );
        Ok(model)
    }

    pub fn files(&self) -> &dyn MartheFilesPort {
        self.files.as_ref()
    }

    pub fn nlay(&self) -> usize {
        self.imask.maxlayer()
    }

    pub fn nnest(&self) -> usize {
        self.imask.maxnest()
    }

    /// Number of simulated steps after the initial state.
    pub fn nstep(&self) -> usize {
        self.dates().len().saturating_sub(1)
    }

    /// `dates[0]` is the simulation start, `dates[n]` the end of step `n`.
    pub fn dates(&self) -> &[NaiveDate] {
        self.pastp.as_ref().map_or(&[], |p| p.dates.as_slice())
    }

    pub fn date_of(&self, istep: i64) -> Option<NaiveDate> {
        usize::try_from(istep).ok().and_then(|i| self.dates().get(i).copied())
    }

    pub fn has_schedule(&self) -> bool {
        self.pastp.is_some()
    }

    /// Names of loaded properties.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Read `<mlname>.<name>` (or the file registered for it) and mask it.
    pub fn load_property(&mut self, name: &str) -> Result<&MartheField, ModelError> {
        let key = name.to_ascii_lowercase();
        let path = self.layout.property_path(&key);
        let grids = self.files.read_grids(&path)?;
        let mut field = MartheField::from_grids(key.clone(), &grids)?;
        field.apply_imask(&self.imask)?;
        debug!(property = %key, path = %path.display(), cells = field.len(), "Loaded property");
        self.properties.insert(key.clone(), field);
        self.properties
            .get(&key)
            .ok_or(ModelError::PropertyNotLoaded(key))
    }

    pub fn property(&self, name: &str) -> Result<&MartheField, ModelError> {
        let key = name.to_ascii_lowercase();
        if key == "imask" {
            return Ok(&self.imask);
        }
        self.properties
            .get(&key)
            .ok_or(ModelError::PropertyNotLoaded(key))
    }

    pub fn property_mut(&mut self, name: &str) -> Result<&mut MartheField, ModelError> {
        let key = name.to_ascii_lowercase();
        self.properties
            .get_mut(&key)
            .ok_or(ModelError::PropertyNotLoaded(key))
    }

    /// Write a property to `path`, or to its model file when `None`.
    pub fn write_property(
        &self,
        name: &str,
        path: Option<&Path>,
        keep_uniform_fmt: bool,
    ) -> Result<(), ModelError> {
        let field = self.property(name)?;
        let target = path.map_or_else(|| self.layout.property_path(&field.name), Path::to_path_buf);
        let options = GridWriteOptions {
            maxlayer: self.nlay(),
            maxnest: self.nnest(),
            keep_uniform_fmt,
        };
        self.files
            .write_grids(&target, &field.to_grids(None, None)?, &options)?;
        info!(property = %field.name, path = %target.display(), "Wrote property");
        Ok(())
    }

    /// Write the schedule with the current pumping and soil values.
    pub fn write_schedule(&self, path: Option<&Path>) -> Result<(), ModelError> {
        let pastp = self.pastp.as_ref().ok_or(ModelError::NoSchedule)?;
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self
                .layout
                .file("pastp")
                .ok_or(ModelError::NoSchedule)?
                .to_path_buf(),
        };
        let content = PastpContent {
            pumping: self.pump.records.clone(),
            soil: self.soil.records.clone(),
            ..pastp.clone()
        };
        self.files.write_pastp(&target, &content)?;
        info!(path = %target.display(), "Wrote schedule");
        Ok(())
    }

    /// Record index of the first active cell containing the point.
    pub fn get_node(&self, x: f64, y: f64, layer: usize) -> Result<usize, ModelError> {
        self.imask
            .sample(x, y, layer, &[0.0])
            .first()
            .copied()
            .ok_or(ModelError::NodeNotFound { x, y, layer })
    }

    pub fn query_cell(&self, node: usize) -> Result<CellRecord, ModelError> {
        self.imask
            .records()
            .get(node)
            .copied()
            .ok_or(ModelError::InvalidNode(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeFiles;

    fn model(files: FakeFiles) -> MartheModel {
        MartheModel::load(Path::new("/m/mona.rma"), Arc::new(files)).unwrap()
    }

    #[test]
    fn test_load_builds_imask() {
        let m = model(FakeFiles::default());
        assert_eq!(m.nlay(), 2);
        assert_eq!(m.nnest(), 0);
        assert_eq!(m.imask.values(), vec![1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(m.nstep(), 2);
        assert_eq!(m.date_of(1), NaiveDate::from_ymd_opt(2010, 2, 1));
        assert_eq!(m.date_of(-9999), None);
    }

    #[test]
    fn test_missing_permh() {
        let files = FakeFiles {
            without_permh: true,
            ..Default::default()
        };
        let err = MartheModel::load(Path::new("/m/mona.rma"), Arc::new(files)).unwrap_err();
        assert!(matches!(err, ModelError::MissingPermh(_)));
    }

    #[test]
    fn test_load_property_applies_imask() {
        let mut m = model(FakeFiles::default());
        let kepon = m.load_property("KEPON").unwrap();
        assert_eq!(kepon.name, "kepon");
        assert_eq!(kepon.values(), vec![5.0, 5.0, 0.0, 5.0, 5.0, 5.0, 5.0, 0.0]);
        assert!(m.property("kepon").is_ok());
        assert!(matches!(m.property("emmca"), Err(ModelError::PropertyNotLoaded(_))));
    }

    #[test]
    fn test_get_node_skips_inactive() {
        let m = model(FakeFiles::default());
        // (5, 5) is cell (1, 0): inactive on layer 0, active on layer 1
        assert!(matches!(m.get_node(5.0, 5.0, 0), Err(ModelError::NodeNotFound { .. })));
        let node = m.get_node(5.0, 5.0, 1).unwrap();
        assert_eq!(node, 6);
        let cell = m.query_cell(node).unwrap();
        assert_eq!((cell.layer, cell.i, cell.j), (1, 1, 0));
        assert!(matches!(m.query_cell(99), Err(ModelError::InvalidNode(99))));
    }

    #[test]
    fn test_write_property_uses_model_dims() {
        let files = FakeFiles::default();
        let written = files.written.clone();
        let m = model(files);
        m.write_property("permh", None, true).unwrap();
        let log = written.lock().unwrap();
        let (path, options, count) = &log[0];
        assert_eq!(path, "/m/mona.permh");
        assert_eq!(options.maxlayer, 2);
        assert_eq!(*count, 2);
    }

    #[test]
    fn test_write_schedule_carries_edits() {
        let files = FakeFiles::default();
        let pastps = files.pastps.clone();
        let mut m = model(files);
        m.pump.scale_cell(0, 0, 1, 2.0);
        m.write_schedule(None).unwrap();
        let written = pastps.lock().unwrap();
        assert!((written[0].pumping[0].value + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_debug_is_compact() {
        let m = model(FakeFiles::default());
        let s = format!("{m:?}");
        assert!(s.contains("mona"));
        assert!(!s.contains("records"));
    }

    #[test]
    fn test_missing_schedule_file_is_tolerated() {
        let files = FakeFiles {
            without_pastp: true,
            ..Default::default()
        };
        let m = model(files);
        assert!(!m.has_schedule());
        assert!(m.dates().is_empty());
        assert!(matches!(m.write_schedule(None), Err(ModelError::NoSchedule)));
    }
}
