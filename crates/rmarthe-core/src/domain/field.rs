//! Gridded property held as cell records.
//!
//! Records are stored block after block, in the order of `geometries`,
//! each block row-major. A record index is therefore a stable node number
//! shared by every field of the same model.

use ndarray::{Array2, Array3};
use thiserror::Error;
use tracing::{debug, warn};

use super::grid::{CellRecord, GridGeometry, MartheGrid};

/// Values treated as "no data" by default.
pub const DEFAULT_MASKED_VALUES: [f64; 3] = [-9999.0, 0.0, 9999.0];

/// Whether `value` equals one of `masked`.
#[allow(clippy::float_cmp)]
pub fn is_masked(value: f64, masked: &[f64]) -> bool {
    masked.iter().any(|m| *m == value)
}

/// Errors raised by field manipulation.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Array shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("3D array shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape3d {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Value count mismatch: expected {expected}, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Field '{0}' contains nested grids and cannot be viewed as a 3D array")]
    Nested(String),

    #[error("Field '{field}' has no grid for layer {layer}, nest {inest}")]
    UnknownBlock {
        field: String,
        layer: usize,
        inest: usize,
    },

    #[error("Cannot build field '{0}' from an empty grid list")]
    Empty(String),

    #[error("Field '{field}' and '{other}' do not share the same cell layout")]
    Layout { field: String, other: String },
}

/// Record filter used by [`MartheField::select`] and [`MartheField::mask`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub layers: Option<Vec<usize>>,
    pub inests: Option<Vec<usize>>,
    pub masked_values: Vec<f64>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layer(mut self, layer: usize) -> Self {
        self.layers.get_or_insert_with(Vec::new).push(layer);
        self
    }

    #[must_use]
    pub fn inest(mut self, inest: usize) -> Self {
        self.inests.get_or_insert_with(Vec::new).push(inest);
        self
    }

    #[must_use]
    pub fn masking(mut self, values: &[f64]) -> Self {
        self.masked_values.extend_from_slice(values);
        self
    }

    /// Mask the default no-data values.
    #[must_use]
    pub fn unmasked(self) -> Self {
        self.masking(&DEFAULT_MASKED_VALUES)
    }

    pub fn matches(&self, rec: &CellRecord) -> bool {
        self.layers.as_ref().is_none_or(|l| l.contains(&rec.layer))
            && self.inests.as_ref().is_none_or(|n| n.contains(&rec.inest))
            && !is_masked(rec.value, &self.masked_values)
    }
}

/// A named gridded property.
#[derive(Debug, Clone, PartialEq)]
pub struct MartheField {
    pub name: String,
    /// Simulation step the values belong to.
    pub istep: i64,
    /// Whether values are tied to the model active-cell mask.
    pub use_imask: bool,
    records: Vec<CellRecord>,
    geometries: Vec<GridGeometry>,
}

impl MartheField {
    /// Build a field from grid blocks, keeping their order.
    pub fn from_grids(name: impl Into<String>, grids: &[MartheGrid]) -> Result<Self, FieldError> {
        let name = name.into();
        let Some(first) = grids.first() else {
            return Err(FieldError::Empty(name));
        };
        let records = grids.iter().flat_map(MartheGrid::to_records).collect();
        let geometries = grids.iter().map(|g| g.geometry.clone()).collect();
        Ok(Self {
            name,
            istep: first.istep,
            use_imask: true,
            records,
            geometries,
        })
    }

    /// Copy of this field's layout carrying other values.
    pub fn with_values(
        &self,
        name: impl Into<String>,
        istep: i64,
        values: &[f64],
    ) -> Result<Self, FieldError> {
        let mut field = self.clone();
        field.name = name.into();
        field.istep = istep;
        field.set_values(values)?;
        Ok(field)
    }

    /// Mark the field as independent from the model active cells.
    #[must_use]
    pub const fn independent(mut self) -> Self {
        self.use_imask = false;
        self
    }

    pub fn records(&self) -> &[CellRecord] {
        &self.records
    }

    pub fn geometries(&self) -> &[GridGeometry] {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Number of layers.
    pub fn maxlayer(&self) -> usize {
        self.geometries.iter().map(|g| g.layer + 1).max().unwrap_or(0)
    }

    /// Number of nested grids (0 when only the main grid exists).
    pub fn maxnest(&self) -> usize {
        self.geometries.iter().map(|g| g.inest).max().unwrap_or(0)
    }

    pub fn select(&self, selection: &Selection) -> Vec<&CellRecord> {
        self.records.iter().filter(|r| selection.matches(r)).collect()
    }

    pub fn mask(&self, selection: &Selection) -> Vec<bool> {
        self.records.iter().map(|r| selection.matches(r)).collect()
    }

    /// Range of record indices covered by block `(layer, inest)`.
    fn block_range(&self, layer: usize, inest: usize) -> Option<(usize, &GridGeometry)> {
        let mut offset = 0;
        for g in &self.geometries {
            if g.layer == layer && g.inest == inest {
                return Some((offset, g));
            }
            offset += g.nrow() * g.ncol();
        }
        None
    }

    fn unknown_block(&self, layer: usize, inest: usize) -> FieldError {
        FieldError::UnknownBlock {
            field: self.name.clone(),
            layer,
            inest,
        }
    }

    pub fn as_array(&self, layer: usize, inest: usize) -> Result<Array2<f64>, FieldError> {
        let (offset, g) = self
            .block_range(layer, inest)
            .ok_or_else(|| self.unknown_block(layer, inest))?;
        let (nrow, ncol) = (g.nrow(), g.ncol());
        let values = self.records[offset..offset + nrow * ncol]
            .iter()
            .map(|r| r.value)
            .collect();
        Array2::from_shape_vec((nrow, ncol), values).map_err(|_| FieldError::Shape {
            expected: (nrow, ncol),
            actual: (0, 0),
        })
    }

    /// Main-grid values as `(layer, row, col)`.
    pub fn as_3darray(&self) -> Result<Array3<f64>, FieldError> {
        if self.maxnest() > 0 {
            return Err(FieldError::Nested(self.name.clone()));
        }
        let (nrow, ncol) = self.main_shape()?;
        let nlay = self.maxlayer();
        let mut arr = Array3::zeros((nlay, nrow, ncol));
        for layer in 0..nlay {
            let block = self.as_array(layer, 0)?;
            if block.dim() != (nrow, ncol) {
                return Err(FieldError::Shape {
                    expected: (nrow, ncol),
                    actual: block.dim(),
                });
            }
            arr.index_axis_mut(ndarray::Axis(0), layer).assign(&block);
        }
        Ok(arr)
    }

    fn main_shape(&self) -> Result<(usize, usize), FieldError> {
        self.geometries
            .iter()
            .find(|g| g.inest == 0)
            .map(|g| (g.nrow(), g.ncol()))
            .ok_or_else(|| self.unknown_block(0, 0))
    }

    /// Assign `value` to every selected cell that does not hold a default
    /// masked value. Returns the number of cells changed.
    pub fn set_value(&mut self, value: f64, layer: Option<usize>, inest: Option<usize>) -> usize {
        let mut count = 0;
        for rec in &mut self.records {
            if layer.is_none_or(|l| l == rec.layer)
                && inest.is_none_or(|n| n == rec.inest)
                && !is_masked(rec.value, &DEFAULT_MASKED_VALUES)
            {
                rec.value = value;
                count += 1;
            }
        }
        debug!(field = %self.name, value, count, "Set field value");
        count
    }

    pub fn set_from_3darray(&mut self, arr: &Array3<f64>) -> Result<(), FieldError> {
        if self.maxnest() > 0 {
            return Err(FieldError::Nested(self.name.clone()));
        }
        let (nrow, ncol) = self.main_shape()?;
        let expected = (self.maxlayer(), nrow, ncol);
        if arr.dim() != expected {
            return Err(FieldError::Shape3d {
                expected,
                actual: arr.dim(),
            });
        }
        for rec in &mut self.records {
            rec.value = arr[[rec.layer, rec.i, rec.j]];
        }
        Ok(())
    }

    pub fn set_values(&mut self, values: &[f64]) -> Result<(), FieldError> {
        if values.len() != self.records.len() {
            return Err(FieldError::Length {
                expected: self.records.len(),
                actual: values.len(),
            });
        }
        for (rec, v) in self.records.iter_mut().zip(values) {
            rec.value = *v;
        }
        Ok(())
    }

    /// Replace values with those of `records`, which must follow the same layout.
    pub fn set_from_records(&mut self, records: &[CellRecord]) -> Result<(), FieldError> {
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        self.set_values(&values)
    }

    /// Keep values only on active cells; inactive cells take the mask value.
    pub fn apply_imask(&mut self, imask: &Self) -> Result<(), FieldError> {
        if !self.use_imask || self.name.eq_ignore_ascii_case("imask") {
            return Ok(());
        }
        self.check_layout(imask)?;
        for (rec, m) in self.records.iter_mut().zip(&imask.records) {
            if is_masked(m.value, &DEFAULT_MASKED_VALUES) {
                rec.value = m.value;
            }
        }
        Ok(())
    }

    /// Fail unless `other` is defined on the same grids as this field.
    pub fn check_layout(&self, other: &Self) -> Result<(), FieldError> {
        if self.geometries == other.geometries {
            Ok(())
        } else {
            Err(FieldError::Layout {
                field: self.name.clone(),
                other: other.name.clone(),
            })
        }
    }

    /// Set zones of piecewise constancy.
    ///
    /// Each `(layer, zone, value)` is written on unmasked cells of `layer`
    /// whose `izone` value equals `zone`. Negative zones denote pilot points
    /// and are skipped.
    pub fn set_from_zpc(
        &mut self,
        parameters: &[(usize, i64, f64)],
        izone: &Self,
    ) -> Result<usize, FieldError> {
        self.check_layout(izone)?;
        let mut count = 0;
        for &(layer, zone, value) in parameters {
            if zone < 0 {
                warn!(field = %self.name, layer, zone, "Pilot point zones are not supported, skipping");
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let zone_value = zone as f64;
            for (rec, z) in self.records.iter_mut().zip(&izone.records) {
                #[allow(clippy::float_cmp)]
                if rec.layer == layer
                    && z.value == zone_value
                    && !is_masked(rec.value, &DEFAULT_MASKED_VALUES)
                {
                    rec.value = value;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Rebuild grid blocks, optionally restricted to a layer and/or nest.
    pub fn to_grids(
        &self,
        layer: Option<usize>,
        inest: Option<usize>,
    ) -> Result<Vec<MartheGrid>, FieldError> {
        self.geometries
            .iter()
            .filter(|g| layer.is_none_or(|l| l == g.layer) && inest.is_none_or(|n| n == g.inest))
            .map(|g| {
                let values = self.as_array(g.layer, g.inest)?;
                let mut grid = MartheGrid::new(self.name.clone(), self.istep, g.clone(), values)?;
                grid.uniform = grid.uniform_value().is_some();
                Ok(grid)
            })
            .collect()
    }

    /// Indices of records whose cell contains `(x, y)` on `layer`.
    ///
    /// Every grid of the layer is searched and edges are inclusive, so a
    /// point may hit several cells.
    pub fn sample(&self, x: f64, y: f64, layer: usize, masked_values: &[f64]) -> Vec<usize> {
        let mut hits = Vec::new();
        let mut offset = 0;
        for g in &self.geometries {
            let ncol = g.ncol();
            if g.layer == layer {
                for (i, j) in g.locate(x, y) {
                    let idx = offset + i * ncol + j;
                    if !is_masked(self.records[idx].value, masked_values) {
                        hits.push(idx);
                    }
                }
            }
            offset += g.nrow() * ncol;
        }
        hits
    }

    /// Corner coordinates of every cell of the first layer, deduplicated.
    pub fn xy_vertices(&self) -> Vec<(f64, f64)> {
        let mut out: Vec<(f64, f64)> = Vec::new();
        for g in self.geometries.iter().filter(|g| g.layer == 0) {
            let yv = g.yvertices();
            for x in g.xvertices() {
                for y in &yv {
                    out.push((x, *y));
                }
            }
        }
        out.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        out.dedup();
        out
    }
}
