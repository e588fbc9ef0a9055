//! MARTHE grid block types.
//!
//! A MARTHE property file is a sequence of blocks, one per
//! (layer, nested grid). Row 0 is the northernmost row and `yl` is the
//! southern edge of the block.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::field::FieldError;

/// Time step written for static property grids.
pub const STATIC_ISTEP: i64 = -9999;

/// Geometry of one grid block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// 0-based layer.
    pub layer: usize,
    /// 0 for the main grid, k for the k-th nested grid.
    pub inest: usize,
    /// X coordinate of the left edge.
    pub xl: f64,
    /// Y coordinate of the lower edge.
    pub yl: f64,
    /// Column widths, west to east.
    pub dx: Vec<f64>,
    /// Row heights, north to south.
    pub dy: Vec<f64>,
}

impl GridGeometry {
    pub const fn nrow(&self) -> usize {
        self.dy.len()
    }

    pub const fn ncol(&self) -> usize {
        self.dx.len()
    }

    /// Total width.
    pub fn lx(&self) -> f64 {
        self.dx.iter().sum()
    }

    /// Total height.
    pub fn ly(&self) -> f64 {
        self.dy.iter().sum()
    }

    /// Column edges, `ncol + 1` values from west to east.
    pub fn xvertices(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.dx.len() + 1);
        let mut x = self.xl;
        edges.push(x);
        for w in &self.dx {
            x += w;
            edges.push(x);
        }
        edges
    }

    /// Row edges, `nrow + 1` values from north to south.
    pub fn yvertices(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.dy.len() + 1);
        let mut y = self.yl + self.ly();
        edges.push(y);
        for h in &self.dy {
            y -= h;
            edges.push(y);
        }
        edges
    }

    /// Column centres.
    pub fn xcc(&self) -> Vec<f64> {
        self.xvertices()
            .windows(2)
            .map(|w| 0.5 * (w[0] + w[1]))
            .collect()
    }

    /// Row centres, north to south.
    pub fn ycc(&self) -> Vec<f64> {
        self.yvertices()
            .windows(2)
            .map(|w| 0.5 * (w[0] + w[1]))
            .collect()
    }

    /// Cells `(i, j)` containing the point, edges inclusive.
    ///
    /// A point lying on a shared edge belongs to every adjacent cell.
    pub fn locate(&self, x: f64, y: f64) -> Vec<(usize, usize)> {
        let xv = self.xvertices();
        let yv = self.yvertices();
        let cols: Vec<usize> = xv
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] <= x && x <= w[1])
            .map(|(j, _)| j)
            .collect();
        if cols.is_empty() {
            return Vec::new();
        }
        yv.windows(2)
            .enumerate()
            .filter(|(_, w)| w[1] <= y && y <= w[0])
            .flat_map(|(i, _)| cols.iter().map(move |&j| (i, j)))
            .collect()
    }
}

/// One cell of a gridded property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub layer: usize,
    pub inest: usize,
    pub i: usize,
    pub j: usize,
    /// Cell centre.
    pub x: f64,
    /// Cell centre.
    pub y: f64,
    pub value: f64,
}

/// One grid block with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct MartheGrid {
    /// Property name (e.g. `permh`, `CHARGE`).
    pub field: String,
    /// Simulation step, `STATIC_ISTEP` for properties.
    pub istep: i64,
    pub geometry: GridGeometry,
    /// Values, shape `(nrow, ncol)`.
    pub values: Array2<f64>,
    /// Whether the block was read from (or should be written in) light form.
    pub uniform: bool,
}

impl MartheGrid {
    /// Build a grid, checking that values match the geometry.
    pub fn new(
        field: impl Into<String>,
        istep: i64,
        geometry: GridGeometry,
        values: Array2<f64>,
    ) -> Result<Self, FieldError> {
        let expected = (geometry.nrow(), geometry.ncol());
        if values.dim() != expected {
            return Err(FieldError::Shape {
                expected,
                actual: values.dim(),
            });
        }
        Ok(Self {
            field: field.into(),
            istep,
            geometry,
            values,
            uniform: false,
        })
    }

    /// Build a grid filled with a single value.
    pub fn uniform(
        field: impl Into<String>,
        istep: i64,
        geometry: GridGeometry,
        value: f64,
    ) -> Self {
        let values = Array2::from_elem((geometry.nrow(), geometry.ncol()), value);
        Self {
            field: field.into(),
            istep,
            geometry,
            values,
            uniform: true,
        }
    }

    pub const fn layer(&self) -> usize {
        self.geometry.layer
    }

    pub const fn inest(&self) -> usize {
        self.geometry.inest
    }

    /// The common value when every cell holds the same one.
    pub fn uniform_value(&self) -> Option<f64> {
        let first = *self.values.iter().next()?;
        #[allow(clippy::float_cmp)]
        self.values.iter().all(|v| *v == first).then_some(first)
    }

    /// Flatten the block into row-major cell records.
    pub fn to_records(&self) -> Vec<CellRecord> {
        let xcc = self.geometry.xcc();
        let ycc = self.geometry.ycc();
        self.values
            .indexed_iter()
            .map(|((i, j), value)| CellRecord {
                layer: self.geometry.layer,
                inest: self.geometry.inest,
                i,
                j,
                x: xcc[j],
                y: ycc[i],
                value: *value,
            })
            .collect()
    }
}

/// Location of one grid block inside a multi-block file.
///
/// Produced by indexing large simulation outputs such as `chasim.out`
/// so that blocks can be read selectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBlockSpan {
    pub field: String,
    pub istep: i64,
    pub layer: usize,
    pub inest: usize,
    /// First line of the block (0-based, inclusive).
    pub start_line: usize,
    /// Last line of the block (0-based, inclusive).
    pub end_line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GridGeometry {
        GridGeometry {
            layer: 0,
            inest: 0,
            xl: 0.0,
            yl: 0.0,
            dx: vec![10.0, 20.0, 10.0],
            dy: vec![5.0, 15.0],
        }
    }

    #[test]
    fn test_vertices_and_centres() {
        let g = geometry();
        assert_eq!(g.xvertices(), vec![0.0, 10.0, 30.0, 40.0]);
        assert_eq!(g.yvertices(), vec![20.0, 15.0, 0.0]);
        assert_eq!(g.xcc(), vec![5.0, 20.0, 35.0]);
        assert_eq!(g.ycc(), vec![17.5, 7.5]);
    }

    #[test]
    fn test_locate_interior_and_edge() {
        let g = geometry();
        assert_eq!(g.locate(25.0, 2.0), vec![(1, 1)]);
        // Shared vertical edge between columns 0 and 1
        assert_eq!(g.locate(10.0, 18.0), vec![(0, 0), (0, 1)]);
        assert!(g.locate(-1.0, 2.0).is_empty());
    }

    #[test]
    fn test_new_rejects_wrong_shape() {
        let result = MartheGrid::new("permh", STATIC_ISTEP, geometry(), Array2::zeros((3, 2)));
        assert!(matches!(result, Err(FieldError::Shape { .. })));
    }

    #[test]
    fn test_to_records_row_major() {
        let values = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let grid = MartheGrid::new("permh", STATIC_ISTEP, geometry(), values).unwrap();
        let records = grid.to_records();
        assert_eq!(records.len(), 6);
        assert_eq!((records[4].i, records[4].j), (1, 1));
        assert!((records[4].value - 5.0).abs() < f64::EPSILON);
        assert!((records[4].y - 7.5).abs() < f64::EPSILON);
        assert!(grid.uniform_value().is_none());
    }

    #[test]
    fn test_uniform_grid() {
        let grid = MartheGrid::uniform("permh", STATIC_ISTEP, geometry(), 1e-4);
        assert!(grid.uniform);
        assert_eq!(grid.uniform_value(), Some(1e-4));
    }
}
