//! Zonal statistics over polygons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::field::{DEFAULT_MASKED_VALUES, FieldError, MartheField};
use super::transform::Transform;

/// Aggregation applied to the values of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Count,
    Mean,
    Min,
    Max,
    Median,
    Sum,
    Std,
}

impl Statistic {
    pub const ALL: [Self; 7] = [
        Self::Count,
        Self::Mean,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::Sum,
        Self::Std,
    ];

    /// Apply to a non-empty slice. Returns NaN on empty input except for `Count`.
    pub fn apply(self, values: &[f64]) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        if values.is_empty() {
            return if self == Self::Count { 0.0 } else { f64::NAN };
        }
        match self {
            Self::Count => n,
            Self::Sum => values.iter().sum(),
            Self::Mean => values.iter().sum::<f64>() / n,
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    0.5 * (sorted[mid - 1] + sorted[mid])
                } else {
                    sorted[mid]
                }
            }
            // Sample standard deviation (n - 1)
            Self::Std => {
                if values.len() < 2 {
                    return f64::NAN;
                }
                let mean = values.iter().sum::<f64>() / n;
                let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1.0)).sqrt()
            }
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Count => "count",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::Sum => "sum",
            Self::Std => "std",
        };
        f.write_str(s)
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown statistic '{s}'"))
    }
}

/// Parameters of a zonal statistics computation.
#[derive(Debug, Clone, Default)]
pub struct ZonalStatsRequest {
    pub stats: Vec<Statistic>,
    /// Single part polygons as closed or open rings of `(x, y)`.
    pub polygons: Vec<Vec<(f64, f64)>>,
    /// Layers to aggregate; all layers when `None`.
    pub layers: Option<Vec<usize>>,
    /// Zone names; `<field>_z<k>` when `None`.
    pub names: Option<Vec<String>>,
    pub transform: Transform,
}

/// Statistics of one (zone, layer) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonalStat {
    pub zone: String,
    pub layer: usize,
    pub values: Vec<(Statistic, f64)>,
}

impl ZonalStat {
    pub fn get(&self, stat: Statistic) -> Option<f64> {
        self.values.iter().find(|(s, _)| *s == stat).map(|(_, v)| *v)
    }
}

/// Ray casting point-in-polygon test.
pub fn point_in_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Aggregate field values found at the cell vertices lying inside each polygon.
///
/// Vertices are sampled on every requested layer ignoring default masked
/// values; a cell hit by several vertices counts once.
pub fn zonal_stats(
    field: &MartheField,
    request: &ZonalStatsRequest,
) -> Result<Vec<ZonalStat>, FieldError> {
    let layers: Vec<usize> = request
        .layers
        .clone()
        .unwrap_or_else(|| (0..field.maxlayer()).collect());
    let names: Vec<String> = request.names.clone().unwrap_or_else(|| {
        (0..request.polygons.len())
            .map(|k| format!("{}_z{k}", field.name))
            .collect()
    });
    if names.len() != request.polygons.len() {
        return Err(FieldError::Length {
            expected: request.polygons.len(),
            actual: names.len(),
        });
    }

    let vertices = field.xy_vertices();
    let records = field.records();
    let mut out = Vec::new();

    for (polygon, name) in request.polygons.iter().zip(&names) {
        let inside: Vec<(f64, f64)> = vertices
            .iter()
            .copied()
            .filter(|(x, y)| point_in_polygon(*x, *y, polygon))
            .collect();
        for &layer in &layers {
            let mut nodes: Vec<usize> = inside
                .iter()
                .flat_map(|(x, y)| field.sample(*x, *y, layer, &DEFAULT_MASKED_VALUES))
                .collect();
            nodes.sort_unstable();
            nodes.dedup();
            if nodes.is_empty() {
                continue;
            }
            let values: Vec<f64> = nodes
                .iter()
                .map(|&n| request.transform.apply(records[n].value))
                .collect();
            out.push(ZonalStat {
                zone: name.clone(),
                layer,
                values: request.stats.iter().map(|s| (*s, s.apply(&values))).collect(),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{GridGeometry, MartheGrid, STATIC_ISTEP};
    use ndarray::Array2;

    fn field() -> MartheField {
        let geometry = GridGeometry {
            layer: 0,
            inest: 0,
            xl: 0.0,
            yl: 0.0,
            dx: vec![10.0, 10.0],
            dy: vec![10.0, 10.0],
        };
        let grid = MartheGrid::new(
            "permh",
            STATIC_ISTEP,
            geometry,
            Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
        )
        .unwrap();
        MartheField::from_grids("permh", &[grid]).unwrap()
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        assert!(point_in_polygon(2.0, 2.0, &square));
        assert!(!point_in_polygon(5.0, 2.0, &square));
        assert!(!point_in_polygon(1.0, 1.0, &square[..2]));
    }

    #[test]
    fn test_statistics() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((Statistic::Mean.apply(&v) - 2.5).abs() < 1e-12);
        assert!((Statistic::Median.apply(&v) - 2.5).abs() < 1e-12);
        assert!((Statistic::Min.apply(&v) - 1.0).abs() < 1e-12);
        assert!((Statistic::Std.apply(&v) - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert!(Statistic::Count.apply(&[]).abs() < f64::EPSILON);
        assert_eq!("MEDIAN".parse::<Statistic>().unwrap(), Statistic::Median);
        assert!("mode".parse::<Statistic>().is_err());
    }

    #[test]
    fn test_zonal_stats_center_vertex() {
        // Only the central vertex (10, 10) lies inside; it touches all four cells
        let request = ZonalStatsRequest {
            stats: vec![Statistic::Count, Statistic::Sum],
            polygons: vec![vec![(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)]],
            ..Default::default()
        };
        let stats = zonal_stats(&field(), &request).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].zone, "permh_z0");
        assert_eq!(stats[0].get(Statistic::Count), Some(4.0));
        assert_eq!(stats[0].get(Statistic::Sum), Some(10.0));
    }

    #[test]
    fn test_zonal_stats_layers_and_transform() {
        let geometry = |layer| GridGeometry {
            layer,
            inest: 0,
            xl: 0.0,
            yl: 0.0,
            dx: vec![10.0, 10.0],
            dy: vec![10.0, 10.0],
        };
        let grids = [
            MartheGrid::new(
                "permh",
                STATIC_ISTEP,
                geometry(0),
                Array2::from_shape_vec((2, 2), vec![1.0, 10.0, 100.0, 1000.0]).unwrap(),
            )
            .unwrap(),
            MartheGrid::new("permh", STATIC_ISTEP, geometry(1), Array2::from_elem((2, 2), 2.0))
                .unwrap(),
        ];
        let f = MartheField::from_grids("permh", &grids).unwrap();
        let centre = vec![(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)];

        let request = ZonalStatsRequest {
            stats: vec![Statistic::Mean, Statistic::Max],
            polygons: vec![centre.clone()],
            layers: Some(vec![0]),
            names: Some(vec!["centre".into()]),
            transform: Transform::Log10,
        };
        let stats = zonal_stats(&f, &request).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!((stats[0].zone.as_str(), stats[0].layer), ("centre", 0));
        assert!((stats[0].get(Statistic::Mean).unwrap() - 1.5).abs() < 1e-12);
        assert!((stats[0].get(Statistic::Max).unwrap() - 3.0).abs() < 1e-12);

        // Every layer when none is requested
        let request = ZonalStatsRequest {
            stats: vec![Statistic::Mean],
            polygons: vec![centre],
            ..Default::default()
        };
        let stats = zonal_stats(&f, &request).unwrap();
        assert_eq!(stats.iter().map(|s| s.layer).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(stats[1].get(Statistic::Mean), Some(2.0));
    }

    #[test]
    fn test_zonal_stats_names_length_checked() {
        let request = ZonalStatsRequest {
            stats: vec![Statistic::Count],
            polygons: vec![vec![(5.0, 5.0), (15.0, 5.0), (15.0, 15.0)]],
            names: Some(vec![]),
            ..Default::default()
        };
        assert!(zonal_stats(&field(), &request).is_err());
    }
}
