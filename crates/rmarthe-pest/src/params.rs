//! Registered parameters and how they are built from a model.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rmarthe_core::{DEFAULT_MASKED_VALUES, MartheField, MartheModel, Transform, WorkDirs, is_masked};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PestError, PestResult};
use crate::names::{check_base_name, pump_name, soil_name, zpc_name};

/// Default multiplier range of pumping parameters.
pub const PUMP_BOUNDS: (f64, f64) = (0.1, 10.0);

/// Default bounds factor around a positive initial value.
pub const BOUNDS_FACTOR: f64 = 100.0;

/// How a parameter set reaches the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterKind {
    /// Zones of piecewise constancy of a gridded property.
    Zpc {
        field: String,
        /// Grid file holding the zone of each cell.
        izone: PathBuf,
        lite: bool,
    },
    /// Multipliers of `/DEBIT/MAILLE` rates.
    Pump,
    /// `/<PROP>/ZONE_SOL` values.
    Soil,
}

/// Model location of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Target {
    Zpc {
        layer: usize,
        zone: usize,
    },
    Pump {
        layer: usize,
        i: usize,
        j: usize,
        /// Registered `(istep, rate)` pairs the multiplier applies to.
        rates: Vec<(usize, f64)>,
    },
    Soil {
        property: String,
        zone: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub parnme: String,
    /// Initial value, untransformed.
    pub value: f64,
    pub lbnd: f64,
    pub ubnd: f64,
    pub target: Target,
}

/// A group of parameters sharing one parameter file and one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Base name; also the PEST++ parameter group.
    pub name: String,
    pub kind: ParameterKind,
    pub transform: Transform,
    /// Relative derivative increment.
    pub derinc: f64,
    pub parameters: Vec<Parameter>,
}

impl ParameterSet {
    pub fn parfile(&self, dirs: &WorkDirs) -> PathBuf {
        dirs.par.join(format!("{}.dat", self.name))
    }

    pub fn tplfile(&self, dirs: &WorkDirs) -> PathBuf {
        dirs.tpl.join(format!("{}.tpl", self.name))
    }

    pub fn parnmes(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.parnme.clone()).collect()
    }

    /// Initial values in transformed space, as written for PEST++.
    pub fn transformed_values(&self) -> Vec<(String, f64)> {
        self.parameters
            .iter()
            .map(|p| (p.parnme.clone(), self.transform.apply(p.value)))
            .collect()
    }

    /// Transformed `(value, lbnd, ubnd)` of a parameter.
    pub fn transformed(&self, p: &Parameter) -> (f64, f64, f64) {
        let t = self.transform;
        (t.apply(p.value), t.apply(p.lbnd), t.apply(p.ubnd))
    }

    fn check(&self) -> PestResult<()> {
        if self.parameters.is_empty() {
            return Err(PestError::Empty(format!("parameter set '{}'", self.name)));
        }
        for p in &self.parameters {
            let (v, l, u) = self.transformed(p);
            if !(v.is_finite() && l.is_finite() && u.is_finite() && l <= v && v <= u) {
                return Err(PestError::Bounds {
                    name: p.parnme.clone(),
                    value: p.value,
                    lbnd: p.lbnd,
                    ubnd: p.ubnd,
                });
            }
        }
        Ok(())
    }
}

/// Options shared by every parameter request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterOptions {
    pub lbnd: Option<f64>,
    pub ubnd: Option<f64>,
    pub transform: Transform,
    pub derinc: f64,
}

impl Default for ParameterOptions {
    fn default() -> Self {
        Self {
            lbnd: None,
            ubnd: None,
            transform: Transform::None,
            derinc: 0.01,
        }
    }
}

impl ParameterOptions {
    fn bounds(&self, value: f64, default: Option<(f64, f64)>) -> (f64, f64) {
        let (dl, du) = default.unwrap_or(if value > 0.0 {
            (value / BOUNDS_FACTOR, value * BOUNDS_FACTOR)
        } else {
            (value, value)
        });
        (self.lbnd.unwrap_or(dl), self.ubnd.unwrap_or(du))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn zone_of(value: f64) -> i64 {
    value.round() as i64
}

/// Zones of piecewise constancy on a loaded property.
#[derive(Debug, Clone, PartialEq)]
pub struct ZpcRequest {
    pub name: String,
    pub field: String,
    pub izone_path: PathBuf,
    /// All layers when `None`.
    pub layers: Option<Vec<usize>>,
    /// Initial value of every zone; the current zone value when `None`.
    pub value: Option<f64>,
    pub lite: bool,
    pub options: ParameterOptions,
}

/// Build a zpc set from the property and its izone field.
///
/// Zones are the distinct positive izone values of each layer. Negative
/// zones (pilot points) are not supported and are skipped with a warning.
pub fn zpc_set(
    model: &MartheModel,
    izone: &MartheField,
    request: &ZpcRequest,
) -> PestResult<ParameterSet> {
    let name = check_base_name(&request.name, false)?;
    let field = model.property(&request.field)?;
    field.check_layout(izone)?;
    let layers: Vec<usize> = request
        .layers
        .clone()
        .unwrap_or_else(|| (0..field.maxlayer()).collect());

    let mut parameters = Vec::new();
    let mut pilot_points = 0usize;
    for layer in layers {
        let mut zones: BTreeSet<i64> = BTreeSet::new();
        for z in izone.records().iter().filter(|r| r.layer == layer) {
            match zone_of(z.value) {
                zone if zone < 0 => pilot_points += 1,
                0 => {}
                zone => {
                    zones.insert(zone);
                }
            }
        }
        for zone in zones {
            let current = field
                .records()
                .iter()
                .zip(izone.records())
                .find(|(r, z)| {
                    r.layer == layer
                        && zone_of(z.value) == zone
                        && !is_masked(r.value, &DEFAULT_MASKED_VALUES)
                })
                .map(|(r, _)| r.value);
            let Some(value) = request.value.or(current) else {
                debug!(field = %request.field, layer, zone, "Zone has no active cell, skipping");
                continue;
            };
            let zone = zone.unsigned_abs() as usize;
            let (lbnd, ubnd) = request.options.bounds(value, None);
            parameters.push(Parameter {
                parnme: zpc_name(&name, layer, zone, request.lite),
                value,
                lbnd,
                ubnd,
                target: Target::Zpc { layer, zone },
            });
        }
    }
    if pilot_points > 0 {
        warn!(
            field = %request.field,
            cells = pilot_points,
            "Negative izone values (pilot points) are not supported, skipping"
        );
    }

    let set = ParameterSet {
        name,
        kind: ParameterKind::Zpc {
            field: field.name.clone(),
            izone: request.izone_path.clone(),
            lite: request.lite,
        },
        transform: request.options.transform,
        derinc: request.options.derinc,
        parameters,
    };
    set.check()?;
    Ok(set)
}

/// Pumping multipliers, one per pumped cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpRequest {
    pub name: String,
    /// All layers when `None`.
    pub layers: Option<Vec<usize>>,
    pub options: ParameterOptions,
}

pub fn pump_set(model: &MartheModel, request: &PumpRequest) -> PestResult<ParameterSet> {
    let name = check_base_name(&request.name, false)?;
    let parameters = model
        .pump
        .cells()
        .into_iter()
        .filter(|(layer, _, _)| request.layers.as_ref().is_none_or(|l| l.contains(layer)))
        .map(|(layer, i, j)| {
            let rates = model
                .pump
                .records
                .iter()
                .filter(|r| (r.layer, r.i, r.j) == (layer, i, j))
                .map(|r| (r.istep, r.value))
                .collect();
            let (lbnd, ubnd) = request.options.bounds(1.0, Some(PUMP_BOUNDS));
            Parameter {
                parnme: pump_name(&name, layer, i, j),
                value: 1.0,
                lbnd,
                ubnd,
                target: Target::Pump { layer, i, j, rates },
            }
        })
        .collect();

    let set = ParameterSet {
        name,
        kind: ParameterKind::Pump,
        transform: request.options.transform,
        derinc: request.options.derinc,
        parameters,
    };
    set.check()?;
    Ok(set)
}

/// Soil properties, one parameter per (property, zone).
#[derive(Debug, Clone, PartialEq)]
pub struct SoilRequest {
    pub name: String,
    /// All properties when `None`.
    pub properties: Option<Vec<String>>,
    pub options: ParameterOptions,
}

pub fn soil_set(model: &MartheModel, request: &SoilRequest) -> PestResult<ParameterSet> {
    let name = check_base_name(&request.name, true)?;
    let properties = request.properties.as_ref().map_or_else(
        || model.soil.properties(),
        |p| p.iter().map(|s| s.to_ascii_lowercase()).collect(),
    );

    let mut parameters = Vec::new();
    for property in properties {
        for zone in model.soil.zones(&property) {
            let Some(value) = model.soil.value(&property, zone) else {
                continue;
            };
            let (lbnd, ubnd) = request.options.bounds(value, None);
            parameters.push(Parameter {
                parnme: soil_name(&name, &property, zone),
                value,
                lbnd,
                ubnd,
                target: Target::Soil {
                    property: property.clone(),
                    zone,
                },
            });
        }
    }

    let set = ParameterSet {
        name,
        kind: ParameterKind::Soil,
        transform: request.options.transform,
        derinc: request.options.derinc,
        parameters,
    };
    set.check()?;
    Ok(set)
}

/// Read the izone field of a zpc set with the model file port.
pub fn read_izone(model: &MartheModel, path: &Path) -> PestResult<MartheField> {
    let grids = model.files().read_grids(path)?;
    Ok(MartheField::from_grids("izone", &grids)?.independent())
}
