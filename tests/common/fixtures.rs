//! Test fixtures for creating MARTHE projects on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rmarthe::core_types::GridWriteOptions;
use rmarthe::{MartheFileParser, MartheFilesPort, MartheModel};

pub const RMA: &str = "Mona test model
mona.permh     = Permeabilite
mona.pastp     = Pas de temps
";

/// Two 2x2 layers; the lower left cell of the first layer is inactive.
pub const PERMH: &str = "Marthe_Grid Version=9.0
Title=Permeabilite
[Infos]
Field=PERMEAB
Time_Step=-9999
Layer=1
Max_Layer=2
Nest_grid=0
Max_NestG=0
[Structure]
X_Left_Corner=0
Y_Lower_Corner=0
Ncolumn=2
Nrows=2
[Data]
0 0 5 15
1 15 1E-4 1E-4 10
2 5 0 1E-4 10
0 0 10 10
[End_Grid]
Marthe_Grid Version=9.0
Title=Permeabilite
[Infos]
Field=PERMEAB
Time_Step=-9999
Layer=2
Max_Layer=2
Nest_grid=0
Max_NestG=0
[Structure]
X_Left_Corner=0
Y_Lower_Corner=0
Ncolumn=2
Nrows=2
[Constant_Data]
Uniform_Value=1E-5
[Columns_x_and_y_Widths]
10 10
10 10
[End_Grid]
";

pub const PASTP: &str = "Pas de temps
 *** Debut de la simulation    a la date : 01/01/2010 ; ***
  /DEBIT/MAILLE      C=    2L=    1P=    1V=     -0.5;
 /*****
 *** Le pas :     1: fin le : 31/01/2010 ;
  /CAP_SOL_PROGR/ZONE_SOL      Z=      1V=     100;
 /*****
 *** Le pas :     2: fin le : 28/02/2010 ;
";

/// Heads measured at P01.
pub const OBS_P01: &str = "# piezometer P01\ndate value\n31/01/2010 17.2\n2010-02-28 16.6\n";

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, m, d).unwrap()
}

pub fn parser() -> Arc<MartheFileParser> {
    Arc::new(MartheFileParser::new())
}

/// Writes the project files and returns the `.rma` path.
pub fn write_model(dir: &Path) -> PathBuf {
    let rma = dir.join("mona.rma");
    fs::write(&rma, RMA).unwrap();
    fs::write(dir.join("mona.permh"), PERMH).unwrap();
    fs::write(dir.join("mona.pastp"), PASTP).unwrap();
    fs::write(dir.join("p01.dat"), OBS_P01).unwrap();
    rma
}

/// Zone file with one zone per layer over the active cells.
pub fn write_layer_zones(model: &MartheModel, path: &Path) {
    let mut zones = model.imask.clone();
    zones.set_value(1.0, None, None);
    let options = GridWriteOptions {
        maxlayer: model.nlay(),
        maxnest: model.nnest(),
        keep_uniform_fmt: true,
    };
    MartheFileParser::new()
        .write_grids(path, &zones.to_grids(None, None).unwrap(), &options)
        .unwrap();
}
