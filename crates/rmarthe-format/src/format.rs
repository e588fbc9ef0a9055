//! MARTHE text format constants.

/// First token of every grid block.
pub const GRID_MAGIC: &str = "Marthe_Grid";

/// Version written in grid headers.
pub const GRID_VERSION: &str = "9.0";

pub const SECTION_INFOS: &str = "[Infos]";
pub const SECTION_STRUCTURE: &str = "[Structure]";
pub const SECTION_DATA: &str = "[Data]";
pub const SECTION_CONSTANT: &str = "[Constant_Data]";
pub const SECTION_WIDTHS: &str = "[Columns_x_and_y_Widths]";
pub const SECTION_END: &str = "[End_Grid]";

/// Header keys.
pub mod keys {
    pub const FIELD: &str = "Field";
    pub const TIME_STEP: &str = "Time_Step";
    pub const LAYER: &str = "Layer";
    pub const MAX_LAYER: &str = "Max_Layer";
    pub const NEST_GRID: &str = "Nest_grid";
    pub const MAX_NESTG: &str = "Max_NestG";
    pub const X_LEFT: &str = "X_Left_Corner";
    pub const Y_LOWER: &str = "Y_Lower_Corner";
    pub const NCOLUMN: &str = "Ncolumn";
    pub const NROWS: &str = "Nrows";
    pub const UNIFORM_VALUE: &str = "Uniform_Value";
}

/// Date format used in MARTHE files.
pub const DATE_FMT: &str = "%d/%m/%Y";

/// ISO date format accepted in observation files.
pub const ISO_DATE_FMT: &str = "%Y-%m-%d";

/// Parse a MARTHE number, accepting Fortran `D` exponents.
pub fn parse_number(token: &str) -> Option<f64> {
    let t = token.trim();
    t.parse::<f64>()
        .ok()
        .or_else(|| t.replace(['D', 'd'], "E").parse::<f64>().ok())
}

/// Format a value for MARTHE text files.
///
/// Plain decimal notation for ordinary magnitudes, exponent notation
/// otherwise so that very small permeabilities keep their precision.
pub fn format_number(value: f64) -> String {
    let a = value.abs();
    if value == 0.0 || (1e-4..1e7).contains(&a) {
        format!("{value}")
    } else {
        format!("{value:E}")
    }
}
