//! Grid block formatting.

use rmarthe_core::{GridWriteOptions, MartheGrid};

use crate::format::{
    GRID_MAGIC, GRID_VERSION, SECTION_CONSTANT, SECTION_DATA, SECTION_END, SECTION_INFOS,
    SECTION_STRUCTURE, SECTION_WIDTHS, format_number, keys,
};

fn join(values: impl IntoIterator<Item = f64>) -> String {
    values
        .into_iter()
        .map(format_number)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format grid blocks as a MARTHE grid file.
pub fn format_grids(grids: &[MartheGrid], options: &GridWriteOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    for grid in grids {
        push_block(&mut lines, grid, options);
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_block(lines: &mut Vec<String>, grid: &MartheGrid, options: &GridWriteOptions) {
    let g = &grid.geometry;
    lines.push(format!("{GRID_MAGIC} Version={GRID_VERSION}"));
    lines.push(format!("Title={}", grid.field));
    lines.push(SECTION_INFOS.to_string());
    lines.push(format!("{}={}", keys::FIELD, grid.field));
    lines.push("Type=".to_string());
    lines.push("Elem_Number=0".to_string());
    lines.push("Name=".to_string());
    lines.push(format!("{}={}", keys::TIME_STEP, grid.istep));
    lines.push("Time=0".to_string());
    lines.push(format!("{}={}", keys::LAYER, g.layer + 1));
    lines.push(format!("{}={}", keys::MAX_LAYER, options.maxlayer));
    lines.push(format!("{}={}", keys::NEST_GRID, g.inest));
    lines.push(format!("{}={}", keys::MAX_NESTG, options.maxnest));
    lines.push(SECTION_STRUCTURE.to_string());
    lines.push(format!("{}={}", keys::X_LEFT, format_number(g.xl)));
    lines.push(format!("{}={}", keys::Y_LOWER, format_number(g.yl)));
    lines.push(format!("{}={}", keys::NCOLUMN, g.ncol()));
    lines.push(format!("{}={}", keys::NROWS, g.nrow()));

    match grid.uniform_value() {
        Some(value) if options.keep_uniform_fmt && grid.uniform => {
            lines.push(SECTION_CONSTANT.to_string());
            lines.push(format!("{}={}", keys::UNIFORM_VALUE, format_number(value)));
            lines.push(SECTION_WIDTHS.to_string());
            lines.push(join(g.dx.iter().copied()));
            lines.push(join(g.dy.iter().copied()));
        }
        _ => {
            lines.push(SECTION_DATA.to_string());
            lines.push(format!("0 0 {}", join(g.xcc())));
            let ycc = g.ycc();
            for (i, row) in grid.values.rows().into_iter().enumerate() {
                lines.push(format!(
                    "{} {} {} {}",
                    i + 1,
                    format_number(ycc[i]),
                    join(row.iter().copied()),
                    format_number(g.dy[i])
                ));
            }
            lines.push(format!("0 0 {}", join(g.dx.iter().copied())));
        }
    }
    lines.push(SECTION_END.to_string());
}
