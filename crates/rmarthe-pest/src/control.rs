//! PEST++ control file (`.pst`).
//!
//! Parameters and observations are declared in transformed space with
//! `partrans none`; counts are derived from the registered sets.
//! Factor limits need a nonzero value and same-sign bounds, which transformed
//! values rarely keep, so those parameters are relative-limited.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rmarthe_core::{RunRequest, Transform, WorkDirs};

use crate::error::PestResult;
use crate::observations::ObservationSet;
use crate::params::ParameterSet;
use crate::text::{format_value, write_text};

/// Everything the control file is written from.
#[derive(Debug, Clone, Copy)]
pub struct ControlFile<'a> {
    pub dirs: &'a WorkDirs,
    pub parameters: &'a [ParameterSet],
    pub observations: &'a [ObservationSet],
    pub noptmax: i32,
    pub model_command: &'a str,
    pub pestpp_options: &'a BTreeMap<String, String>,
}

fn rel(dirs: &WorkDirs, path: &Path) -> String {
    dirs.relative(path).display().to_string()
}

/// PARCHGLIM of a parameter given its transformed value and bounds.
fn change_limit(transform: Transform, value: f64, lbnd: f64, ubnd: f64) -> &'static str {
    if transform == Transform::None && value != 0.0 && lbnd * ubnd > 0.0 {
        "factor"
    } else {
        "relative"
    }
}

impl ControlFile<'_> {
    pub fn npar(&self) -> usize {
        self.parameters.iter().map(|s| s.parameters.len()).sum()
    }

    pub fn nobs(&self) -> usize {
        self.observations.iter().map(|s| s.observations.len()).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("pcf\n* control data\nrestart estimation\n");
        let _ = writeln!(
            out,
            "{} {} {} 0 {}",
            self.npar(),
            self.nobs(),
            self.parameters.len(),
            self.observations.len()
        );
        let _ = writeln!(
            out,
            "{} {} single point 1 0 0",
            self.parameters.len(),
            self.observations.len()
        );
        out.push_str("10.0 -3.0 0.3 0.03 10\n");
        out.push_str("10.0 10.0 0.001\n");
        out.push_str("0.1\n");
        let _ = writeln!(out, "{} 0.005 4 4 0.005 4", self.noptmax);
        out.push_str("1 1 1\n");

        out.push_str("* parameter groups\n");
        for set in self.parameters {
            let _ = writeln!(
                out,
                "{} relative {} 0.0 switch 2.0 parabolic",
                set.name,
                format_value(set.derinc)
            );
        }

        out.push_str("* parameter data\n");
        for set in self.parameters {
            for p in &set.parameters {
                let (value, lbnd, ubnd) = set.transformed(p);
                let _ = writeln!(
                    out,
                    "{} none {} {} {} {} {} 1.0 0.0 1",
                    p.parnme,
                    change_limit(set.transform, value, lbnd, ubnd),
                    format_value(value),
                    format_value(lbnd),
                    format_value(ubnd),
                    set.name
                );
            }
        }

        out.push_str("* observation groups\n");
        for set in self.observations {
            let _ = writeln!(out, "{}", set.locnme);
        }

        out.push_str("* observation data\n");
        for set in self.observations {
            for (obsnme, value) in set.transformed_values() {
                let _ = writeln!(
                    out,
                    "{obsnme} {} {} {}",
                    format_value(value),
                    format_value(set.weight),
                    set.locnme
                );
            }
        }

        out.push_str("* model command line\n");
        let _ = writeln!(out, "{}", self.model_command);

        out.push_str("* model input/output\n");
        for set in self.parameters {
            let _ = writeln!(
                out,
                "{} {}",
                rel(self.dirs, &set.tplfile(self.dirs)),
                rel(self.dirs, &set.parfile(self.dirs))
            );
        }
        for set in self.observations {
            let _ = writeln!(
                out,
                "{} {}",
                rel(self.dirs, &set.insfile(self.dirs)),
                rel(self.dirs, &set.simfile(self.dirs))
            );
        }

        for (key, value) in self.pestpp_options {
            let _ = writeln!(out, "++{key}({value})");
        }
        out
    }

    pub fn write(&self, path: &Path) -> PestResult<()> {
        write_text(path, &self.render())
    }
}

/// Request running PEST++ on a control file, from the file's directory.
pub fn pest_request(pest_exe: PathBuf, pst: &Path) -> RunRequest {
    let workdir = pst
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = pst
        .file_name()
        .map_or_else(|| pst.display().to_string(), |n| n.to_string_lossy().into_owned());
    RunRequest::new("pestpp", pest_exe, workdir).with_arg(file_name)
}
