//! Optim command handlers: build and inspect a PEST++ case.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rmarthe_core::{MartheModel, Transform};
use rmarthe_pest::{
    ObservationSet, OptimRegistry, ParameterKind, PumpRequest, SoilRequest, ZpcRequest, pump_set,
    read_izone, soil_set, zpc_set,
};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::optim_commands::{OptimCommand, ParamArgs};
use crate::presentation::{format_value, render_table};

/// Dispatch an optim subcommand.
pub fn execute(ctx: &CliContext, command: OptimCommand) -> Result<()> {
    match command {
        OptimCommand::Init {
            name,
            rma,
            root,
            noptmax,
            options,
            command,
            force,
        } => {
            let registry = init(&name, &rma, &root, noptmax, &options, command, force)?;
            println!(
                "Created case '{}' at {}",
                registry.name,
                registry.registry_path().display()
            );
            Ok(())
        }
        OptimCommand::AddZpc {
            registry,
            name,
            field,
            izone,
            layers,
            value,
            lite,
            params,
        } => {
            let izone_path = canonical(&izone)?;
            let request = ZpcRequest {
                name,
                field,
                izone_path,
                layers: (!layers.is_empty()).then_some(layers),
                value,
                lite,
                options: (&params).into(),
            };
            add_zpc(ctx, &registry, &request)
        }
        OptimCommand::AddPump {
            registry,
            name,
            layers,
            params,
        } => add_pump(ctx, &registry, name, layers, &params),
        OptimCommand::AddSoil {
            registry,
            name,
            properties,
            params,
        } => add_soil(ctx, &registry, name, properties, &params),
        OptimCommand::AddObs {
            registry,
            obsfile,
            locnme,
            weight,
            trans,
        } => add_obs(ctx, &registry, &obsfile, locnme.as_deref(), weight, trans),
        OptimCommand::Write { registry } => write(ctx, &registry),
        OptimCommand::Show { registry } => {
            let registry = OptimRegistry::load(&registry).map_err(CliError::from)?;
            print!("{}", describe(&registry));
            Ok(())
        }
    }
}

fn canonical(path: &Path) -> Result<PathBuf, CliError> {
    fs::canonicalize(path)
        .map_err(|e| CliError::Arguments(format!("{}: {e}", path.display())))
}

/// Create the case registry and its directories.
pub fn init(
    name: &str,
    rma: &Path,
    root: &Path,
    noptmax: i32,
    options: &[(String, String)],
    command: Option<String>,
    force: bool,
) -> Result<OptimRegistry, CliError> {
    let rma = canonical(rma)?;
    fs::create_dir_all(root)?;
    let root = canonical(root)?;

    let mut registry = OptimRegistry::new(name, rma, root)?;
    let path = registry.registry_path();
    if path.exists() && !force {
        return Err(CliError::Arguments(format!(
            "{} already exists, use --force to replace it",
            path.display()
        )));
    }
    registry.noptmax = noptmax;
    if let Some(command) = command {
        registry.model_command = command;
    }
    for (key, value) in options {
        registry.set_option(key, value);
    }
    registry.save()?;
    info!(case = %registry.name, path = %path.display(), "Created case registry");
    Ok(registry)
}

/// Load the registry and the model it points to.
fn open(ctx: &CliContext, path: &Path) -> Result<(OptimRegistry, MartheModel), CliError> {
    let registry = OptimRegistry::load(path)?;
    let model = ctx.load_model(&registry.rma)?;
    Ok((registry, model))
}

fn report_set(registry: &OptimRegistry, name: &str, count: usize) {
    println!(
        "Added {count} parameter(s) in '{name}' ({} parameter(s), {} observation(s) in case)",
        registry.npar(),
        registry.nobs()
    );
}

pub fn add_zpc(ctx: &CliContext, path: &Path, request: &ZpcRequest) -> Result<()> {
    let (mut registry, mut model) = open(ctx, path)?;
    model.load_property(&request.field).map_err(CliError::from)?;
    let izone = read_izone(&model, &request.izone_path).map_err(CliError::from)?;
    let set = zpc_set(&model, &izone, request).map_err(CliError::from)?;
    let count = set.parameters.len();
    registry.add_parameter_set(set).map_err(CliError::from)?;
    registry.save().map_err(CliError::from)?;
    report_set(&registry, &request.name, count);
    Ok(())
}

fn add_pump(
    ctx: &CliContext,
    path: &Path,
    name: String,
    layers: Vec<usize>,
    params: &ParamArgs,
) -> Result<()> {
    let (mut registry, model) = open(ctx, path)?;
    let request = PumpRequest {
        name,
        layers: (!layers.is_empty()).then_some(layers),
        options: params.into(),
    };
    let set = pump_set(&model, &request).map_err(CliError::from)?;
    let count = set.parameters.len();
    registry.add_parameter_set(set).map_err(CliError::from)?;
    registry.save().map_err(CliError::from)?;
    report_set(&registry, &request.name, count);
    Ok(())
}

fn add_soil(
    ctx: &CliContext,
    path: &Path,
    name: String,
    properties: Vec<String>,
    params: &ParamArgs,
) -> Result<()> {
    let (mut registry, model) = open(ctx, path)?;
    let request = SoilRequest {
        name,
        properties: (!properties.is_empty()).then_some(properties),
        options: params.into(),
    };
    let set = soil_set(&model, &request).map_err(CliError::from)?;
    let count = set.parameters.len();
    registry.add_parameter_set(set).map_err(CliError::from)?;
    registry.save().map_err(CliError::from)?;
    report_set(&registry, &request.name, count);
    Ok(())
}

pub fn add_obs(
    ctx: &CliContext,
    path: &Path,
    obsfile: &Path,
    locnme: Option<&str>,
    weight: Option<f64>,
    transform: Transform,
) -> Result<()> {
    let mut registry = OptimRegistry::load(path).map_err(CliError::from)?;
    let series = ctx.files.read_obs(obsfile, locnme).map_err(CliError::from)?;
    let set = ObservationSet::from_series(&series, weight, transform).map_err(CliError::from)?;
    let (locnme, count) = (set.locnme.clone(), set.observations.len());
    registry.add_observation_set(set).map_err(CliError::from)?;
    registry.save().map_err(CliError::from)?;
    println!(
        "Added {count} observation(s) at '{locnme}' ({} observation(s) in case)",
        registry.nobs()
    );
    Ok(())
}

pub fn write(ctx: &CliContext, path: &Path) -> Result<()> {
    let registry = OptimRegistry::load(path).map_err(CliError::from)?;
    let mldir = registry.rma.parent().unwrap_or_else(|| Path::new("."));
    let settings = ctx.settings(mldir)?;
    registry
        .write_files(settings.effective_marker_width())
        .map_err(CliError::from)?;
    println!(
        "Wrote {} ({} parameter(s), {} observation(s))",
        registry.pst_path().display(),
        registry.npar(),
        registry.nobs()
    );
    Ok(())
}

fn kind_label(kind: &ParameterKind) -> String {
    match kind {
        ParameterKind::Zpc { field, .. } => format!("zpc {field}"),
        ParameterKind::Pump => "pump".to_string(),
        ParameterKind::Soil => "soil".to_string(),
    }
}

/// Human readable listing of a case.
pub fn describe(registry: &OptimRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Case:     {}", registry.name);
    let _ = writeln!(out, "Model:    {}", registry.rma.display());
    let _ = writeln!(out, "Root:     {}", registry.dirs.root.display());
    let _ = writeln!(out, "Command:  {}", registry.model_command);
    let _ = writeln!(out, "NOPTMAX:  {}", registry.noptmax);
    for (key, value) in &registry.pestpp_options {
        let _ = writeln!(out, "++{key}({value})");
    }

    out.push('\n');
    let rows: Vec<Vec<String>> = registry
        .parameters
        .iter()
        .map(|set| {
            vec![
                set.name.clone(),
                kind_label(&set.kind),
                set.transform.to_string(),
                set.parameters.len().to_string(),
                format_value(set.derinc),
            ]
        })
        .collect();
    out.push_str(&render_table(&["set", "kind", "trans", "npar", "derinc"], &rows));

    out.push('\n');
    let rows: Vec<Vec<String>> = registry
        .observations
        .iter()
        .map(|set| {
            vec![
                set.locnme.clone(),
                set.transform.to_string(),
                set.observations.len().to_string(),
                format_value(set.weight),
            ]
        })
        .collect();
    out.push_str(&render_table(&["location", "trans", "nobs", "weight"], &rows));
    out
}
