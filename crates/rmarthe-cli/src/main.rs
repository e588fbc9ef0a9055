//! CLI entry point - the composition root.
//!
//! Wires the file parser and the process runner via bootstrap, then routes
//! each command to its handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use rmarthe_cli::handlers::series::SeriesArgs;
use rmarthe_cli::{Cli, CliConfig, Commands, bootstrap, exit_code, handlers};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig {
        settings_path: cli.settings,
    });

    match command {
        Commands::Info { rma } => handlers::info::execute(&ctx, &rma),
        Commands::Field { command } => handlers::field::execute(&ctx, command),
        Commands::Series {
            rma,
            field,
            points,
            names,
            isteps,
            chasim,
            base,
        } => {
            let args = SeriesArgs {
                rma: &rma,
                field: &field,
                points: &points,
                names: &names,
                isteps: &isteps,
                chasim: chasim.as_deref(),
                base,
            };
            handlers::series::execute(&ctx, &args)
        }
        Commands::Optim { command } => handlers::optim::execute(&ctx, command),
        Commands::ForwardRun { registry } => handlers::forward_run::execute(&ctx, &registry).await,
        Commands::RunPest { registry, program } => {
            handlers::run_pest::execute(&ctx, &registry, program.as_deref()).await
        }
        Commands::CheckExe { dir } => handlers::check_exe::execute(&ctx, &dir),
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = dispatch(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}
