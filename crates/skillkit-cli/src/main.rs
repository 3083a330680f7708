//! Skillkit CLI - validate, package and scaffold skill packages

mod cli;
mod commands;
mod error;

pub use error::CliError;

use clap::Parser;
use cli::{Cli, Commands};
use skillkit_core::ValidationPolicy;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run_command(cli)
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate { path, strict, json } => {
            let policy = ValidationPolicy::load(cli.config.as_deref())?;
            commands::validate::run(&path, &policy, strict, json)?;
        }

        Commands::Package {
            path,
            output,
            skip_validation,
        } => {
            let policy = ValidationPolicy::load(cli.config.as_deref())?;
            commands::package::run(&path, &output, skip_validation, &policy)?;
        }

        Commands::Init {
            name,
            description,
            path,
        } => {
            commands::init::run(name.as_deref(), description.as_deref(), path.as_deref())?;
        }
    }

    Ok(())
}
