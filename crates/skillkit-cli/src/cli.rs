//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Skillkit - validate, package and scaffold skill packages
#[derive(Parser)]
#[command(name = "skillkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Validation policy file (toml, yaml or json)
    #[arg(short = 'c', long, global = true, env = "SKILLKIT_POLICY")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a skill package directory
    Validate {
        /// Path to the skill directory
        path: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Package a skill into a distributable zip file
    Package {
        /// Path to the skill directory
        path: PathBuf,

        /// Output directory for the zip file
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,

        /// Skip validation before packaging
        #[arg(long)]
        skip_validation: bool,
    },

    /// Initialize a new skill with the standard layout
    Init {
        /// Skill name in kebab-case (e.g. 'database-patterns')
        #[arg(long)]
        name: Option<String>,

        /// What the skill does and when to use it
        #[arg(long)]
        description: Option<String>,

        /// Directory to create the skill in (overrides --name)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
