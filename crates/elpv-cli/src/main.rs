//! # elpv CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration file,
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use elpv_cli::config::load_config;
use elpv_cli::metadata::{run_metadata, MetadataArgs};
use elpv_cli::resources::{run_resources, ResourcesArgs};
use elpv_cli::validate::{run_validate, ValidateArgs};

/// eXeLearning package validator
///
/// Checks `.elp` packages: archive integrity, manifest structure, metadata,
/// and linked resources.
#[derive(Parser, Debug)]
#[command(name = "elpv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file. Defaults to ./elpv.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate packages and print a report for each.
    Validate(ValidateArgs),

    /// Print the metadata of a package as JSON.
    Metadata(MetadataArgs),

    /// List the resources linked from a package and whether they exist.
    Resources(ResourcesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("elpv CLI v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Metadata(args) => run_metadata(&args),
        Commands::Resources(args) => run_resources(&args),
    }
}
