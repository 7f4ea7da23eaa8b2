//! # Validate Subcommand
//!
//! Runs the full validation pipeline over one or more `.elp` packages and
//! prints a report per package.
//!
//! ```bash
//! elpv validate course.elp
//! elpv validate a.elp b.elp --format json --fail-on-warning
//! ```
//!
//! Exit code 0 when no package has an error (with `--fail-on-warning`, no
//! warning either), 1 otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use elpv_core::ValidationReport;
use elpv_manifest::{validate_zip_file, ValidationOptions};

use crate::config::{CliConfig, OutputFormat};
use crate::output::{render_json, render_text, PackageReport};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Packages to validate.
    #[arg(required = true)]
    pub packages: Vec<PathBuf>,

    /// Output format. Defaults to the config file value, else text.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Treat warnings as failures for the exit code.
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Number of missing resources listed before truncating. 0 lists all.
    #[arg(long, value_name = "N")]
    pub missing_preview: Option<usize>,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateSettings {
    pub format: OutputFormat,
    pub fail_on_warning: bool,
    pub options: ValidationOptions,
}

impl ValidateSettings {
    pub fn resolve(args: &ValidateArgs, config: &CliConfig) -> Self {
        let mut options = config.validation_options();
        if let Some(limit) = args.missing_preview {
            options.missing_preview_limit = limit;
        }
        Self {
            format: args.format.unwrap_or(config.format),
            fail_on_warning: args.fail_on_warning || config.fail_on_warning,
            options,
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let settings = ValidateSettings::resolve(args, config);

    let reports: Vec<(String, ValidationReport)> = args
        .packages
        .iter()
        .map(|path| {
            (
                path.display().to_string(),
                validate_zip_file(path, &settings.options),
            )
        })
        .collect();
    let labelled: Vec<PackageReport<'_>> = reports
        .iter()
        .map(|(name, report)| PackageReport::new(name.clone(), report))
        .collect();

    match settings.format {
        OutputFormat::Text => {
            for package in &labelled {
                print!("{}", render_text(package));
            }
        }
        OutputFormat::Json => {
            let json = render_json(&labelled).context("failed to serialize reports")?;
            println!("{json}");
        }
    }

    let failed = reports
        .iter()
        .filter(|(_, report)| is_failure(report, settings.fail_on_warning))
        .count();
    if failed > 0 {
        tracing::info!(failed, total = reports.len(), "validation failed");
        return Ok(1);
    }
    Ok(0)
}

/// Whether a report should make the command exit non-zero.
pub fn is_failure(report: &ValidationReport, fail_on_warning: bool) -> bool {
    report.has_errors() || (fail_on_warning && report.has_warnings())
}
