//! # Metadata Subcommand
//!
//! Prints the metadata of a package as JSON, whichever manifest variant it
//! uses.
//!
//! ```bash
//! elpv metadata course.elp
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use elpv_archive::open_zip;
use elpv_core::{ManifestLocation, PackageMetadata};
use elpv_manifest::{load_manifest, package_metadata};

/// Arguments for the metadata subcommand.
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Package to read.
    pub package: PathBuf,
}

#[derive(Debug, Serialize)]
struct MetadataOutput {
    package: String,
    manifest: ManifestLocation,
    #[serde(flatten)]
    metadata: PackageMetadata,
}

/// Execute the metadata subcommand.
pub fn run_metadata(args: &MetadataArgs) -> Result<u8> {
    let archive = open_zip(&args.package)
        .with_context(|| format!("failed to open package {}", args.package.display()))?;
    let (location, doc) = load_manifest(&archive)
        .with_context(|| format!("failed to load manifest of {}", args.package.display()))?;

    let output = MetadataOutput {
        package: args.package.display().to_string(),
        metadata: package_metadata(&doc, location.variant),
        manifest: location,
    };
    let json = serde_json::to_string_pretty(&output).context("failed to serialize metadata")?;
    println!("{json}");
    Ok(0)
}
