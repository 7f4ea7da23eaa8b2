//! # Resources Subcommand
//!
//! Lists every resource reference found in a package's components and
//! whether it resolves to an archive entry.
//!
//! ```bash
//! elpv resources course.elp
//! elpv resources course.elp --missing-only
//! ```
//!
//! Exit code 1 when any reference is missing.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use elpv_archive::open_zip;
use elpv_core::ManifestVariant;
use elpv_manifest::{extract_resource_paths, find_missing_resources, load_manifest, ResourcePath};

/// Arguments for the resources subcommand.
#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Package to inspect.
    pub package: PathBuf,

    /// Only list references that do not resolve.
    #[arg(long)]
    pub missing_only: bool,
}

/// Execute the resources subcommand.
pub fn run_resources(args: &ResourcesArgs) -> Result<u8> {
    let archive = open_zip(&args.package)
        .with_context(|| format!("failed to open package {}", args.package.display()))?;
    let (location, doc) = load_manifest(&archive)
        .with_context(|| format!("failed to load manifest of {}", args.package.display()))?;

    if location.variant == ManifestVariant::Legacy {
        println!("Resource references are not checked for legacy contentv3.xml manifests.");
        return Ok(0);
    }

    let paths = extract_resource_paths(&doc);
    let missing: BTreeSet<String> = find_missing_resources(&paths, &archive).into_iter().collect();

    if paths.is_empty() {
        println!("No linked resources were detected.");
        return Ok(0);
    }

    for path in &paths {
        let is_missing = missing.contains(&path.raw);
        if args.missing_only && !is_missing {
            continue;
        }
        println!("{}", format_line(path, is_missing));
    }
    println!();
    println!(
        "Total: {} linked, {} missing",
        paths.len(),
        missing.len()
    );

    Ok(u8::from(!missing.is_empty()))
}

/// One listing line: status, raw spelling, and the lookup form when it differs.
pub fn format_line(path: &ResourcePath, missing: bool) -> String {
    let status = if missing { "missing" } else { "present" };
    if path.raw == path.normalized {
        format!("  {status:<8} {}", path.raw)
    } else {
        format!("  {status:<8} {} ({})", path.raw, path.normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shows_raw_spelling() {
        let path = ResourcePath::new("content/a.png");
        assert_eq!(format_line(&path, false), "  present  content/a.png");
    }

    #[test]
    fn line_shows_lookup_form_when_different() {
        let path = ResourcePath::new("./content/my%20file.png");
        assert_eq!(
            format_line(&path, true),
            "  missing  ./content/my%20file.png (content/my file.png)"
        );
    }
}
