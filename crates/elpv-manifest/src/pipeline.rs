//! # Validation Pipeline
//!
//! Runs every check against one package and collects the results into a
//! [`ValidationReport`] in fixed order.
//!
//! ## Short-Circuit Rules
//!
//! A fatal failure (unreadable archive, missing manifest, malformed or
//! unreadable manifest, wrong root element, missing navigation container)
//! ends the run: later checks are absent from the report. Everything else is
//! recorded and the run continues.
//!
//! Legacy manifests only get the checks that apply to them. The rest are
//! reported as skipped warnings.

use std::io::Cursor;
use std::path::Path;

use elpv_archive::{open_zip, read_zip, Archive, ArchiveError, MemoryArchive};
use elpv_core::{
    CheckId, CheckResult, ElpvError, FailureKind, ManifestLocation, ManifestVariant, NamedCheck,
    PackageMetadata, ValidationReport,
};
use serde::{Deserialize, Serialize};

use crate::classify::classify_manifest;
use crate::document::{parse_manifest, ManifestDocument};
use crate::metadata::{extract_legacy_metadata, extract_metadata, normalize_legacy_metadata};
use crate::resources::{extract_resource_paths, find_missing_resources};
use crate::structure::{
    check_nav_structures, check_page_presence, check_root_element, validate_structural_integrity,
};

/// Default number of missing resources listed in the resources check.
pub const DEFAULT_MISSING_PREVIEW_LIMIT: usize = 5;

/// Reason given by every check skipped for a legacy manifest.
pub const LEGACY_SKIP_REASON: &str = "not applicable to legacy contentv3.xml manifests.";

/// Folders a package is expected to keep its resources in.
pub const RESOURCE_FOLDERS: &[&str] = &["content/", "custom/"];

/// Tunables of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// How many missing resources the resources check message lists before
    /// truncating with `, …`. Zero lists all of them.
    pub missing_preview_limit: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            missing_preview_limit: DEFAULT_MISSING_PREVIEW_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate a zip package on disk.
///
/// Failure to open or decode the file is reported in the `archive` check,
/// never returned.
pub fn validate_zip_file(path: &Path, options: &ValidationOptions) -> ValidationReport {
    tracing::info!(path = %path.display(), "validating package");
    with_archive_check(open_zip(path), options)
}

/// Validate a zip package held in memory.
pub fn validate_zip_bytes(bytes: &[u8], options: &ValidationOptions) -> ValidationReport {
    with_archive_check(read_zip(Cursor::new(bytes)), options)
}

fn with_archive_check(
    opened: Result<MemoryArchive, ArchiveError>,
    options: &ValidationOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    match opened {
        Ok(archive) => {
            tracing::debug!(entries = archive.len(), "archive opened");
            report.push(NamedCheck::new(
                CheckId::Archive,
                CheckResult::success("The file is a valid ZIP archive."),
            ));
            run_checks(&archive, options, &mut report);
        }
        Err(e) => {
            let err = ElpvError::MalformedArchive(e.to_string());
            tracing::warn!(error = %e, "archive could not be opened");
            push_failure(&mut report, CheckId::Archive, &err);
        }
    }
    report
}

/// Validate an already-opened archive.
///
/// The report starts at the `manifest` check; opening the container is the
/// caller's concern.
pub fn validate_archive<A: Archive + ?Sized>(
    archive: &A,
    options: &ValidationOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    run_checks(archive, options, &mut report);
    report
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn run_checks<A: Archive + ?Sized>(
    archive: &A,
    options: &ValidationOptions,
    report: &mut ValidationReport,
) {
    // 1. Manifest
    let location = match classify_manifest(archive) {
        Ok(location) => location,
        Err(e) => {
            tracing::warn!("no manifest entry found");
            push_failure(report, CheckId::Manifest, &e.into());
            return;
        }
    };
    tracing::debug!(entry = %location.entry_name, variant = %location.variant, "manifest classified");
    report.push(NamedCheck::new(
        CheckId::Manifest,
        CheckResult::success(manifest_found_message(&location)),
    ));
    report.manifest = Some(location.clone());

    // 2. Resource folders
    report.push(NamedCheck::new(
        CheckId::ResourceFolders,
        check_resource_folders(archive),
    ));

    // 3. Well-formedness
    let doc = match read_manifest(archive, &location.entry_name) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "manifest is not usable");
            push_failure(report, CheckId::WellFormed, &err);
            return;
        }
    };
    report.push(NamedCheck::new(
        CheckId::WellFormed,
        CheckResult::success(format!("{} is well-formed.", location.entry_name)),
    ));

    if location.variant == ManifestVariant::Legacy {
        run_legacy_checks(&doc, report);
        return;
    }

    // 4. Root element and navigation container
    for (id, result) in [
        (CheckId::RootElement, check_root_element(&doc)),
        (CheckId::NavStructures, check_nav_structures(&doc)),
    ] {
        if result.is_error() {
            tracing::warn!(check = %id, "required element missing, stopping");
            push_failure(report, id, &ElpvError::MissingRequiredElement(result.message));
            return;
        }
        report.push(NamedCheck::new(id, result));
    }

    // 5. Pages and structure
    let pages = check_page_presence(&doc);
    if pages.is_success() {
        report.push(NamedCheck::new(CheckId::Pages, pages));
    } else {
        push_failure(report, CheckId::Pages, &ElpvError::EmptyProject);
    }

    let structure = validate_structural_integrity(&doc);
    if structure.is_success() {
        report.push(NamedCheck::new(CheckId::Structure, structure));
    } else {
        push_failure(
            report,
            CheckId::Structure,
            &ElpvError::StructuralFieldMissing(structure.message),
        );
    }

    // 6. Metadata
    push_metadata(report, extract_metadata(&doc));

    // 7. Resources
    let paths = extract_resource_paths(&doc);
    if paths.is_empty() {
        report.push(NamedCheck::new(
            CheckId::Resources,
            CheckResult::success("No linked resources were detected."),
        ));
        return;
    }

    let missing = find_missing_resources(&paths, archive);
    if missing.is_empty() {
        report.push(NamedCheck::new(
            CheckId::Resources,
            CheckResult::success(all_present_message(paths.len())),
        ));
    } else {
        tracing::debug!(missing = missing.len(), total = paths.len(), "unresolved resources");
        report.push(NamedCheck::failed(
            CheckId::Resources,
            CheckResult::warning(missing_message(&missing, options.missing_preview_limit)),
            FailureKind::ResourceMissing,
        ));
        report.missing_resources = missing;
    }
}

fn run_legacy_checks(doc: &ManifestDocument, report: &mut ValidationReport) {
    for id in [
        CheckId::RootElement,
        CheckId::NavStructures,
        CheckId::Pages,
        CheckId::Structure,
    ] {
        report.push(NamedCheck::new(id, CheckResult::skipped(LEGACY_SKIP_REASON)));
    }
    push_metadata(report, normalize_legacy_metadata(&extract_legacy_metadata(doc)));
    report.push(NamedCheck::new(
        CheckId::Resources,
        CheckResult::skipped(LEGACY_SKIP_REASON),
    ));
}

fn push_failure(report: &mut ValidationReport, id: CheckId, err: &ElpvError) {
    report.push(NamedCheck::failed(
        id,
        CheckResult::from_error(err),
        err.kind(),
    ));
}

fn push_metadata(report: &mut ValidationReport, metadata: PackageMetadata) {
    report.push(NamedCheck::new(
        CheckId::Metadata,
        CheckResult::success(format!(
            "Extracted {} properties and {} resources.",
            metadata.properties.len(),
            metadata.resources.len()
        )),
    ));
    report.metadata = Some(metadata);
}

fn manifest_found_message(location: &ManifestLocation) -> String {
    match location.variant {
        ManifestVariant::Modern => format!("Found {} in the package.", location.entry_name),
        ManifestVariant::Legacy => format!(
            "Found {} (legacy eXeLearning format) in the package.",
            location.entry_name
        ),
    }
}

fn check_resource_folders<A: Archive + ?Sized>(archive: &A) -> CheckResult {
    let names = archive.entry_names();
    let found: Vec<String> = RESOURCE_FOLDERS
        .iter()
        .filter(|folder| names.iter().any(|name| name.starts_with(**folder)))
        .map(|folder| format!("{folder} directory detected"))
        .collect();

    if found.is_empty() {
        CheckResult::warning("Recommended resource folders were not found.")
    } else {
        CheckResult::success(found.join(" • "))
    }
}

fn read_manifest<A: Archive + ?Sized>(
    archive: &A,
    entry: &str,
) -> Result<ManifestDocument, ElpvError> {
    let text = archive.read_entry_text(entry).map_err(|e| {
        tracing::debug!(error = %e, "manifest read failed");
        ElpvError::MalformedDocument(format!("Unable to read {entry} from the archive."))
    })?;
    Ok(parse_manifest(&text)?)
}

fn all_present_message(count: usize) -> String {
    if count == 1 {
        "All 1 linked resource is present.".to_string()
    } else {
        format!("All {count} linked resources are present.")
    }
}

fn missing_message(missing: &[String], limit: usize) -> String {
    let truncated = limit > 0 && missing.len() > limit;
    let shown = if truncated { &missing[..limit] } else { missing };
    let mut message = ElpvError::ResourceMissing(shown.to_vec()).to_string();
    if truncated {
        message.push_str(", …");
    }
    message
}

// ---------------------------------------------------------------------------
// Single-purpose helpers
// ---------------------------------------------------------------------------

/// Locate, read and parse the manifest of a package.
pub fn load_manifest<A: Archive + ?Sized>(
    archive: &A,
) -> Result<(ManifestLocation, ManifestDocument), ElpvError> {
    let location = classify_manifest(archive)?;
    let doc = read_manifest(archive, &location.entry_name)?;
    Ok((location, doc))
}

/// Metadata of a parsed manifest, using the extractor for its variant.
pub fn package_metadata(doc: &ManifestDocument, variant: ManifestVariant) -> PackageMetadata {
    match variant {
        ManifestVariant::Modern => extract_metadata(doc),
        ManifestVariant::Legacy => normalize_legacy_metadata(&extract_legacy_metadata(doc)),
    }
}
