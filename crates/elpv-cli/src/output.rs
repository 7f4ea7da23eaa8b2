//! # Report Rendering
//!
//! Text and JSON renderings of validation reports. Rendering returns strings;
//! printing is left to the subcommands.

use elpv_core::{CheckStatus, ValidationReport};
use serde::Serialize;

/// Icon shown in front of a check line.
pub fn status_icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Success => "✔",
        CheckStatus::Warning => "⚠",
        CheckStatus::Error => "✖",
    }
}

/// One package's report, labelled for output.
#[derive(Debug, Serialize)]
pub struct PackageReport<'a> {
    pub package: String,
    pub overall: CheckStatus,
    #[serde(flatten)]
    pub report: &'a ValidationReport,
}

impl<'a> PackageReport<'a> {
    pub fn new(package: impl Into<String>, report: &'a ValidationReport) -> Self {
        Self {
            package: package.into(),
            overall: report.overall(),
            report,
        }
    }
}

/// Human-readable rendering of one report.
///
/// ```text
/// course.elp: success
///   ✔ Valid ZIP archive: The file is a valid ZIP archive.
///   ✔ Manifest present: Found content.xml in the package.
/// ```
pub fn render_text(package: &PackageReport<'_>) -> String {
    let mut out = format!("{}: {}\n", package.package, package.overall);
    for check in &package.report.checks {
        out.push_str(&format!(
            "  {} {}: {}\n",
            status_icon(check.status()),
            check.id.label(),
            check.result.message
        ));
    }
    if let Some(kind) = package.report.halted_by() {
        out.push_str(&format!("  Validation stopped early ({kind}).\n"));
    }
    out
}

/// Pretty-printed JSON array of reports.
pub fn render_json(packages: &[PackageReport<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(packages)
}
