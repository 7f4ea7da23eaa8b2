//! # Validation Report
//!
//! The ordered aggregate produced by one validation run: the checks that
//! executed, the manifest that was selected, the extracted metadata, and the
//! resource references that could not be resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check::{CheckId, CheckStatus, NamedCheck};
use crate::error::FailureKind;
use crate::metadata::PackageMetadata;

/// Which manifest schema a package uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestVariant {
    /// `content.xml`, eXeLearning 3 and later.
    Modern,
    /// `contentv3.xml`, the serialized object graph of eXeLearning 2.
    Legacy,
}

impl ManifestVariant {
    /// Returns the snake_case identifier for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ManifestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The archive entry holding the manifest, and its schema variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestLocation {
    /// Exact entry name inside the archive.
    pub entry_name: String,
    /// Schema variant of the manifest.
    pub variant: ManifestVariant,
}

/// Result of validating one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Checks in pipeline order. Checks after a fatal failure are absent.
    pub checks: Vec<NamedCheck>,
    /// The selected manifest, once classification succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestLocation>,
    /// Extracted metadata, once the metadata check ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PackageMetadata>,
    /// Raw spellings of resource references that did not resolve.
    #[serde(default)]
    pub missing_resources: Vec<String>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check.
    ///
    /// Checks must arrive in pipeline order; each id appears at most once.
    pub fn push(&mut self, check: NamedCheck) {
        debug_assert!(
            self.checks.last().map_or(true, |last| last.id < check.id),
            "check {} pushed out of pipeline order",
            check.id
        );
        self.checks.push(check);
    }

    /// Look up the result of a check, if it ran.
    pub fn check(&self, id: CheckId) -> Option<&NamedCheck> {
        self.checks.iter().find(|c| c.id == id)
    }

    /// The check ids present, in order.
    pub fn check_ids(&self) -> Vec<CheckId> {
        self.checks.iter().map(|c| c.id).collect()
    }

    /// Worst status across all checks; success for an empty report.
    pub fn overall(&self) -> CheckStatus {
        self.checks
            .iter()
            .map(NamedCheck::status)
            .max()
            .unwrap_or(CheckStatus::Success)
    }

    /// Returns true if any check reported an error.
    pub fn has_errors(&self) -> bool {
        self.overall() == CheckStatus::Error
    }

    /// Returns true if any check reported a warning.
    pub fn has_warnings(&self) -> bool {
        self.checks
            .iter()
            .any(|c| c.status() == CheckStatus::Warning)
    }

    /// The fatal failure that stopped the pipeline, if any.
    pub fn halted_by(&self) -> Option<FailureKind> {
        self.checks
            .iter()
            .filter_map(|c| c.failure)
            .find(FailureKind::is_fatal)
    }
}
