//! # Check Results — Single Source of Truth for the Checklist
//!
//! Defines the `CheckId` enum naming every check the validator can emit, in
//! pipeline order, and the immutable `CheckResult` value each check produces.
//!
//! ## Ordering Invariant
//!
//! `CheckId::all()` is the pipeline order. A `ValidationReport` only ever
//! contains a prefix-ordered subsequence of it: checks may be missing after a
//! fatal failure, but never reordered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ElpvError, FailureKind};

/// Outcome severity of a single check.
///
/// Ordered by severity so the worst status of a report is its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check passed.
    Success,
    /// The check found something worth attention that does not invalidate the package.
    Warning,
    /// The check failed.
    Error,
}

impl CheckStatus {
    /// Returns the lowercase identifier used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a single validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Severity of the outcome.
    pub status: CheckStatus,
    /// Human-readable explanation.
    pub message: String,
}

impl CheckResult {
    /// A passing result.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Success,
            message: message.into(),
        }
    }

    /// A warning result.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
        }
    }

    /// A failing result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            message: message.into(),
        }
    }

    /// Placeholder for a check that does not apply to the manifest variant.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::warning(format!("Skipped: {}", reason.into()))
    }

    /// Convert an engine error into the result it is reported as.
    pub fn from_error(error: &ElpvError) -> Self {
        Self {
            status: error.kind().status(),
            message: error.to_string(),
        }
    }

    /// Returns true if the status is [`CheckStatus::Success`].
    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }

    /// Returns true if the status is [`CheckStatus::Error`].
    pub fn is_error(&self) -> bool {
        self.status == CheckStatus::Error
    }
}

/// Every check the pipeline can emit, in pipeline order.
///
/// | # | Check | Applies to |
/// |---|-------|------------|
/// |  1 | Archive | zip entry points only |
/// |  2 | Manifest | all |
/// |  3 | ResourceFolders | all |
/// |  4 | WellFormed | all |
/// |  5 | RootElement | modern |
/// |  6 | NavStructures | modern |
/// |  7 | Pages | modern |
/// |  8 | Structure | modern |
/// |  9 | Metadata | all |
/// | 10 | Resources | modern |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// The container opened as a zip archive.
    Archive,
    /// A manifest entry was located and its variant classified.
    Manifest,
    /// The recommended `content/` and `custom/` resource folders exist.
    ResourceFolders,
    /// The manifest text was read and parsed as well-formed XML.
    WellFormed,
    /// The manifest root element is `<ode>`.
    RootElement,
    /// An `<odeNavStructures>` container exists.
    NavStructures,
    /// At least one page is declared.
    Pages,
    /// Pages, blocks, and components carry their required fields.
    Structure,
    /// Package properties and resources were extracted.
    Metadata,
    /// Every linked resource exists in the archive.
    Resources,
}

/// Total number of checks. Used for compile-time assertions.
pub const CHECK_COUNT: usize = 10;

impl CheckId {
    /// Returns all checks in pipeline order.
    pub fn all() -> &'static [CheckId] {
        &[
            Self::Archive,
            Self::Manifest,
            Self::ResourceFolders,
            Self::WellFormed,
            Self::RootElement,
            Self::NavStructures,
            Self::Pages,
            Self::Structure,
            Self::Metadata,
            Self::Resources,
        ]
    }

    /// Returns the snake_case identifier for this check.
    ///
    /// Matches the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Manifest => "manifest",
            Self::ResourceFolders => "resource_folders",
            Self::WellFormed => "well_formed",
            Self::RootElement => "root_element",
            Self::NavStructures => "nav_structures",
            Self::Pages => "pages",
            Self::Structure => "structure",
            Self::Metadata => "metadata",
            Self::Resources => "resources",
        }
    }

    /// Short human-readable label for checklist rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Archive => "Valid ZIP archive",
            Self::Manifest => "Manifest present",
            Self::ResourceFolders => "Resource folders",
            Self::WellFormed => "Well-formed XML",
            Self::RootElement => "Root element",
            Self::NavStructures => "Navigation structures",
            Self::Pages => "Pages",
            Self::Structure => "Structural integrity",
            Self::Metadata => "Package metadata",
            Self::Resources => "Linked resources",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = String;

    /// Parse a check from its snake_case identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown check id: {s:?}"))
    }
}

/// A check result tagged with the check that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCheck {
    /// Which check produced the result.
    pub id: CheckId,
    /// The outcome.
    #[serde(flatten)]
    pub result: CheckResult,
    /// Failure category, present whenever the status is not success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl NamedCheck {
    /// Tag a result with its check id and no failure category.
    pub fn new(id: CheckId, result: CheckResult) -> Self {
        Self {
            id,
            result,
            failure: None,
        }
    }

    /// Tag a result with its check id and failure category.
    pub fn failed(id: CheckId, result: CheckResult, failure: FailureKind) -> Self {
        Self {
            id,
            result,
            failure: Some(failure),
        }
    }

    /// Returns the status of the wrapped result.
    pub fn status(&self) -> CheckStatus {
        self.result.status
    }
}
