//! # Error Types — Failure Taxonomy
//!
//! Defines the ways a package can fail validation. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Fatal failures (archive, manifest, document, required element) stop the
//!   pipeline. Every later check is absent from the report.
//! - Non-fatal failures are recorded and the pipeline continues.
//! - Every failure maps to exactly one check result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::check::CheckStatus;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The container itself cannot be opened.
    MalformedArchive,
    /// Neither the modern nor the legacy manifest entry exists.
    ManifestNotFound,
    /// The manifest text could not be read or is not well-formed XML.
    MalformedDocument,
    /// The root tag is wrong or the navigation container is absent.
    MissingRequiredElement,
    /// One or more pages, blocks, or components lack required fields.
    StructuralFieldMissing,
    /// Linked resources are absent from the archive.
    ResourceMissing,
    /// The manifest declares no pages.
    EmptyProject,
}

impl FailureKind {
    /// Whether this failure stops the pipeline.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::MalformedArchive
            | Self::ManifestNotFound
            | Self::MalformedDocument
            | Self::MissingRequiredElement => true,
            Self::StructuralFieldMissing | Self::ResourceMissing | Self::EmptyProject => false,
        }
    }

    /// The check status this failure is reported with.
    pub fn status(&self) -> CheckStatus {
        match self {
            Self::ResourceMissing | Self::EmptyProject => CheckStatus::Warning,
            Self::MalformedArchive
            | Self::ManifestNotFound
            | Self::MalformedDocument
            | Self::MissingRequiredElement
            | Self::StructuralFieldMissing => CheckStatus::Error,
        }
    }

    /// Returns the snake_case identifier for this failure.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedArchive => "malformed_archive",
            Self::ManifestNotFound => "manifest_not_found",
            Self::MalformedDocument => "malformed_document",
            Self::MissingRequiredElement => "missing_required_element",
            Self::StructuralFieldMissing => "structural_field_missing",
            Self::ResourceMissing => "resource_missing",
            Self::EmptyProject => "empty_project",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for the package validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElpvError {
    /// The container could not be opened as a zip archive.
    #[error("The file is not a valid ZIP archive or is corrupted: {0}")]
    MalformedArchive(String),

    /// No manifest entry exists under either supported name.
    #[error("Neither {modern} nor {legacy} was found in the archive.")]
    ManifestNotFound {
        /// Entry name of the modern manifest.
        modern: String,
        /// Entry name of the legacy manifest.
        legacy: String,
    },

    /// The manifest failed to parse; carries the parser diagnostic verbatim.
    #[error("{0}")]
    MalformedDocument(String),

    /// A mandatory element is missing or wrong.
    #[error("{0}")]
    MissingRequiredElement(String),

    /// Aggregated per-node structural issues.
    #[error("{0}")]
    StructuralFieldMissing(String),

    /// Resources referenced by the manifest are absent.
    #[error("The following resources could not be found: {}", .0.join(", "))]
    ResourceMissing(Vec<String>),

    /// The manifest declares no pages.
    #[error("No <odeNavStructure> entries were found. The project appears to be empty.")]
    EmptyProject,
}

impl ElpvError {
    /// The taxonomy category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedArchive(_) => FailureKind::MalformedArchive,
            Self::ManifestNotFound { .. } => FailureKind::ManifestNotFound,
            Self::MalformedDocument(_) => FailureKind::MalformedDocument,
            Self::MissingRequiredElement(_) => FailureKind::MissingRequiredElement,
            Self::StructuralFieldMissing(_) => FailureKind::StructuralFieldMissing,
            Self::ResourceMissing(_) => FailureKind::ResourceMissing,
            Self::EmptyProject => FailureKind::EmptyProject,
        }
    }

    /// Whether this error stops the pipeline.
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}
