//! # Engine Errors
//!
//! Typed failures of the two fallible engine operations. Both convert into
//! the workspace-wide [`ElpvError`] taxonomy.

use elpv_core::ElpvError;
use thiserror::Error;

/// The manifest text is not a well-formed XML document.
///
/// `Display` is the XML reader's diagnostic, unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Diagnostic reported by the reader.
    pub message: String,
    /// Byte offset in the manifest text where the problem was detected.
    pub position: u64,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: u64) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl From<ParseError> for ElpvError {
    fn from(e: ParseError) -> Self {
        ElpvError::MalformedDocument(e.message)
    }
}

/// Neither manifest entry exists in the archive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Neither {modern} nor {legacy} was found in the archive.")]
pub struct ManifestNotFound {
    /// Entry name probed for the modern manifest.
    pub modern: String,
    /// Entry name probed for the legacy manifest.
    pub legacy: String,
}

impl From<ManifestNotFound> for ElpvError {
    fn from(e: ManifestNotFound) -> Self {
        ElpvError::ManifestNotFound {
            modern: e.modern,
            legacy: e.legacy,
        }
    }
}
