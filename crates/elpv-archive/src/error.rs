//! # Archive Errors

use thiserror::Error;

/// Error opening a package or reading one of its entries.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The container is not a readable zip archive.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// No entry exists under the requested name.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// The entry exists but its content is not valid UTF-8 text.
    #[error("entry '{name}' is not valid UTF-8 text: {reason}")]
    NotText {
        /// Entry name.
        name: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// IO error reading the package file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
