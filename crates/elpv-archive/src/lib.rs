//! # elpv-archive — Read-Only Package Archive
//!
//! The validator never reads zip bytes itself. This crate decodes a package
//! once, up front, into an in-memory entry index and exposes it through the
//! [`Archive`] trait. Everything downstream is pure computation over that
//! index.
//!
//! ## Components
//!
//! - [`Archive`] — the collaborator contract: enumerate entry names, test
//!   existence, read an entry as text.
//! - [`MemoryArchive`] — the in-memory implementation, built directly from
//!   entries (tests, embedders) or from a zip stream.
//! - [`open_zip`] / [`read_zip`] — decode a zip file or reader into a
//!   [`MemoryArchive`].
//!
//! ## Crate Policy
//!
//! - No writes. An archive is immutable for the duration of a validation run.
//! - Entry names are unique and case-sensitive; directory entries (names
//!   ending in `/`) are listed like any other entry.

pub mod error;
pub mod memory;
pub mod package;

use std::collections::BTreeSet;

pub use error::ArchiveError;
pub use memory::MemoryArchive;
pub use package::{open_zip, read_zip};

/// Read-only view over the entries of a package.
pub trait Archive {
    /// Returns true if an entry with exactly this name exists.
    fn has_entry(&self, name: &str) -> bool;

    /// All entry names.
    fn entry_names(&self) -> BTreeSet<String>;

    /// Read an entry and decode it as UTF-8 text.
    ///
    /// Fails when the entry is absent or its bytes are not valid UTF-8.
    fn read_entry_text(&self, name: &str) -> Result<String, ArchiveError>;
}
