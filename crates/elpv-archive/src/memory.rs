//! # In-Memory Archive
//!
//! Entry index backed by a `BTreeMap` of names to raw bytes.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ArchiveError;
use crate::Archive;

const UTF8_BOM: char = '\u{feff}';

/// A package whose entries are fully materialized in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    /// Create an archive with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an archive from `(name, content)` pairs. Later duplicates win.
    pub fn from_entries<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<Vec<u8>>,
    {
        let mut archive = Self::new();
        for (name, content) in entries {
            archive.insert(name, content);
        }
        archive
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), content.into());
    }

    /// Raw bytes of an entry.
    pub fn entry_bytes(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entry names in lexicographic order without cloning.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Archive for MemoryArchive {
    fn has_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn entry_names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    fn read_entry_text(&self, name: &str) -> Result<String, ArchiveError> {
        let bytes = self
            .entries
            .get(name)
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))?;
        let text = std::str::from_utf8(bytes).map_err(|e| ArchiveError::NotText {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
    }
}
