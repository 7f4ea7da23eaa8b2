//! # Package Metadata
//!
//! The canonical metadata shape produced by both the modern and the legacy
//! extractors, so consumers never need to know which manifest variant a
//! package used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key/value properties and resource declarations of a package.
///
/// Keys are unique within each map. Inserting an existing key overwrites the
/// previous value (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Descriptive properties (title, author, language, ...).
    pub properties: BTreeMap<String, String>,
    /// Resource declarations.
    pub resources: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any earlier value for the key.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Insert a resource declaration, replacing any earlier value for the key.
    pub fn set_resource(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.resources.insert(key.into(), value.into());
    }

    /// Look up a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Look up a resource value.
    pub fn resource(&self, key: &str) -> Option<&str> {
        self.resources.get(key).map(String::as_str)
    }

    /// Returns true if both maps are empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.resources.is_empty()
    }
}
