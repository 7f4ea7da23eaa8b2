//! # Manifest Classification
//!
//! Picks the archive entry that holds the manifest and the schema variant
//! that applies to it. The modern entry always wins when both exist.

use elpv_archive::Archive;
use elpv_core::{ManifestLocation, ManifestVariant};

use crate::error::ManifestNotFound;

/// Entry name of the modern manifest.
pub const MODERN_MANIFEST: &str = "content.xml";

/// Entry name of the legacy eXeLearning 2 manifest.
pub const LEGACY_MANIFEST: &str = "contentv3.xml";

/// Locate and classify the manifest of a package.
pub fn classify_manifest<A: Archive + ?Sized>(
    archive: &A,
) -> Result<ManifestLocation, ManifestNotFound> {
    let candidates = [
        (MODERN_MANIFEST, ManifestVariant::Modern),
        (LEGACY_MANIFEST, ManifestVariant::Legacy),
    ];

    candidates
        .into_iter()
        .find(|(name, _)| archive.has_entry(name))
        .map(|(name, variant)| ManifestLocation {
            entry_name: name.to_string(),
            variant,
        })
        .ok_or_else(|| ManifestNotFound {
            modern: MODERN_MANIFEST.to_string(),
            legacy: LEGACY_MANIFEST.to_string(),
        })
}
