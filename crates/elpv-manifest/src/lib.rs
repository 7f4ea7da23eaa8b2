//! # elpv-manifest — eXeLearning Package Validation Engine
//!
//! Everything that reasons about a package's manifest: finding it, parsing
//! it, checking its structure, reading its metadata and resolving the
//! resources it links to. The [`pipeline`] module strings these into one
//! ordered [`ValidationReport`](elpv_core::ValidationReport).
//!
//! ## Modules
//!
//! - [`classify`]: picks `content.xml` (modern) or `contentv3.xml` (legacy).
//! - [`document`]: arena-backed XML tree built on `quick-xml`.
//! - [`structure`]: root, navigation, page and deep structural checks.
//! - [`metadata`]: property and resource declarations, both variants.
//! - [`resources`]: reference extraction, path normalization, lookup.
//! - [`pipeline`]: the short-circuiting validation run.
//!
//! ## Crate Policy
//!
//! - Pure computation over an [`Archive`](elpv_archive::Archive); no I/O
//!   besides the zip entry points in [`pipeline`].
//! - No global mutable state. Compiled patterns live in `OnceLock` statics.

pub mod classify;
pub mod document;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod resources;
pub mod structure;

pub use classify::{classify_manifest, LEGACY_MANIFEST, MODERN_MANIFEST};
pub use document::{parse_manifest, Element, ManifestDocument, NodeId};
pub use error::{ManifestNotFound, ParseError};
pub use metadata::{
    extract_legacy_metadata, extract_metadata, normalize_legacy_metadata, LegacyMetadata,
};
pub use pipeline::{
    load_manifest, package_metadata, validate_archive, validate_zip_bytes, validate_zip_file,
    ValidationOptions,
};
pub use resources::{extract_resource_paths, find_missing_resources, normalize, ResourcePath};
pub use structure::{
    check_nav_structures, check_page_presence, check_root_element, validate_structural_integrity,
};
