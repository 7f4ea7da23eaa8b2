//! # elpv-cli — Command-Line Front End
//!
//! Provides the `elpv` binary on top of the validation engine.
//!
//! ## Subcommands
//!
//! - `elpv validate` — full pipeline report for one or more packages.
//! - `elpv metadata` — package metadata as JSON.
//! - `elpv resources` — linked resources and whether they resolve.
//!
//! ```bash
//! elpv validate course.elp --format json
//! elpv -vv resources course.elp --missing-only
//! ```
//!
//! Reports go to stdout; logs go to stderr so JSON output stays
//! machine-readable.

pub mod config;
pub mod metadata;
pub mod output;
pub mod resources;
pub mod validate;
