//! # elpv-core — Foundational Types for the Package Validator
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One `CheckId` enum.** The set of checks and their pipeline order is
//!    defined once. Every `match` on `CheckId` is exhaustive, so adding a
//!    check forces every renderer to handle it.
//!
//! 2. **Immutable check values.** A `CheckResult` is a status plus a message.
//!    Checks never mutate each other; the report only appends.
//!
//! 3. **Absent, not fabricated.** When a fatal failure stops the pipeline the
//!    report simply ends. Later checks are never filled in as successes.
//!
//! 4. **A single failure taxonomy.** `FailureKind` names every way a package
//!    can fail validation and whether that failure halts the pipeline.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `elpv-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`.

pub mod check;
pub mod error;
pub mod metadata;
pub mod report;

// Re-export primary types for ergonomic imports.
pub use check::{CheckId, CheckResult, CheckStatus, NamedCheck, CHECK_COUNT};
pub use error::{ElpvError, FailureKind};
pub use metadata::PackageMetadata;
pub use report::{ManifestLocation, ManifestVariant, ValidationReport};
