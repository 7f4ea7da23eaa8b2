//! # Resource Resolution
//!
//! Finds every package-relative file reference in the manifest's component
//! payloads and checks that each one exists in the archive.
//!
//! ## Extraction
//!
//! - `htmlView` payloads are markup: `src`/`href` attribute values are
//!   scanned with a pattern.
//! - `jsonProperties` payloads are JSON: every string leaf is a candidate.
//!   Payloads that do not parse as JSON fall back to the markup scan.
//!
//! Only candidates pointing into the `content/` or `custom/` folders are kept.
//!
//! ## Resolution
//!
//! Paths are normalized (see [`normalize`]) and looked up exactly. The form
//! after a single decoding step is looked up as well, so a percent-encoded
//! reference still matches an entry whose name carries escapes. Each miss is
//! retried with the `encodeURI` spelling, since some packages store entries
//! with percent-encoded names.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use elpv_archive::Archive;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::Serialize;

use crate::document::ManifestDocument;

/// Component field holding rendered markup.
pub const MARKUP_TAG: &str = "htmlView";
/// Component field holding the component's JSON properties.
pub const STRUCTURED_TAG: &str = "jsonProperties";

/// Characters `encodeURI` leaves untouched besides ASCII alphanumerics.
const URI_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

fn attribute_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:src|href)=["']([^"']+)["']"#).expect("attribute regex must compile")
    })
}

fn resource_folder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(content|custom)/").expect("resource folder regex must compile")
    })
}

/// A resource reference as written in the manifest and as looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePath {
    /// Spelling found in the manifest. Used for reporting.
    pub raw: String,
    /// Result of [`normalize`] on `raw`. Used for lookup.
    pub normalized: String,
}

impl ResourcePath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// True when a candidate points into a package resource folder.
pub fn is_resource_reference(candidate: &str) -> bool {
    resource_folder_re().is_match(candidate)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Collect the resource references of every component payload.
///
/// Deduplicated by normalized form; the first raw spelling wins. Paths are
/// returned in document order of first appearance.
pub fn extract_resource_paths(doc: &ManifestDocument) -> Vec<ResourcePath> {
    let mut seen = BTreeSet::new();
    let mut paths = Vec::new();
    let mut keep = |candidate: String| {
        let path = ResourcePath::new(candidate);
        if seen.insert(path.normalized.clone()) {
            paths.push(path);
        }
    };

    for node in doc.elements_by_tag(MARKUP_TAG) {
        scan_markup(&doc.text_content(node), &mut keep);
    }

    for node in doc.elements_by_tag(STRUCTURED_TAG) {
        let text = doc.text_content(node);
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => walk_json(&value, &mut keep),
            Err(e) => {
                tracing::debug!(node = %node, error = %e, "jsonProperties is not JSON, scanning as markup");
                scan_markup(&text, &mut keep);
            }
        }
    }

    tracing::debug!(count = paths.len(), "extracted resource references");
    paths
}

fn scan_markup(text: &str, keep: &mut impl FnMut(String)) {
    for captures in attribute_ref_re().captures_iter(text) {
        if let Some(value) = captures.get(1) {
            if is_resource_reference(value.as_str()) {
                keep(value.as_str().to_string());
            }
        }
    }
}

fn walk_json(value: &serde_json::Value, keep: &mut impl FnMut(String)) {
    match value {
        serde_json::Value::String(s) if is_resource_reference(s) => keep(s.clone()),
        serde_json::Value::Array(items) => items.iter().for_each(|item| walk_json(item, keep)),
        serde_json::Value::Object(map) => map.values().for_each(|item| walk_json(item, keep)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Canonical lookup form of a package-relative path.
///
/// One step trims whitespace, percent-decodes once (left as is when the
/// decoded bytes are not UTF-8), strips one leading `./`, strips one leading
/// `/` and turns backslashes into slashes. Steps repeat until the path stops
/// changing, so the result never starts with `./` or `/`, contains no
/// backslash, and normalizing it again is a no-op.
pub fn normalize(path: &str) -> String {
    let mut current = path.to_string();
    loop {
        let next = normalize_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

// Every change either shortens the string or removes a backslash, so the
// loop in `normalize` terminates.
fn normalize_step(path: &str) -> String {
    let trimmed = path.trim();
    let decoded: Cow<'_, str> = percent_decode_str(trimmed)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(trimmed));
    let without_dot = decoded.strip_prefix("./").unwrap_or(&decoded);
    let without_slash = without_dot.strip_prefix('/').unwrap_or(without_dot);
    without_slash.replace('\\', "/")
}

/// The `encodeURI` spelling of a path.
pub fn encode_uri(path: &str) -> String {
    utf8_percent_encode(path, URI_RESERVED).to_string()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Raw spellings of the references with no matching archive entry, in input
/// order.
pub fn find_missing_resources<S, A>(paths: &[S], archive: &A) -> Vec<String>
where
    S: AsRef<str>,
    A: Archive + ?Sized,
{
    let mut missing = Vec::new();
    for path in paths {
        let raw: &str = path.as_ref();
        if !resolves(raw, archive) {
            missing.push(raw.to_string());
        }
    }
    missing
}

// The single-step form is tried too: a reference that is itself
// percent-encoded must still match the entry its one-time decoding names.
fn resolves<A: Archive + ?Sized>(raw: &str, archive: &A) -> bool {
    let normalized = normalize(raw);
    let decoded_once = normalize_step(raw);
    [normalized, decoded_once]
        .iter()
        .any(|candidate| archive.has_entry(candidate) || archive.has_entry(&encode_uri(candidate)))
}
