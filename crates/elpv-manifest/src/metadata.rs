//! # Metadata Extraction
//!
//! Produces one canonical [`PackageMetadata`] shape from either manifest
//! variant.
//!
//! ## Modern (`content.xml`)
//!
//! Every `<odeProperty>` and `<odeResource>` holds a `<key>` and an optional
//! `<value>`. Entries without a key are skipped, a missing value is the empty
//! string, and later duplicates overwrite earlier ones.
//!
//! ## Legacy (`contentv3.xml`)
//!
//! eXeLearning 2 serialized its package object graph as nested
//! `<instance>`/`<dictionary>` elements. Dictionary entries are a key element
//! (`role="key"`) followed by the value element. Extraction happens in two
//! steps: [`extract_legacy_metadata`] reads raw fields, then
//! [`normalize_legacy_metadata`] renames them onto the modern property keys.

use std::collections::{BTreeMap, BTreeSet};

use elpv_core::PackageMetadata;
use serde::{Deserialize, Serialize};

use crate::document::{ManifestDocument, NodeId};

/// Tag of a modern property declaration.
pub const PROPERTY_TAG: &str = "odeProperty";
/// Tag of a modern resource declaration.
pub const RESOURCE_TAG: &str = "odeResource";

// ---------------------------------------------------------------------------
// Modern
// ---------------------------------------------------------------------------

/// Extract properties and resource declarations from a modern manifest.
pub fn extract_metadata(doc: &ManifestDocument) -> PackageMetadata {
    let mut metadata = PackageMetadata::new();

    for node in doc.elements_by_tag(PROPERTY_TAG) {
        if let Some((key, value)) = key_value(doc, node) {
            metadata.set_property(key, value);
        }
    }
    for node in doc.elements_by_tag(RESOURCE_TAG) {
        if let Some((key, value)) = key_value(doc, node) {
            metadata.set_resource(key, value);
        }
    }

    tracing::debug!(
        properties = metadata.properties.len(),
        resources = metadata.resources.len(),
        "extracted modern metadata"
    );
    metadata
}

fn key_value(doc: &ManifestDocument, node: NodeId) -> Option<(String, String)> {
    let key_node = doc.first_descendant_by_tag(node, "key")?;
    let key = doc.text_content(key_node).trim().to_string();
    if key.is_empty() {
        return None;
    }
    let value = doc
        .first_descendant_by_tag(node, "value")
        .map(|v| doc.text_content(v).trim().to_string())
        .unwrap_or_default();
    Some((key, value))
}

// ---------------------------------------------------------------------------
// Legacy
// ---------------------------------------------------------------------------

/// Raw fields read from a legacy manifest, before renaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMetadata {
    /// Scalar fields of the top-level package dictionary (`_title`, `_author`, ...).
    pub package: BTreeMap<String, String>,
    /// Scalar fields of the package's Dublin Core instance.
    pub dublin_core: BTreeMap<String, String>,
    /// Storage names of every resource instance in the graph.
    pub resources: BTreeSet<String>,
}

const SCALAR_TAGS: &[&str] = &["unicode", "string", "int", "long", "float", "bool"];

/// Legacy package fields with a modern property counterpart.
pub const LEGACY_PROPERTY_MAP: &[(&str, &str)] = &[
    ("_title", "pp_title"),
    ("_author", "pp_author"),
    ("_description", "pp_description"),
    ("_lang", "pp_lang"),
    ("_objectives", "pp_objectives"),
    ("_preknowledge", "pp_preknowledge"),
    ("_learningResourceType", "pp_learningResourceType"),
    ("_intendedEndUserRole", "pp_intendedEndUserRole"),
    ("_contextPlace", "pp_contextPlace"),
    ("_contextMode", "pp_contextMode"),
    ("footer", "footer"),
    ("license", "license"),
];

/// Read raw fields from a legacy manifest.
///
/// Unexpected shapes yield empty maps rather than errors: the legacy format
/// is only read for metadata, never validated.
pub fn extract_legacy_metadata(doc: &ManifestDocument) -> LegacyMetadata {
    let mut raw = LegacyMetadata::default();

    if let Some(dictionary) = child_by_tag(doc, doc.root(), "dictionary") {
        for (key, value) in dictionary_entries(doc, dictionary) {
            let element = doc.element(value);
            if element.name() == "instance"
                && element
                    .attribute("class")
                    .is_some_and(|class| class.ends_with("DublinCore"))
            {
                raw.dublin_core.extend(scalar_fields(doc, value));
            } else if let Some(text) = scalar_value(doc, value) {
                raw.package.insert(key, text);
            }
        }
    }

    for instance in doc.elements_by_tag("instance") {
        let is_resource = doc
            .element(instance)
            .attribute("class")
            .is_some_and(|class| class.ends_with("Resource"));
        if !is_resource {
            continue;
        }
        if let Some(name) = scalar_fields(doc, instance).remove("_storageName") {
            if !name.is_empty() {
                raw.resources.insert(name);
            }
        }
    }

    tracing::debug!(
        fields = raw.package.len(),
        dublin_core = raw.dublin_core.len(),
        resources = raw.resources.len(),
        "extracted legacy metadata"
    );
    raw
}

/// Rename raw legacy fields onto the modern metadata shape.
///
/// - Known package fields map through [`LEGACY_PROPERTY_MAP`].
/// - Other package fields keep their name minus one leading underscore.
/// - Dublin Core fields become `dc_<field>`.
/// - Resources map `<storage name>` to itself: eXeLearning 2 stored them at
///   the archive root, next to `contentv3.xml`.
pub fn normalize_legacy_metadata(raw: &LegacyMetadata) -> PackageMetadata {
    let mut metadata = PackageMetadata::new();

    for (key, value) in &raw.package {
        let modern = LEGACY_PROPERTY_MAP
            .iter()
            .find(|(legacy, _)| legacy == key)
            .map(|(_, modern)| (*modern).to_string())
            .unwrap_or_else(|| key.strip_prefix('_').unwrap_or(key).to_string());
        if !modern.is_empty() {
            metadata.set_property(modern, value.clone());
        }
    }

    for (key, value) in &raw.dublin_core {
        let field = key.strip_prefix('_').unwrap_or(key);
        if !field.is_empty() {
            metadata.set_property(format!("dc_{field}"), value.clone());
        }
    }

    for name in &raw.resources {
        metadata.set_resource(name.clone(), name.clone());
    }

    metadata
}

fn child_by_tag(doc: &ManifestDocument, node: NodeId, tag: &str) -> Option<NodeId> {
    doc.element(node).children().find(|c| doc.tag_name(*c) == tag)
}

/// Pair each `role="key"` element of a dictionary with the element after it.
fn dictionary_entries(doc: &ManifestDocument, dictionary: NodeId) -> Vec<(String, NodeId)> {
    let children: Vec<NodeId> = doc.element(dictionary).children().collect();
    let mut entries = Vec::new();
    let mut i = 0;
    while i < children.len() {
        let element = doc.element(children[i]);
        match (element.attribute("role"), children.get(i + 1)) {
            (Some("key"), Some(value)) => {
                let key = element
                    .attribute("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| doc.text_content(children[i]));
                entries.push((key, *value));
                i += 2;
            }
            _ => i += 1,
        }
    }
    entries
}

/// Scalar entries of an instance's own dictionary.
fn scalar_fields(doc: &ManifestDocument, instance: NodeId) -> BTreeMap<String, String> {
    child_by_tag(doc, instance, "dictionary")
        .map(|dictionary| {
            dictionary_entries(doc, dictionary)
                .into_iter()
                .filter_map(|(key, value)| scalar_value(doc, value).map(|text| (key, text)))
                .collect()
        })
        .unwrap_or_default()
}

fn scalar_value(doc: &ManifestDocument, node: NodeId) -> Option<String> {
    let element = doc.element(node);
    let name = element.name();
    if name == "none" {
        return Some(String::new());
    }
    if !SCALAR_TAGS.contains(&name) {
        return None;
    }
    Some(
        element
            .attribute("value")
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(node))
            .trim()
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_manifest;

    #[test]
    fn modern_properties_and_resources() {
        let doc = parse_manifest(
            r#"<ode>
                <odeProperties>
                    <odeProperty><key>pp_title</key><value> My course </value></odeProperty>
                    <odeProperty><key>pp_lang</key><value>es</value></odeProperty>
                </odeProperties>
                <odeResources>
                    <odeResource><key>odeVersionId</key><value>v1</value></odeResource>
                </odeResources>
            </ode>"#,
        )
        .unwrap();
        let meta = extract_metadata(&doc);
        assert_eq!(meta.property("pp_title"), Some("My course"));
        assert_eq!(meta.property("pp_lang"), Some("es"));
        assert_eq!(meta.resource("odeVersionId"), Some("v1"));
    }

    #[test]
    fn modern_missing_value_is_empty_and_missing_key_skipped() {
        let doc = parse_manifest(
            r#"<ode>
                <odeProperty><key>pp_author</key></odeProperty>
                <odeProperty><value>orphan</value></odeProperty>
                <odeProperty><key>   </key><value>blank</value></odeProperty>
            </ode>"#,
        )
        .unwrap();
        let meta = extract_metadata(&doc);
        assert_eq!(meta.property("pp_author"), Some(""));
        assert_eq!(meta.properties.len(), 1);
    }

    #[test]
    fn modern_duplicate_key_last_write_wins() {
        let doc = parse_manifest(
            r#"<ode>
                <odeProperty><key>pp_title</key><value>First</value></odeProperty>
                <odeProperty><key>pp_title</key><value>Second</value></odeProperty>
            </ode>"#,
        )
        .unwrap();
        assert_eq!(extract_metadata(&doc).property("pp_title"), Some("Second"));
    }

    #[test]
    fn modern_document_without_declarations_is_empty() {
        let doc = parse_manifest("<ode/>").unwrap();
        assert!(extract_metadata(&doc).is_empty());
    }

    const LEGACY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<instance xmlns="http://www.exelearning.org/content/v0.3" class="exe.engine.package.Package" reference="1">
<dictionary>
<string role="key" value="_title"/>
<unicode value="Legacy course"/>
<string role="key" value="_author"/>
<unicode value="Ada"/>
<string role="key" value="_lang"/>
<string value="en"/>
<string role="key" value="_backgroundImg"/>
<none/>
<string role="key" value="_nextNodeId"/>
<int value="12"/>
<string role="key" value="footer"/>
<unicode content="true">Footer text</unicode>
<string role="key" value="dublinCore"/>
<instance class="exe.engine.package.DublinCore" reference="2">
<dictionary>
<string role="key" value="title"/>
<unicode value="DC title"/>
<string role="key" value="rights"/>
<unicode value="CC-BY"/>
</dictionary>
</instance>
<string role="key" value="resources"/>
<dictionary>
<string role="key" value="abc"/>
<list>
<instance class="exe.engine.resource.Resource" reference="3">
<dictionary>
<string role="key" value="_storageName"/>
<string value="photo.jpg"/>
<string role="key" value="checksum"/>
<string value="abc"/>
</dictionary>
</instance>
</list>
</dictionary>
<string role="key" value="root"/>
<reference key="4"/>
</dictionary>
</instance>"#;

    #[test]
    fn legacy_raw_fields() {
        let doc = parse_manifest(LEGACY).unwrap();
        let raw = extract_legacy_metadata(&doc);
        assert_eq!(raw.package.get("_title").map(String::as_str), Some("Legacy course"));
        assert_eq!(raw.package.get("_lang").map(String::as_str), Some("en"));
        assert_eq!(raw.package.get("_backgroundImg").map(String::as_str), Some(""));
        assert_eq!(raw.package.get("_nextNodeId").map(String::as_str), Some("12"));
        assert_eq!(raw.package.get("footer").map(String::as_str), Some("Footer text"));
        assert!(!raw.package.contains_key("root"));
        assert!(!raw.package.contains_key("dublinCore"));
        assert_eq!(raw.dublin_core.get("rights").map(String::as_str), Some("CC-BY"));
        assert!(raw.resources.contains("photo.jpg"));
    }

    #[test]
    fn legacy_normalization_maps_onto_modern_keys() {
        let doc = parse_manifest(LEGACY).unwrap();
        let meta = normalize_legacy_metadata(&extract_legacy_metadata(&doc));
        assert_eq!(meta.property("pp_title"), Some("Legacy course"));
        assert_eq!(meta.property("pp_author"), Some("Ada"));
        assert_eq!(meta.property("pp_lang"), Some("en"));
        assert_eq!(meta.property("footer"), Some("Footer text"));
        assert_eq!(meta.property("nextNodeId"), Some("12"));
        assert_eq!(meta.property("dc_title"), Some("DC title"));
        assert_eq!(meta.resource("photo.jpg"), Some("photo.jpg"));
    }

    #[test]
    fn legacy_unexpected_shape_yields_empty_metadata() {
        let doc = parse_manifest("<ode><odeProperty><key>k</key></odeProperty></ode>").unwrap();
        let raw = extract_legacy_metadata(&doc);
        assert_eq!(raw, LegacyMetadata::default());
        assert!(normalize_legacy_metadata(&raw).is_empty());
    }

    #[test]
    fn legacy_trailing_key_without_value_is_ignored() {
        let doc = parse_manifest(
            r#"<instance><dictionary><string role="key" value="_title"/></dictionary></instance>"#,
        )
        .unwrap();
        assert!(extract_legacy_metadata(&doc).package.is_empty());
    }
}
