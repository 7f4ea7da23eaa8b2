//! # Manifest Document — Parsing and Navigation
//!
//! Turns raw manifest text into an owned, arena-indexed element tree and
//! reports well-formedness failures with the XML reader's own diagnostic.
//!
//! ## Arena Layout
//!
//! Elements are stored in document (pre-)order as they are opened, so the
//! descendants of any element occupy the contiguous index range
//! `id + 1 .. subtree_end`. Tag lookups are slice scans, with no pointer
//! chasing and no recursion.
//!
//! Lookups match the element's qualified name exactly, the way DOM
//! `getElementsByTagName` does for XML documents.

use std::borrow::Cow;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;

/// Index of an element inside a [`ManifestDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the element in document order, starting at 0 for the root.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece of an element's content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Element(NodeId),
    Text(String),
}

/// A single element of the manifest tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    content: Vec<Content>,
    parent: Option<NodeId>,
    subtree_end: usize,
}

impl Element {
    /// Qualified tag name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of an attribute, matched by qualified name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// The enclosing element, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.content.iter().filter_map(|c| match c {
            Content::Element(id) => Some(*id),
            Content::Text(_) => None,
        })
    }

    /// Text (including CDATA) directly inside this element, excluding
    /// text nested in child elements.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                Content::Text(t) => Some(t.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }
}

/// A parsed manifest. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    nodes: Vec<Element>,
}

impl ManifestDocument {
    /// The document element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Access an element by id.
    ///
    /// # Panics
    ///
    /// If `id` was not produced by this document and is out of range. Use
    /// [`ManifestDocument::get`] for ids of unknown origin.
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Access an element by id, or `None` when the id is out of range.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    /// Tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.element(id).name()
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a parsed document has a root element.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every element with the given tag, root included, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.scan(0..self.nodes.len(), tag)
    }

    /// Every descendant of `id` with the given tag, in document order.
    /// The element itself is not included.
    pub fn descendants_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        let end = self.nodes[id.0].subtree_end;
        self.scan(id.0 + 1..end, tag)
    }

    /// The first descendant of `id` with the given tag.
    pub fn first_descendant_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants_by_tag(id, tag).next()
    }

    /// Returns true if any descendant of `id` has the given tag.
    pub fn has_descendant(&self, id: NodeId, tag: &str) -> bool {
        self.first_descendant_by_tag(id, tag).is_some()
    }

    /// Concatenated text of the element and all its descendants, in
    /// document order (DOM `textContent`).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for content in &self.nodes[id.0].content {
            match content {
                Content::Text(t) => out.push_str(t),
                Content::Element(child) => self.collect_text(*child, out),
            }
        }
    }

    fn scan<'a>(
        &'a self,
        range: std::ops::Range<usize>,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes[range.clone()]
            .iter()
            .zip(range)
            .filter(move |(node, _)| node.name == tag)
            .map(|(_, index)| NodeId(index))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse manifest text into a document tree.
///
/// Fails when the text is not well-formed XML: mismatched or unclosed tags,
/// no root element, several root elements, text outside the root, or
/// malformed attributes and entity references. The error carries the
/// reader's diagnostic verbatim.
pub fn parse_manifest(text: &str) -> Result<ManifestDocument, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut builder = TreeBuilder::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::new(e.to_string(), reader.error_position()))?;
        let position = reader.buffer_position();

        match event {
            Event::Start(start) => builder.open(&start, position)?,
            Event::Empty(start) => {
                builder.open(&start, position)?;
                builder.close();
            }
            Event::End(_) => builder.close(),
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::new(e.to_string(), position))?;
                builder.text(text, position)?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| ParseError::new(e.to_string(), position))?;
                builder.text(Cow::Borrowed(text), position)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DOCTYPE
            // carry nothing the validator reads.
            _ => {}
        }
    }

    builder.finish(reader.buffer_position())
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Element>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn open(&mut self, start: &BytesStart<'_>, position: u64) -> Result<(), ParseError> {
        let parent = self.open.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(ParseError::new(
                "junk after document element: a second root element was found",
                position,
            ));
        }

        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| ParseError::new(e.to_string(), position))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::new(e.to_string(), position))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::new(e.to_string(), position))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::new(e.to_string(), position))?
                .into_owned();
            attributes.push((key, value));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            name,
            attributes,
            content: Vec::new(),
            parent,
            subtree_end: id.0 + 1,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].content.push(Content::Element(id));
        }
        self.open.push(id);
        Ok(())
    }

    fn close(&mut self) {
        // The reader verifies end-tag names, so an End event always matches
        // the innermost open element.
        if let Some(id) = self.open.pop() {
            self.nodes[id.0].subtree_end = self.nodes.len();
        }
    }

    fn text(&mut self, text: Cow<'_, str>, position: u64) -> Result<(), ParseError> {
        match self.open.last() {
            Some(id) => {
                self.nodes[id.0].content.push(Content::Text(text.into_owned()));
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseError::new(
                "text content is not allowed outside the document element",
                position,
            )),
        }
    }

    fn finish(self, position: u64) -> Result<ManifestDocument, ParseError> {
        if let Some(id) = self.open.last() {
            return Err(ParseError::new(
                format!(
                    "unexpected end of document: element <{}> is not closed",
                    self.nodes[id.0].name
                ),
                position,
            ));
        }
        if self.nodes.is_empty() {
            return Err(ParseError::new(
                "no root element: the document is empty",
                position,
            ));
        }
        Ok(ManifestDocument { nodes: self.nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- generated -->
<ode version="3.0">
    <odeNavStructures>
        <odeNavStructure>
            <pageName>Start &amp; intro</pageName>
            <htmlView><![CDATA[<p><img src="content/a.png"></p>]]></htmlView>
        </odeNavStructure>
        <odeNavStructure><pageName>Second</pageName></odeNavStructure>
    </odeNavStructures>
    <empty/>
</ode>"#;

    #[test]
    fn parses_well_formed_document() {
        let doc = parse_manifest(SAMPLE).unwrap();
        assert_eq!(doc.tag_name(doc.root()), "ode");
        assert_eq!(doc.element(doc.root()).attribute("version"), Some("3.0"));
        assert_eq!(doc.elements_by_tag("odeNavStructure").count(), 2);
        assert_eq!(doc.elements_by_tag("empty").count(), 1);
    }

    #[test]
    fn elements_by_tag_includes_root() {
        let doc = parse_manifest(SAMPLE).unwrap();
        assert_eq!(doc.elements_by_tag("ode").collect::<Vec<_>>(), vec![doc.root()]);
        assert_eq!(doc.descendants_by_tag(doc.root(), "ode").count(), 0);
    }

    #[test]
    fn descendants_are_scoped_to_subtree() {
        let doc = parse_manifest(SAMPLE).unwrap();
        let pages: Vec<_> = doc.elements_by_tag("odeNavStructure").collect();
        assert!(doc.has_descendant(pages[0], "htmlView"));
        assert!(!doc.has_descendant(pages[1], "htmlView"));
        let name = doc.first_descendant_by_tag(pages[1], "pageName").unwrap();
        assert_eq!(doc.text_content(name), "Second");
    }

    #[test]
    fn text_is_unescaped_and_cdata_kept_verbatim() {
        let doc = parse_manifest(SAMPLE).unwrap();
        let first = doc.elements_by_tag("pageName").next().unwrap();
        assert_eq!(doc.text_content(first), "Start & intro");
        let html = doc.elements_by_tag("htmlView").next().unwrap();
        assert_eq!(doc.text_content(html), r#"<p><img src="content/a.png"></p>"#);
    }

    #[test]
    fn text_content_follows_document_order() {
        let doc = parse_manifest("<a>one<b>two</b>three</a>").unwrap();
        assert_eq!(doc.text_content(doc.root()), "onetwothree");
        assert_eq!(doc.element(doc.root()).text(), "onethree");
    }

    #[test]
    fn parent_and_children_links() {
        let doc = parse_manifest("<a><b/><c><d/></c></a>").unwrap();
        let children: Vec<_> = doc
            .element(doc.root())
            .children()
            .map(|id| doc.tag_name(id).to_string())
            .collect();
        assert_eq!(children, vec!["b", "c"]);
        let d = doc.elements_by_tag("d").next().unwrap();
        let c = doc.element(d).parent().unwrap();
        assert_eq!(doc.tag_name(c), "c");
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn mismatched_tag_is_malformed() {
        let err = parse_manifest("<ode><unclosed></ode>").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn unclosed_root_is_malformed() {
        assert!(parse_manifest("<ode><page>").is_err());
    }

    #[test]
    fn empty_text_is_malformed() {
        let err = parse_manifest("   ").unwrap_err();
        assert!(err.message.contains("no root element"));
    }

    #[test]
    fn second_root_is_malformed() {
        assert!(parse_manifest("<a/><b/>").is_err());
    }

    #[test]
    fn text_outside_root_is_malformed() {
        assert!(parse_manifest("<a/>trailing").is_err());
    }

    #[test]
    fn duplicate_attribute_is_malformed() {
        assert!(parse_manifest(r#"<a x="1" x="2"/>"#).is_err());
    }

    #[test]
    fn unknown_entity_is_malformed() {
        assert!(parse_manifest("<a>&nope;</a>").is_err());
    }

    #[test]
    fn namespaced_names_are_matched_verbatim() {
        let doc = parse_manifest(r#"<instance xmlns="http://www.exelearning.org/content/v0.3"><dictionary/></instance>"#).unwrap();
        assert_eq!(doc.tag_name(doc.root()), "instance");
        assert_eq!(doc.elements_by_tag("dictionary").count(), 1);
    }

    #[test]
    fn foreign_id_is_rejected_by_get() {
        let big = parse_manifest("<a><b/><c/></a>").unwrap();
        let small = parse_manifest("<a/>").unwrap();
        let last = big.elements_by_tag("c").next().unwrap();
        assert_eq!(big.get(last).map(Element::name), Some("c"));
        assert!(small.get(last).is_none());
        assert_eq!(small.get(small.root()).map(Element::name), Some("a"));
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_text_never_panics(text in "\\PC{0,64}") {
                let _ = parse_manifest(&text);
            }

            #[test]
            fn nested_chain_preserves_every_element(names in prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..8)) {
                let open: String = names.iter().map(|n| format!("<{n}>")).collect();
                let close: String = names.iter().rev().map(|n| format!("</{n}>")).collect();
                let doc = parse_manifest(&format!("{open}{close}")).unwrap();
                prop_assert_eq!(doc.len(), names.len());
                prop_assert_eq!(doc.tag_name(doc.root()), names[0].as_str());
            }
        }
    }
}
