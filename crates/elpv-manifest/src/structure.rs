//! # Structural Validation (modern manifests)
//!
//! Four checks, run in this order by the pipeline:
//!
//! 1. [`check_root_element`]: the root is `<ode>` (case-insensitive). Fatal.
//! 2. [`check_nav_structures`]: an `<odeNavStructures>` container exists. Fatal.
//! 3. [`check_page_presence`]: at least one page; zero pages is a warning.
//! 4. [`validate_structural_integrity`]: pages, blocks, and components carry
//!    their required fields. Issues are aggregated into one message.
//!
//! Required fields are looked up anywhere below the node, not only among
//! direct children.

use elpv_core::CheckResult;

use crate::document::{ManifestDocument, NodeId};

/// Expected tag of the document element.
pub const ROOT_TAG: &str = "ode";
/// Container of all pages.
pub const NAV_CONTAINER_TAG: &str = "odeNavStructures";
/// A page.
pub const PAGE_TAG: &str = "odeNavStructure";
/// A block of components inside a page.
pub const BLOCK_TAG: &str = "odePagStructure";
/// A component (iDevice) inside a block.
pub const COMPONENT_TAG: &str = "odeComponent";

/// A required field: satisfied when any of its tags is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRequirement(&'static [&'static str]);

impl FieldRequirement {
    /// A single required tag.
    pub const fn tag(tag: &'static [&'static str; 1]) -> Self {
        Self(tag)
    }

    /// A group of alternative tags.
    pub const fn any_of(tags: &'static [&'static str]) -> Self {
        Self(tags)
    }

    /// The accepted tags.
    pub fn tags(&self) -> &'static [&'static str] {
        self.0
    }

    fn is_satisfied(&self, doc: &ManifestDocument, node: NodeId) -> bool {
        self.0.iter().any(|tag| doc.has_descendant(node, tag))
    }

    /// Rendering used in issue messages: alternatives joined by ` / `.
    pub fn describe(&self) -> String {
        self.0.join(" / ")
    }
}

/// Fields every page must carry.
pub const REQUIRED_PAGE_FIELDS: &[FieldRequirement] = &[
    FieldRequirement::tag(&["odePageId"]),
    FieldRequirement::tag(&["pageName"]),
    FieldRequirement::any_of(&["odeNavStructureSyncOrder", "odeNavStructureOrder"]),
];

/// Fields every block must carry.
pub const REQUIRED_BLOCK_FIELDS: &[FieldRequirement] = &[
    FieldRequirement::tag(&["odeBlockId"]),
    FieldRequirement::tag(&["blockName"]),
];

/// Fields every component must carry.
pub const REQUIRED_COMPONENT_FIELDS: &[FieldRequirement] = &[
    FieldRequirement::tag(&["odeIdeviceId"]),
    FieldRequirement::tag(&["odeIdeviceTypeName"]),
    FieldRequirement::tag(&["htmlView"]),
    FieldRequirement::tag(&["jsonProperties"]),
];

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Verify the document element is `<ode>`, ignoring case.
pub fn check_root_element(doc: &ManifestDocument) -> CheckResult {
    let tag = doc.tag_name(doc.root());
    if tag.is_empty() {
        return CheckResult::error("The XML root element is missing a tag name.");
    }
    if !tag.eq_ignore_ascii_case(ROOT_TAG) {
        return CheckResult::error(format!(
            "Expected the root element to be <{ROOT_TAG}>, found <{tag}> instead."
        ));
    }
    CheckResult::success(format!("The root element is <{ROOT_TAG}>."))
}

/// Verify at least one navigation container exists anywhere in the tree.
pub fn check_nav_structures(doc: &ManifestDocument) -> CheckResult {
    if doc.elements_by_tag(NAV_CONTAINER_TAG).next().is_none() {
        return CheckResult::error(format!(
            "The <{NAV_CONTAINER_TAG}> element is missing."
        ));
    }
    CheckResult::success("Navigation structures found.")
}

/// Count pages. Zero pages is a warning, not an error.
pub fn check_page_presence(doc: &ManifestDocument) -> CheckResult {
    match doc.elements_by_tag(PAGE_TAG).count() {
        0 => CheckResult::warning(format!(
            "No <{PAGE_TAG}> entries were found. The project appears to be empty."
        )),
        1 => CheckResult::success("Found 1 page."),
        n => CheckResult::success(format!("Found {n} pages.")),
    }
}

/// Walk page → block → component and report every missing required field.
///
/// Indices are 1-based and follow document order within their parent. All
/// issues are joined with a single space into one error message.
pub fn validate_structural_integrity(doc: &ManifestDocument) -> CheckResult {
    let issues = structural_issues(doc);
    if issues.is_empty() {
        return CheckResult::success("The internal XML structure matches the expected layout.");
    }
    CheckResult::error(issues.join(" "))
}

/// The individual issue clauses, in document order.
pub fn structural_issues(doc: &ManifestDocument) -> Vec<String> {
    let mut issues = Vec::new();

    for (page_index, page) in doc.elements_by_tag(PAGE_TAG).enumerate() {
        let page_no = page_index + 1;
        let missing = missing_fields(doc, page, REQUIRED_PAGE_FIELDS);
        if !missing.is_empty() {
            issues.push(format!(
                "Navigation structure #{page_no} is missing fields: {}",
                missing.join(", ")
            ));
        }

        for (block_index, block) in doc.descendants_by_tag(page, BLOCK_TAG).enumerate() {
            let block_no = block_index + 1;
            let missing = missing_fields(doc, block, REQUIRED_BLOCK_FIELDS);
            if !missing.is_empty() {
                issues.push(format!(
                    "Block #{block_no} in page #{page_no} is missing fields: {}",
                    missing.join(", ")
                ));
            }

            for (component_index, component) in
                doc.descendants_by_tag(block, COMPONENT_TAG).enumerate()
            {
                let missing = missing_fields(doc, component, REQUIRED_COMPONENT_FIELDS);
                if !missing.is_empty() {
                    issues.push(format!(
                        "Component #{} in block #{block_no} of page #{page_no} is missing fields: {}",
                        component_index + 1,
                        missing.join(", ")
                    ));
                }
            }
        }
    }

    issues
}

fn missing_fields(
    doc: &ManifestDocument,
    node: NodeId,
    requirements: &[FieldRequirement],
) -> Vec<String> {
    requirements
        .iter()
        .filter(|req| !req.is_satisfied(doc, node))
        .map(FieldRequirement::describe)
        .collect()
}
