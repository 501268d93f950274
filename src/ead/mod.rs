//! EAD Module - Finding-aid queries over the DOM
//!
//! Wraps a parsed [`XmlDocument`] with the EAD-specific lookups the
//! projections share:
//! - namespace-tolerant element matching
//! - component recognition (`c`, `c01`..`c12`)
//! - a document-wide index of `container` elements by `id`

pub mod container;
pub mod filtered;
pub mod locator;
pub mod tree;

pub use container::{resolve_containers, ContainerEntry, ContainerSummary, ResolutionWarning};
pub use filtered::build_container_list;
pub use tree::{build_tree, component_label, DisplayNode};

use crate::dom::{NodeId, XmlDocument};
use crate::error::Result;
use std::collections::HashMap;

pub const EAD_NAMESPACE: &str = "urn:isbn:1-931666-22-9";

/// Deepest component nesting the projections descend into
///
/// EAD numbers components down to `c12`; unnumbered `<c>` can nest without
/// limit, and every projection recurses once per level.
pub const MAX_COMPONENT_DEPTH: usize = 64;

/// A parsed finding aid, immutable after construction
pub struct EadDocument {
    xml: XmlDocument,
    /// `container/@id` -> every container carrying it, document order
    containers_by_id: HashMap<String, Vec<NodeId>>,
}

impl EadDocument {
    pub fn parse(input: &[u8]) -> Result<Self> {
        Ok(Self::from_xml(XmlDocument::parse(input)?))
    }

    pub fn from_xml(xml: XmlDocument) -> Self {
        let mut containers_by_id: HashMap<String, Vec<NodeId>> = HashMap::new();
        if let Some(root) = xml.root_element() {
            for id in xml.descendants(root) {
                if !is_ead_element(&xml, id, "container") {
                    continue;
                }
                if let Some(value) = xml.attribute(id, "id") {
                    containers_by_id.entry(value.to_string()).or_default().push(id);
                }
            }
        }
        tracing::debug!(indexed_ids = containers_by_id.len(), "built container id index");
        EadDocument {
            xml,
            containers_by_id,
        }
    }

    pub fn xml(&self) -> &XmlDocument {
        &self.xml
    }

    /// Containers whose `id` attribute equals `id`
    pub fn containers_with_id(&self, id: &str) -> &[NodeId] {
        self.containers_by_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_named(&self, id: NodeId, local: &str) -> bool {
        is_ead_element(&self.xml, id, local)
    }

    /// EAD child elements with the given local name
    pub fn children_named<'a>(&'a self, id: NodeId, local: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.xml
            .child_elements(id)
            .filter(move |&c| is_ead_element(&self.xml, c, local))
    }

    pub fn child(&self, id: NodeId, local: &str) -> Option<NodeId> {
        self.children_named(id, local).next()
    }

    /// Follow a chain of first-matching children, e.g. `["did", "unittitle"]`
    pub fn path(&self, id: NodeId, steps: &[&str]) -> Option<NodeId> {
        steps.iter().try_fold(id, |current, step| self.child(current, step))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> &str {
        self.xml.attribute(id, name).unwrap_or("")
    }

    /// Whitespace-collapsed string value, empty for `None`
    pub fn normalized_text(&self, id: Option<NodeId>) -> String {
        match id {
            Some(id) => normalize_space(&self.xml.string_value(id)),
            None => String::new(),
        }
    }

    pub fn is_component(&self, id: NodeId) -> bool {
        self.xml.is_element(id) && is_ead_namespace(&self.xml, id) && is_component_name(self.xml.local_name(id))
    }

    /// Immediate child components in document order
    pub fn component_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.xml.child_elements(id).filter(move |&c| self.is_component(c))
    }

    /// Child components of a component nested `depth` levels deep (top
    /// level is 1), none once [`MAX_COMPONENT_DEPTH`] is reached
    pub fn nested_components(&self, id: NodeId, depth: usize) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.component_children(id).collect();
        if depth >= MAX_COMPONENT_DEPTH && !children.is_empty() {
            tracing::debug!(
                locator = %locator::locate(&self.xml, id),
                depth,
                skipped = children.len(),
                "component nesting too deep, not descending"
            );
            return Vec::new();
        }
        children
    }

    /// `dsc/c` and `dsc/c01` children of every `dsc`, in document order
    pub fn top_level_components(&self) -> Vec<NodeId> {
        let Some(root) = self.xml.root_element() else {
            return Vec::new();
        };
        let mut components: Vec<NodeId> = self
            .xml
            .descendants(root)
            .filter(|&d| self.is_named(d, "dsc"))
            .flat_map(|dsc| {
                self.xml
                    .child_elements(dsc)
                    .filter(|&c| self.is_named(c, "c") || self.is_named(c, "c01"))
            })
            .collect();
        // Arena ids follow document order
        components.sort_unstable();
        components.dedup();
        components
    }

    /// The element's own `id`, else `{prefix}-{local name}-{arena index}`
    ///
    /// Arena indices are fixed at parse time, so generated anchors repeat
    /// across renders of the same document.
    pub fn anchor_id(&self, id: NodeId, prefix: &str) -> String {
        match self.xml.attribute(id, "id") {
            Some(own) if !own.is_empty() => own.to_string(),
            _ => format!("{prefix}-{}-{id}", self.xml.local_name(id)),
        }
    }

    pub fn archdesc(&self) -> Option<NodeId> {
        let root = self.xml.root_element()?;
        self.child(root, "archdesc")
    }

    /// `eadheader/filedesc/titlestmt/titleproper`, normalized
    pub fn document_title(&self) -> String {
        let title = self
            .xml
            .root_element()
            .and_then(|root| self.path(root, &["eadheader", "filedesc", "titlestmt", "titleproper"]));
        self.normalized_text(title)
    }
}

fn is_ead_namespace(xml: &XmlDocument, id: NodeId) -> bool {
    matches!(xml.namespace_uri(id), None | Some(EAD_NAMESPACE))
}

fn is_ead_element(xml: &XmlDocument, id: NodeId, local: &str) -> bool {
    xml.is_element(id) && xml.local_name(id) == local && is_ead_namespace(xml, id)
}

/// `c` or `c01` through `c12`
pub fn is_component_name(name: &str) -> bool {
    match name.as_bytes() {
        b"c" => true,
        [b'c', b'0', b'1'..=b'9'] => true,
        [b'c', b'1', b'0'..=b'2'] => true,
        _ => false,
    }
}

/// XPath `normalize-space`: trim and collapse runs of XML whitespace
pub fn normalize_space(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split([' ', '\t', '\n', '\r']).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// ASCII case-insensitive prefix test
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}
