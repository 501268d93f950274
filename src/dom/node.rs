//! XML node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into the node arena)
pub type NodeId = u32;

/// The document node always sits at index 0
pub const DOCUMENT_NODE: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
}

/// A node in the arena
///
/// `data` depends on the kind: interned local name for elements and
/// processing instructions, index into the text arena for text, CDATA
/// and comments, unused for the document node.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub data: u32,
    /// Interned qualified name (prefix included), elements only
    pub qname_id: u32,
    /// Interned namespace URI, 0 when the element has no namespace
    pub namespace_id: u32,
    /// First attribute in the attribute arena
    pub attr_start: u32,
    pub attr_count: u16,
    pub depth: u16,
}

impl XmlNode {
    fn new(kind: NodeKind, parent: Option<NodeId>, data: u32, depth: u16) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            data,
            qname_id: 0,
            namespace_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    pub fn document() -> Self {
        XmlNode::new(NodeKind::Document, None, 0, 0)
    }

    pub fn element(local_id: u32, qname_id: u32, parent: NodeId, depth: u16) -> Self {
        XmlNode {
            qname_id,
            ..XmlNode::new(NodeKind::Element, Some(parent), local_id, depth)
        }
    }

    /// Text, CDATA or comment node pointing into the text arena
    pub fn character_data(kind: NodeKind, text_index: u32, parent: NodeId, depth: u16) -> Self {
        XmlNode::new(kind, Some(parent), text_index, depth)
    }

    pub fn processing_instruction(target_id: u32, parent: NodeId, depth: u16) -> Self {
        XmlNode::new(NodeKind::ProcessingInstruction, Some(parent), target_id, depth)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text or CDATA, the kinds contributing to an element's string value
    #[inline]
    pub fn is_character_content(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }
}

/// Stored attribute, names and values interned
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute {
    pub name_id: u32,
    pub value_id: u32,
}
