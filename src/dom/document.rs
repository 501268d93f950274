//! XML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and attribute values
//!
//! The document is fully owned and immutable once parsed, so it is `Send +
//! Sync` and can be shared read-only between projections.

use super::namespace::NamespaceResolver;
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode, DOCUMENT_NODE};
use super::strings::StringPool;
use crate::core::encoding;
use crate::core::tokenizer::{Token, Tokenizer};
use crate::core::attributes::Attribute;
use crate::error::{EadError, Result};
use memchr::memchr;

pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    attributes: Vec<XmlAttribute>,
    strings: StringPool,
    root_element: Option<NodeId>,
}

impl XmlDocument {
    /// Parse a complete document
    ///
    /// Any well-formedness violation is fatal: the error carries the byte
    /// offset (into the UTF-8 text) where parsing stopped.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let text = encoding::to_utf8(input)?;
        let bytes = text.as_bytes();

        let mut builder = Builder::new(bytes.len());
        let mut tokenizer = Tokenizer::new(bytes);
        while let Some((position, token)) = tokenizer.next_token()? {
            builder.accept(position, token)?;
        }
        let doc = builder.finish(bytes.len())?;

        tracing::debug!(
            nodes = doc.nodes.len(),
            attributes = doc.attributes.len(),
            string_bytes = doc.strings.bytes_used(),
            "parsed XML document"
        );
        Ok(doc)
    }

    pub fn root_element(&self) -> Option<NodeId> {
        self.root_element
    }

    pub fn node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(XmlNode::is_element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Local name of an element or target of a processing instruction
    pub fn local_name(&self, id: NodeId) -> &str {
        match self.node(id) {
            Some(n) if matches!(n.kind, NodeKind::Element | NodeKind::ProcessingInstruction) => {
                self.strings.get(n.data)
            }
            _ => "",
        }
    }

    /// Name as written in the source, prefix included
    pub fn qualified_name(&self, id: NodeId) -> &str {
        match self.node(id) {
            Some(n) if n.is_element() => self.strings.get(n.qname_id),
            _ => "",
        }
    }

    /// Namespace URI of an element, `None` when it has none
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        match self.node(id)?.namespace_id {
            0 => None,
            ns => Some(self.strings.get(ns)),
        }
    }

    fn attribute_slice(&self, id: NodeId) -> &[XmlAttribute] {
        match self.node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            None => &[],
        }
    }

    /// Attribute value by qualified name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attribute_slice(id)
            .iter()
            .find(|a| self.strings.get(a.name_id) == name)
            .map(|a| self.strings.get(a.value_id))
    }

    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            next: self.node(id).and_then(|n| n.first_child),
        }
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.is_element(c))
    }

    /// All descendants in document order, `id` itself excluded
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        self.push_children_reversed(id, &mut stack);
        DescendantIter { doc: self, stack }
    }

    fn push_children_reversed(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let mark = stack.len();
        stack.extend(self.children(id));
        stack[mark..].reverse();
    }

    /// XPath string-value: concatenated text and CDATA of all descendants
    pub fn string_value(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(n) if n.is_character_content() => self.strings.get(n.data).to_string(),
            Some(_) => {
                let mut out = String::new();
                for d in self.descendants(id) {
                    if let Some(n) = self.node(d) {
                        if n.is_character_content() {
                            out.push_str(self.strings.get(n.data));
                        }
                    }
                }
                out
            }
            None => String::new(),
        }
    }

    /// 1-based position among preceding element siblings with the same
    /// qualified name
    pub fn sibling_position(&self, id: NodeId) -> usize {
        let Some(node) = self.node(id) else {
            return 0;
        };
        let Some(parent) = node.parent else {
            return 1;
        };
        self.children(parent)
            .take_while(|&c| c != id)
            .filter(|&c| self.node(c).is_some_and(|n| n.is_element() && n.qname_id == node.qname_id))
            .count()
            + 1
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Pre-order iterator over descendants
pub struct DescendantIter<'d> {
    doc: &'d XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.doc.push_children_reversed(current, &mut self.stack);
        Some(current)
    }
}

/// Turns the token stream into the arena, checking nesting as it goes
struct Builder {
    doc: XmlDocument,
    /// Open elements, innermost last
    open: Vec<NodeId>,
    namespaces: NamespaceResolver,
}

impl Builder {
    fn new(input_len: usize) -> Self {
        let mut strings = StringPool::new();
        let namespaces = NamespaceResolver::new(&mut strings);
        let mut nodes = Vec::with_capacity((input_len / 32).max(16));
        nodes.push(XmlNode::document());
        Builder {
            doc: XmlDocument {
                nodes,
                attributes: Vec::with_capacity(128),
                strings,
                root_element: None,
            },
            open: Vec::with_capacity(32),
            namespaces,
        }
    }

    fn current_parent(&self) -> NodeId {
        self.open.last().copied().unwrap_or(DOCUMENT_NODE)
    }

    fn depth(&self) -> u16 {
        (self.open.len().min(u16::MAX as usize) as u16).saturating_add(1)
    }

    fn accept(&mut self, position: usize, token: Token<'_>) -> Result<()> {
        match token {
            Token::StartTag {
                name,
                attributes,
                empty,
            } => self.start_element(position, name, &attributes, empty),
            Token::EndTag { name } => self.end_element(position, name),
            Token::Text(content) => {
                let text = String::from_utf8_lossy(&content);
                if self.open.is_empty() {
                    if text.bytes().any(|b| !crate::core::scanner::is_whitespace(b)) {
                        return Err(EadError::parse("text outside the root element", position));
                    }
                    return Ok(());
                }
                self.append_character_data(NodeKind::Text, &text);
                Ok(())
            }
            Token::CData(content) => {
                if self.open.is_empty() {
                    return Err(EadError::parse("CDATA section outside the root element", position));
                }
                self.append_character_data(NodeKind::CData, &String::from_utf8_lossy(content));
                Ok(())
            }
            Token::Comment(content) => {
                self.append_character_data(NodeKind::Comment, &String::from_utf8_lossy(content));
                Ok(())
            }
            Token::ProcessingInstruction { target } => {
                let target_id = self.doc.strings.intern(&String::from_utf8_lossy(target));
                let node = XmlNode::processing_instruction(target_id, self.current_parent(), self.depth());
                self.push_node(node);
                Ok(())
            }
            Token::DocType => {
                if self.doc.root_element.is_some() {
                    return Err(EadError::parse("DOCTYPE after the root element", position));
                }
                Ok(())
            }
            Token::XmlDeclaration => Ok(()),
        }
    }

    fn start_element(
        &mut self,
        position: usize,
        name: &[u8],
        attributes: &[Attribute<'_>],
        empty: bool,
    ) -> Result<()> {
        if self.open.is_empty() && self.doc.root_element.is_some() {
            return Err(EadError::parse("content after the root element", position));
        }

        let qname = String::from_utf8_lossy(name);
        let (prefix, local) = match memchr(b':', qname.as_bytes()) {
            Some(colon) => (Some(&qname[..colon]), &qname[colon + 1..]),
            None => (None, &qname[..]),
        };

        self.namespaces.push_scope();
        for attr in attributes {
            if let Some(declared) = attr.namespace_declaration() {
                let prefix_id = match declared {
                    Some(p) => self.doc.strings.intern(&String::from_utf8_lossy(p)),
                    None => 0,
                };
                let uri_id = self.doc.strings.intern(&String::from_utf8_lossy(&attr.value));
                self.namespaces.declare(prefix_id, uri_id);
            }
        }

        let namespace_id = match prefix {
            Some(p) => {
                let prefix_id = self.doc.strings.intern(p);
                self.namespaces.resolve(prefix_id).ok_or_else(|| {
                    EadError::parse(format!("undeclared namespace prefix '{p}'"), position)
                })?
            }
            None => self.namespaces.resolve_default(),
        };

        let local_id = self.doc.strings.intern(local);
        let qname_id = self.doc.strings.intern(&qname);
        let mut node = XmlNode::element(local_id, qname_id, self.current_parent(), self.depth());
        node.namespace_id = namespace_id;
        node.attr_start = self.doc.attributes.len() as u32;
        node.attr_count = attributes.len().min(u16::MAX as usize) as u16;
        for attr in attributes.iter().take(node.attr_count as usize) {
            let name_id = self.doc.strings.intern(&String::from_utf8_lossy(attr.name));
            let value_id = self.doc.strings.intern(&String::from_utf8_lossy(&attr.value));
            self.doc.attributes.push(XmlAttribute { name_id, value_id });
        }

        let id = self.push_node(node);
        if self.open.is_empty() {
            self.doc.root_element = Some(id);
        }

        if empty {
            self.namespaces.pop_scope();
        } else {
            self.open.push(id);
        }
        Ok(())
    }

    fn end_element(&mut self, position: usize, name: &[u8]) -> Result<()> {
        let name = String::from_utf8_lossy(name);
        let Some(open) = self.open.pop() else {
            return Err(EadError::parse(format!("unexpected end tag </{name}>"), position));
        };
        let expected = self.doc.qualified_name(open);
        if expected != name {
            return Err(EadError::parse(
                format!("mismatched end tag: expected </{expected}>, found </{name}>"),
                position,
            ));
        }
        self.namespaces.pop_scope();
        Ok(())
    }

    fn append_character_data(&mut self, kind: NodeKind, text: &str) {
        if text.is_empty() {
            return;
        }
        let index = self.doc.strings.push(text);
        let node = XmlNode::character_data(kind, index, self.current_parent(), self.depth());
        self.push_node(node);
    }

    fn push_node(&mut self, node: XmlNode) -> NodeId {
        let parent = node.parent.unwrap_or(DOCUMENT_NODE);
        let id = self.doc.nodes.len() as NodeId;
        self.doc.nodes.push(node);

        match self.doc.nodes[parent as usize].last_child {
            Some(last) => self.doc.nodes[last as usize].next_sibling = Some(id),
            None => self.doc.nodes[parent as usize].first_child = Some(id),
        }
        self.doc.nodes[parent as usize].last_child = Some(id);
        id
    }

    fn finish(self, input_len: usize) -> Result<XmlDocument> {
        if let Some(&unclosed) = self.open.last() {
            return Err(EadError::parse(
                format!("unclosed tag <{}>", self.doc.qualified_name(unclosed)),
                input_len,
            ));
        }
        if self.doc.root_element.is_none() {
            return Err(EadError::parse("document has no root element", input_len));
        }
        Ok(self.doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAD_NS: &str = "urn:isbn:1-931666-22-9";

    #[test]
    fn test_parse_simple() {
        let doc = XmlDocument::parse(b"<ead>finding aid</ead>").unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(doc.local_name(root), "ead");
        assert_eq!(doc.string_value(root), "finding aid");
    }

    #[test]
    fn test_default_namespace() {
        let doc = XmlDocument::parse(
            format!("<ead xmlns=\"{EAD_NS}\"><archdesc level=\"collection\"/></ead>").as_bytes(),
        )
        .unwrap();
        let root = doc.root_element().unwrap();
        let archdesc = doc.child_elements(root).next().unwrap();
        assert_eq!(doc.namespace_uri(archdesc), Some(EAD_NS));
        assert_eq!(doc.attribute(archdesc, "level"), Some("collection"));
        assert_eq!(doc.attribute(archdesc, "id"), None);
    }

    #[test]
    fn test_prefixed_namespace() {
        let doc = XmlDocument::parse(
            format!("<ead:ead xmlns:ead=\"{EAD_NS}\"><ead:dsc/><dsc/></ead:ead>").as_bytes(),
        )
        .unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(doc.local_name(root), "ead");
        assert_eq!(doc.qualified_name(root), "ead:ead");
        let kids: Vec<_> = doc.child_elements(root).collect();
        assert_eq!(doc.namespace_uri(kids[0]), Some(EAD_NS));
        assert_eq!(doc.namespace_uri(kids[1]), None);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = XmlDocument::parse(b"<dsc><c01><did/></c01><c01/></dsc>").unwrap();
        let root = doc.root_element().unwrap();
        let names: Vec<_> = doc.descendants(root).map(|d| doc.local_name(d)).collect();
        assert_eq!(names, vec!["c01", "did", "c01"]);
    }

    #[test]
    fn test_string_value_spans_children() {
        let doc =
            XmlDocument::parse(b"<unittitle>Letters <emph>to</emph> <![CDATA[family]]></unittitle>").unwrap();
        assert_eq!(doc.string_value(doc.root_element().unwrap()), "Letters to family");
    }

    #[test]
    fn test_sibling_position() {
        let doc = XmlDocument::parse(b"<dsc><head/><c01/><c01/><c/></dsc>").unwrap();
        let root = doc.root_element().unwrap();
        let kids: Vec<_> = doc.child_elements(root).collect();
        assert_eq!(doc.sibling_position(kids[1]), 1);
        assert_eq!(doc.sibling_position(kids[2]), 2);
        assert_eq!(doc.sibling_position(kids[3]), 1);
    }

    #[test]
    fn test_prolog_and_comments() {
        let doc = XmlDocument::parse(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE ead>\n<!-- exported -->\n<ead/>\n",
        )
        .unwrap();
        assert_eq!(doc.local_name(doc.root_element().unwrap()), "ead");
    }

    #[test]
    fn test_mismatched_tag() {
        let err = XmlDocument::parse(b"<did><unittitle>x</did>").err().unwrap();
        assert_eq!(err.message(), "mismatched end tag: expected </unittitle>, found </did>");
        assert_eq!(err.position(), 17);
    }

    #[test]
    fn test_unclosed_tag() {
        let err = XmlDocument::parse(b"<ead><dsc>").err().unwrap();
        assert_eq!(err.message(), "unclosed tag <dsc>");
    }

    #[test]
    fn test_multiple_roots() {
        assert!(XmlDocument::parse(b"<ead/><ead/>").is_err());
    }

    #[test]
    fn test_text_outside_root() {
        assert!(XmlDocument::parse(b"<ead/>trailing").is_err());
    }

    #[test]
    fn test_empty_document() {
        let err = XmlDocument::parse(b"  ").err().unwrap();
        assert_eq!(err.message(), "document has no root element");
    }

    #[test]
    fn test_undeclared_prefix() {
        assert!(XmlDocument::parse(b"<ead:ead/>").is_err());
    }

    #[test]
    fn test_document_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<XmlDocument>();
    }
}
