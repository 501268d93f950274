//! Namespace resolution
//!
//! Stack-based resolver used while the DOM is built. Prefix ID 0 stands for
//! the default namespace; URI ID 0 means "no namespace" (`xmlns=""`).

use super::strings::StringPool;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, Copy)]
struct NsBinding {
    prefix_id: u32,
    uri_id: u32,
    depth: u16,
}

#[derive(Debug)]
pub struct NamespaceResolver {
    bindings: Vec<NsBinding>,
    depth: u16,
}

impl NamespaceResolver {
    /// New resolver with the `xml` prefix pre-bound
    pub fn new(strings: &mut StringPool) -> Self {
        let xml_prefix = strings.intern("xml");
        let xml_uri = strings.intern(XML_NAMESPACE);
        NamespaceResolver {
            bindings: vec![NsBinding {
                prefix_id: xml_prefix,
                uri_id: xml_uri,
                depth: 0,
            }],
            depth: 0,
        }
    }

    /// Enter an element scope; declarations that follow belong to it
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, dropping its declarations
    pub fn pop_scope(&mut self) {
        while self.bindings.last().is_some_and(|b| b.depth >= self.depth && b.depth > 0) {
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn declare(&mut self, prefix_id: u32, uri_id: u32) {
        self.bindings.push(NsBinding {
            prefix_id,
            uri_id,
            depth: self.depth,
        });
    }

    /// URI bound to `prefix_id`; `None` when the prefix was never declared
    pub fn resolve(&self, prefix_id: u32) -> Option<u32> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix_id == prefix_id)
            .map(|b| b.uri_id)
    }

    /// Default namespace in scope, 0 when there is none
    pub fn resolve_default(&self) -> u32 {
        self.resolve(0).unwrap_or(0)
    }
}
