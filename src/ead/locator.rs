//! Structural locators
//!
//! XPath-like paths such as `/ead/archdesc[1]/dsc[1]/c01[2]`. The root step
//! carries no position; every later step is indexed among same-named
//! element siblings.

use crate::dom::{NodeId, XmlDocument, DOCUMENT_NODE};

pub fn locate(xml: &XmlDocument, id: NodeId) -> String {
    let mut steps = Vec::new();
    let mut current = Some(id);
    while let Some(node) = current {
        if node == DOCUMENT_NODE || !xml.is_element(node) {
            break;
        }
        steps.push(node);
        current = xml.parent(node);
    }

    let mut out = String::with_capacity(steps.len() * 12);
    for &step in steps.iter().rev() {
        out.push('/');
        out.push_str(xml.qualified_name(step));
        if xml.parent(step) != Some(DOCUMENT_NODE) {
            out.push('[');
            out.push_str(&xml.sibling_position(step).to_string());
            out.push(']');
        }
    }
    out
}
