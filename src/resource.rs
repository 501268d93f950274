//! ResourceArc Wrappers
//!
//! A parsed finding aid kept alive on the Rust side between NIF calls.

use crate::ead::EadDocument;
use rustler::ResourceArc;

/// Parsed document plus container index, read-only after `parse`
///
/// Projections only ever borrow the document immutably, so concurrent NIF
/// calls share it without locking.
pub struct DocumentResource {
    pub doc: EadDocument,
}

impl DocumentResource {
    pub fn new(doc: EadDocument) -> Self {
        DocumentResource { doc }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
