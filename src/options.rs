//! Projection options supplied by the host as JSON

use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Prepended to ids in the filtered container list
    pub id_prefix: String,
    /// Base path for container-list links
    pub link_base: String,
    /// Prefix for HTML classes and generated ids
    pub class_prefix: String,
    /// Render component fieldsets collapsed
    pub collapsed: bool,
    /// Emit `titleproper` as an `<h2>` above the collection
    pub include_document_title: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            id_prefix: "container_list_".to_string(),
            link_base: "islandora/object".to_string(),
            class_prefix: "ead".to_string(),
            collapsed: true,
            include_document_title: true,
        }
    }
}

impl Options {
    /// Decode options; blank input yields the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Options::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
