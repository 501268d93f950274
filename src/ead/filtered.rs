//! Filtered container list
//!
//! Navigation-only variant of the component tree: series and subseries
//! survive, everything else is dropped with its subtree. Surviving nodes get
//! a prefixed id and a link into the rendered finding aid, and keep their
//! resolved containers.

use super::container::{resolve_containers, ResolutionWarning};
use super::locator::locate;
use super::tree::{component_label, DisplayNode};
use super::EadDocument;
use crate::dom::NodeId;
use crate::options::Options;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

const KEPT_LEVELS: [&str; 2] = ["series", "subseries"];

pub fn build_container_list(ead: &EadDocument, object_id: &str, options: &Options) -> Vec<DisplayNode> {
    let list = ContainerList {
        ead,
        options,
        object_path: format!(
            "{}/{}",
            options.link_base.trim_end_matches('/'),
            utf8_percent_encode(object_id, SEGMENT)
        ),
    };
    // Skipped references are reported by the component tree
    let mut warnings = Vec::new();
    ead.top_level_components()
        .into_iter()
        .filter_map(|c| list.filter_node(c, 1, &mut warnings))
        .collect()
}

struct ContainerList<'a> {
    ead: &'a EadDocument,
    options: &'a Options,
    object_path: String,
}

impl ContainerList<'_> {
    fn filter_node(
        &self,
        component: NodeId,
        depth: usize,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<DisplayNode> {
        let level = self.ead.attribute(component, "level");
        if !KEPT_LEVELS.contains(&level) {
            return None;
        }

        let anchor = self.ead.anchor_id(component, &self.options.class_prefix);
        let children = self
            .ead
            .nested_components(component, depth)
            .into_iter()
            .filter_map(|child| self.filter_node(child, depth + 1, warnings))
            .collect();
        let containers = resolve_containers(self.ead, component, warnings);

        Some(DisplayNode {
            id: format!("{}{}", self.options.id_prefix, anchor),
            text: component_label(self.ead, component),
            kind: level.to_string(),
            locator: locate(self.ead.xml(), component),
            children,
            containers,
            href: Some(format!("{}#{}", self.object_path, anchor)),
        })
    }
}
