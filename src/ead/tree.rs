//! Component tree
//!
//! Walks the `dsc` hierarchy into nested [`DisplayNode`]s for an outline
//! widget. Only recognised component tags are descended into.

use super::container::{resolve_containers, ContainerSummary, ResolutionWarning};
use super::locator::locate;
use super::{EadDocument, MAX_COMPONENT_DEPTH};
use crate::dom::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub locator: String,
    pub children: Vec<DisplayNode>,
    pub containers: Vec<ContainerSummary>,
    /// Navigation link, filtered variant only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Top-level nodes plus the folder references skipped along the way
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    pub nodes: Vec<DisplayNode>,
    pub warnings: Vec<ResolutionWarning>,
}

/// `"{title} ({date})"`, degrading to whichever half is present
pub fn component_label(ead: &EadDocument, component: NodeId) -> String {
    let did = ead.child(component, "did");
    let title = ead.normalized_text(did.and_then(|d| ead.child(d, "unittitle")));
    let date = ead.normalized_text(did.and_then(|d| ead.child(d, "unitdate")));
    match (title.is_empty(), date.is_empty()) {
        (_, true) => title,
        (true, false) => format!("({date})"),
        (false, false) => format!("{title} ({date})"),
    }
}

pub fn build_tree(ead: &EadDocument) -> ComponentTree {
    let mut builder = TreeBuilder {
        ead,
        warnings: Vec::new(),
    };
    let nodes = ead
        .top_level_components()
        .into_iter()
        .map(|c| builder.build_node(c, 1))
        .collect();
    ComponentTree {
        nodes,
        warnings: builder.warnings,
    }
}

struct TreeBuilder<'d> {
    ead: &'d EadDocument,
    warnings: Vec<ResolutionWarning>,
}

impl TreeBuilder<'_> {
    fn build_node(&mut self, component: NodeId, depth: usize) -> DisplayNode {
        let ead = self.ead;
        let locator = locate(ead.xml(), component);
        tracing::trace!(%locator, "building component node");

        let children = ead
            .nested_components(component, depth)
            .into_iter()
            .map(|child| self.build_node(child, depth + 1))
            .collect();
        let containers = resolve_containers(ead, component, &mut self.warnings);

        DisplayNode {
            id: ead.attribute(component, "id").to_string(),
            text: component_label(ead, component),
            kind: ead.attribute(component, "level").to_string(),
            locator,
            children,
            containers,
            href: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NESTED: &[u8] = include_bytes!("../../fixtures/nested.xml");
    const PARENTED: &[u8] = include_bytes!("../../fixtures/parented.xml");

    fn label_of(xml: &[u8]) -> String {
        let ead = EadDocument::parse(xml).unwrap();
        component_label(&ead, ead.top_level_components()[0])
    }

    #[test]
    fn test_label_title_and_date() {
        assert_eq!(
            label_of(b"<ead><dsc><c01><did><unittitle>Series 1</unittitle><unitdate>1990-1992</unitdate></did></c01></dsc></ead>"),
            "Series 1 (1990-1992)"
        );
    }

    #[test]
    fn test_label_without_date() {
        assert_eq!(
            label_of(b"<ead><dsc><c01><did><unittitle> Series\n 1 </unittitle><unitdate/></did></c01></dsc></ead>"),
            "Series 1"
        );
    }

    #[test]
    fn test_label_date_only() {
        assert_eq!(
            label_of(b"<ead><dsc><c01><did><unitdate>1901</unitdate></did></c01></dsc></ead>"),
            "(1901)"
        );
    }

    #[test]
    fn test_label_empty() {
        assert_eq!(label_of(b"<ead><dsc><c01/></dsc></ead>"), "");
    }

    #[test]
    fn test_nested_tree_shape() {
        let ead = EadDocument::parse(NESTED).unwrap();
        let tree = build_tree(&ead);

        assert_eq!(tree.nodes.len(), 2);
        let series = &tree.nodes[0];
        assert_eq!(series.id, "ser1");
        assert_eq!(series.kind, "series");
        assert_eq!(series.text, "Correspondence (1890-1920)");
        assert_eq!(series.locator, "/ead/archdesc[1]/dsc[1]/c01[1]");

        let kinds: Vec<_> = series.children.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["subseries", "file"]);
        let subseries = &series.children[0];
        assert_eq!(subseries.children[0].locator, "/ead/archdesc[1]/dsc[1]/c01[1]/c02[1]/c03[1]");
        assert_eq!(subseries.children[0].containers[0].text, "Box 1, Folder 1");

        // Unrecognised component tags are not descended into
        let second = &tree.nodes[1];
        assert_eq!(second.kind, "otherlevel-ish");
        assert!(second.children.is_empty());
        assert!(second.containers.is_empty());
    }

    #[test]
    fn test_unnumbered_components() {
        let ead = EadDocument::parse(
            b"<ead><archdesc><dsc><c level=\"series\"><c level=\"file\"><c level=\"item\"/></c></c></dsc></archdesc></ead>",
        )
        .unwrap();
        let tree = build_tree(&ead);
        assert_eq!(tree.nodes[0].children[0].children[0].kind, "item");
    }

    #[test]
    fn test_warnings_collected() {
        let ead = EadDocument::parse(PARENTED).unwrap();
        let tree = build_tree(&ead);
        assert_eq!(tree.warnings.len(), 1);
        assert_eq!(tree.warnings[0].parent_id, "missing");
    }

    #[test]
    fn test_build_is_idempotent() {
        let ead = EadDocument::parse(PARENTED).unwrap();
        assert_eq!(build_tree(&ead).nodes, build_tree(&ead).nodes);
    }

    #[test]
    fn test_deep_nesting_is_capped() {
        fn depth_of(nodes: &[DisplayNode]) -> usize {
            let mut depth = 0;
            let mut level = nodes;
            while let Some(first) = level.first() {
                depth += 1;
                level = &first.children;
            }
            depth
        }

        let ead = EadDocument::parse(&crate::ead::tests::deeply_nested(3000)).unwrap();
        let tree = build_tree(&ead);
        assert_eq!(depth_of(&tree.nodes), MAX_COMPONENT_DEPTH);
        assert!(serde_json::to_string(&tree.nodes).is_ok());
    }

    #[test]
    fn test_json_shape() {
        let ead = EadDocument::parse(b"<ead><dsc><c01 id=\"a\" level=\"file\"/></dsc></ead>").unwrap();
        let json = serde_json::to_value(&build_tree(&ead).nodes).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "a",
                "text": "",
                "type": "file",
                "locator": "/ead/dsc[1]/c01[1]",
                "children": [],
                "containers": []
            }])
        );
    }
}
