//! Container resolution
//!
//! A component's `did/container` elements come in two exclusive idioms:
//!
//! - parented: folders name their box through `parent`, the box living
//!   anywhere in the document
//! - flat: boxes and folders listed side by side, each box opening a group
//!
//! Parented resolution runs first; flat grouping only happens when it
//! produced nothing for the component.

use super::locator::locate;
use super::{starts_with_ignore_case, EadDocument};
use crate::dom::NodeId;
use indexmap::IndexMap;
use serde::Serialize;

/// One `container` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub value: String,
    pub locator: String,
}

/// Entry as seen through the type-keyed mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRef {
    pub id: String,
    pub value: String,
    pub locator: String,
}

/// A resolved group, e.g. `Box 1, Folder 2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub text: String,
    /// Keyed by container type; a repeated type keeps the later entry
    pub entries: IndexMap<String, EntryRef>,
    /// Every entry in document order
    pub containers: Vec<ContainerEntry>,
}

impl ContainerSummary {
    fn from_entries(containers: Vec<ContainerEntry>) -> Self {
        let text = containers
            .iter()
            .map(ContainerEntry::fragment)
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let entries = containers
            .iter()
            .map(|c| {
                let entry = EntryRef {
                    id: c.id.clone(),
                    value: c.value.clone(),
                    locator: c.locator.clone(),
                };
                (c.kind.clone(), entry)
            })
            .collect();
        ContainerSummary {
            text,
            entries,
            containers,
        }
    }
}

impl ContainerEntry {
    fn read(ead: &EadDocument, id: NodeId) -> Self {
        ContainerEntry {
            kind: ead.attribute(id, "type").to_string(),
            id: ead.attribute(id, "id").to_string(),
            value: ead.normalized_text(Some(id)),
            locator: locate(ead.xml(), id),
        }
    }

    /// `"{type} {value}"`, either half omitted when empty
    fn fragment(&self) -> String {
        match (self.kind.is_empty(), self.value.is_empty()) {
            (false, false) => format!("{} {}", self.kind, self.value),
            (false, true) => self.kind.clone(),
            (true, _) => self.value.clone(),
        }
    }
}

/// A folder reference that could not be tied to exactly one box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionWarning {
    pub folder_locator: String,
    pub parent_id: String,
    /// Containers found with that id: 0 (dangling) or more than 1 (ambiguous)
    pub matches: usize,
}

/// Result of the parented pass
#[derive(Debug)]
pub enum Parented {
    Resolved(Vec<ContainerSummary>),
    /// Nothing resolved, either no references or all of them skipped
    Unresolved,
}

fn did_containers(ead: &EadDocument, component: NodeId) -> Vec<NodeId> {
    match ead.child(component, "did") {
        Some(did) => ead.children_named(did, "container").collect(),
        None => Vec::new(),
    }
}

pub fn resolve_parented(
    ead: &EadDocument,
    component: NodeId,
    warnings: &mut Vec<ResolutionWarning>,
) -> Parented {
    let mut summaries = Vec::new();
    for folder in did_containers(ead, component) {
        let Some(parent_id) = ead.xml().attribute(folder, "parent") else {
            continue;
        };
        if !starts_with_ignore_case(ead.attribute(folder, "type"), "folder") {
            continue;
        }

        match ead.containers_with_id(parent_id) {
            [parent] => {
                summaries.push(ContainerSummary::from_entries(vec![
                    ContainerEntry::read(ead, *parent),
                    ContainerEntry::read(ead, folder),
                ]));
            }
            matches => {
                let warning = ResolutionWarning {
                    folder_locator: locate(ead.xml(), folder),
                    parent_id: parent_id.to_string(),
                    matches: matches.len(),
                };
                tracing::debug!(
                    locator = %warning.folder_locator,
                    parent_id = %warning.parent_id,
                    matches = warning.matches,
                    "skipping folder reference without a unique parent"
                );
                warnings.push(warning);
            }
        }
    }

    if summaries.is_empty() {
        Parented::Unresolved
    } else {
        Parented::Resolved(summaries)
    }
}

/// Group the component's containers into runs opened by each box
///
/// Containers ahead of the first box form a group of their own; with no box
/// at all everything lands in a single group.
pub fn resolve_flat(ead: &EadDocument, component: NodeId) -> Vec<ContainerSummary> {
    let mut groups: Vec<Vec<ContainerEntry>> = Vec::new();

    for container in did_containers(ead, component) {
        let entry = ContainerEntry::read(ead, container);
        if groups.is_empty() || starts_with_ignore_case(&entry.kind, "box") {
            groups.push(Vec::new());
        }
        if let Some(open) = groups.last_mut() {
            open.push(entry);
        }
    }

    groups.into_iter().map(ContainerSummary::from_entries).collect()
}

/// Container summaries for one component
pub fn resolve_containers(
    ead: &EadDocument,
    component: NodeId,
    warnings: &mut Vec<ResolutionWarning>,
) -> Vec<ContainerSummary> {
    match resolve_parented(ead, component, warnings) {
        Parented::Resolved(summaries) => summaries,
        Parented::Unresolved => resolve_flat(ead, component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_component(ead: &EadDocument) -> NodeId {
        ead.top_level_components()[0]
    }

    fn resolve(xml: &[u8]) -> (Vec<ContainerSummary>, Vec<ResolutionWarning>) {
        let ead = EadDocument::parse(xml).unwrap();
        let mut warnings = Vec::new();
        let summaries = resolve_containers(&ead, first_component(&ead), &mut warnings);
        (summaries, warnings)
    }

    fn texts(summaries: &[ContainerSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_parented_single_match() {
        let (summaries, warnings) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container id=\"B1\" type=\"Box\">1</container>\
              <container parent=\"B1\" type=\"Folder\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Box 1, Folder 2"]);
        assert!(warnings.is_empty());

        let summary = &summaries[0];
        assert_eq!(summary.entries.keys().collect::<Vec<_>>(), vec!["Box", "Folder"]);
        assert_eq!(
            summary.entries["Box"],
            EntryRef {
                id: "B1".into(),
                value: "1".into(),
                locator: "/ead/archdesc[1]/dsc[1]/c01[1]/did[1]/container[1]".into(),
            }
        );
    }

    #[test]
    fn test_parented_box_elsewhere_in_document() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container parent=\"B7\" type=\"folder\">3</container>\
              </did></c01><c01><did><container id=\"B7\" type=\"Box\">7</container></did></c01>\
              </dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Box 7, folder 3"]);
    }

    #[test]
    fn test_duplicate_parent_id_is_skipped() {
        let (summaries, warnings) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container id=\"B1\" type=\"Box\">1</container>\
              <container id=\"B1\" type=\"Box\">1a</container>\
              <container parent=\"B1\" type=\"Folder\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(
            warnings,
            vec![ResolutionWarning {
                folder_locator: "/ead/archdesc[1]/dsc[1]/c01[1]/did[1]/container[3]".into(),
                parent_id: "B1".into(),
                matches: 2,
            }]
        );
        // Nothing resolved, so the flat idiom takes over
        assert_eq!(texts(&summaries), vec!["Box 1", "Box 1a, Folder 2"]);
    }

    #[test]
    fn test_dangling_parent_id() {
        let ead = EadDocument::parse(
            b"<ead><archdesc><dsc><c01><did>\
              <container parent=\"nope\" type=\"Folder\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        )
        .unwrap();
        let mut warnings = Vec::new();
        let outcome = resolve_parented(&ead, first_component(&ead), &mut warnings);
        assert!(matches!(outcome, Parented::Unresolved));
        assert_eq!(warnings[0].matches, 0);
    }

    #[test]
    fn test_parent_attribute_on_non_folder_ignored() {
        let (summaries, warnings) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container id=\"B1\" type=\"Box\">1</container>\
              <container parent=\"B1\" type=\"Item\">4</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert!(warnings.is_empty());
        assert_eq!(texts(&summaries), vec!["Box 1, Item 4"]);
    }

    #[test]
    fn test_flat_grouping() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container type=\"Box\">1</container>\
              <container type=\"Folder\">1</container>\
              <container type=\"Folder\">2</container>\
              <container type=\"box\">2</container>\
              <container type=\"Folder\">3</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Box 1, Folder 1, Folder 2", "box 2, Folder 3"]);
        assert_eq!(summaries[0].containers.len(), 3);
        assert_eq!(summaries[1].containers.len(), 2);
        // Mapping keeps the later folder of the first group
        assert_eq!(summaries[0].entries["Folder"].value, "2");
    }

    #[test]
    fn test_flat_leading_non_box_stands_alone() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container type=\"Folder\">9</container>\
              <container type=\"Box\">1</container>\
              <container type=\"Box\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Folder 9", "Box 1", "Box 2"]);
    }

    #[test]
    fn test_flat_leading_run_then_box() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container type=\"Reel\">3</container>\
              <container type=\"Folder\">9</container>\
              <container type=\"Box\">1</container>\
              <container type=\"Folder\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Reel 3, Folder 9", "Box 1, Folder 2"]);
    }

    #[test]
    fn test_flat_without_box() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container type=\"Folder\">1</container>\
              <container type=\"Folder\">2</container>\
              </did></c01></dsc></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Folder 1, Folder 2"]);
    }

    #[test]
    fn test_parented_suppresses_flat() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did>\
              <container parent=\"B1\" type=\"Folder\">2</container>\
              <container type=\"Box\">99</container>\
              </did></c01></dsc><container id=\"B1\" type=\"Box\">1</container></archdesc></ead>",
        );
        assert_eq!(texts(&summaries), vec!["Box 1, Folder 2"]);
    }

    #[test]
    fn test_no_containers() {
        let (summaries, warnings) = resolve(b"<ead><archdesc><dsc><c01><did/></c01></dsc></archdesc></ead>");
        assert!(summaries.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_summary_serializes_with_type_key() {
        let (summaries, _) = resolve(
            b"<ead><archdesc><dsc><c01><did><container type=\"Box\" id=\"x\">1</container></did></c01></dsc></archdesc></ead>",
        );
        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(json["containers"][0]["type"], "Box");
        assert_eq!(json["entries"]["Box"]["id"], "x");
    }
}
