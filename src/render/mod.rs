//! HTML Renderer - read-only finding-aid display
//!
//! Re-walks the DOM independently of the component tree, driven by the
//! tables in [`rules`]. Container lists go through the same resolver as the
//! tree so both projections group and skip identically.

pub mod html;
pub mod rules;

use crate::dom::NodeId;
use crate::ead::{component_label, resolve_containers, EadDocument, MAX_COMPONENT_DEPTH};
use crate::options::Options;
use html::HtmlWriter;
use rules::{section_rule, SectionBody, SectionRule, DID_FIELDS, DSC_LABEL, INDEX_TERMS};

/// Open `dsc` and component fieldsets: one `dsc` plus the component cap
const MAX_NESTING: usize = MAX_COMPONENT_DEPTH + 1;

/// Render the collection description as one HTML fragment
pub fn render_html(ead: &EadDocument, options: &Options) -> String {
    let mut renderer = Renderer {
        ead,
        options,
        out: HtmlWriter::with_capacity(ead.xml().node_count() * 24),
        nesting: 0,
    };
    renderer.render_document();
    renderer.out.finish()
}

struct Renderer<'a> {
    ead: &'a EadDocument,
    options: &'a Options,
    out: HtmlWriter,
    nesting: usize,
}

impl Renderer<'_> {
    fn class(&self, parts: &[&str]) -> String {
        let mut class = self.options.class_prefix.clone();
        for part in parts.iter().filter(|p| !p.is_empty()) {
            class.push('-');
            class.push_str(part);
        }
        class
    }

    fn render_document(&mut self) {
        let root_class = self.class(&[]);
        self.out.open("div", &[("class", &root_class)]);
        self.out.newline();

        if self.options.include_document_title {
            let title = self.ead.document_title();
            if !title.is_empty() {
                let class = self.class(&["title"]);
                self.out.element("h2", &[("class", &class)], &title);
                self.out.newline();
            }
        }

        if let Some(archdesc) = self.ead.archdesc() {
            let xml = self.ead.xml();
            let level = self.ead.attribute(archdesc, "level");
            let class = self.class(&[xml.local_name(archdesc), level]);
            let id = self.ead.anchor_id(archdesc, &self.options.class_prefix);
            self.out.open("fieldset", &[("class", &class), ("id", &id)]);
            self.out.element("legend", &[], &component_label(self.ead, archdesc));
            self.out.newline();
            self.render_body(archdesc, false);
            self.out.close("fieldset");
            self.out.newline();
        }

        self.out.close("div");
    }

    /// Children of a description block, in document order
    fn render_body(&mut self, element: NodeId, is_component: bool) {
        let children: Vec<NodeId> = self.ead.xml().child_elements(element).collect();
        for child in children {
            if self.ead.is_named(child, "did") {
                self.render_did(child);
                if is_component {
                    self.render_containers(element);
                }
            } else if self.ead.is_named(child, "dsc") {
                self.render_dsc(child);
            } else if self.ead.is_component(child) {
                self.render_component(child);
            } else if let Some(rule) = section_rule(self.ead.xml().local_name(child)) {
                if self.ead.is_named(child, rule.tag) {
                    self.render_section(child, rule);
                }
            }
        }
    }

    fn render_did(&mut self, did: NodeId) {
        let mut rows = Vec::new();
        for &(tag, label) in DID_FIELDS {
            for field in self.ead.children_named(did, tag) {
                let value = self.ead.normalized_text(Some(field));
                if !value.is_empty() {
                    rows.push((label, value));
                }
            }
        }
        if rows.is_empty() {
            return;
        }

        let class = self.class(&["did"]);
        self.out.open("dl", &[("class", &class)]);
        for (label, value) in rows {
            self.out.element("dt", &[], label);
            self.out.element("dd", &[], &value);
        }
        self.out.close("dl");
        self.out.newline();
    }

    fn render_containers(&mut self, component: NodeId) {
        // Skipped references already surface through the tree projection
        let mut warnings = Vec::new();
        let summaries = resolve_containers(self.ead, component, &mut warnings);
        let class = self.class(&["containers"]);
        for summary in summaries {
            self.out.open("dl", &[("class", &class), ("title", &summary.text)]);
            for entry in &summary.containers {
                self.out.element("dt", &[], &entry.kind);
                self.out.element("dd", &[], &entry.value);
            }
            self.out.close("dl");
            self.out.newline();
        }
    }

    /// Enter a nested fieldset, refusing once the cap is reached
    fn enter(&mut self, element: NodeId) -> bool {
        if self.nesting >= MAX_NESTING {
            tracing::debug!(
                locator = %crate::ead::locator::locate(self.ead.xml(), element),
                nesting = self.nesting,
                "nesting too deep, not rendered"
            );
            return false;
        }
        self.nesting += 1;
        true
    }

    fn render_dsc(&mut self, dsc: NodeId) {
        if !self.enter(dsc) {
            return;
        }
        let class = self.class(&["dsc"]);
        let legend = self.head_or(dsc, DSC_LABEL);
        self.out.open("fieldset", &[("class", &class)]);
        self.out.element("legend", &[], &legend);
        self.out.newline();
        self.render_body(dsc, false);
        self.out.close("fieldset");
        self.out.newline();
        self.nesting -= 1;
    }

    fn render_component(&mut self, component: NodeId) {
        if !self.enter(component) {
            return;
        }
        let xml = self.ead.xml();
        let level = self.ead.attribute(component, "level");
        let mut class = self.class(&[xml.local_name(component), level]);
        class.push_str(" collapsible");
        if self.options.collapsed {
            class.push_str(" collapsed");
        }
        let id = self.ead.anchor_id(component, &self.options.class_prefix);

        self.out.open("fieldset", &[("class", &class), ("id", &id)]);
        self.out.element("legend", &[], &component_label(self.ead, component));
        self.out.newline();
        self.render_body(component, true);
        self.out.close("fieldset");
        self.out.newline();
        self.nesting -= 1;
    }

    fn render_section(&mut self, section: NodeId, rule: &SectionRule) {
        let class = format!("{} {} collapsible", self.class(&["section"]), self.class(&[rule.tag]));
        let legend = self.head_or(section, rule.label);
        self.out.open("fieldset", &[("class", &class)]);
        self.out.element("legend", &[], &legend);
        self.out.newline();

        let paragraphs: Vec<NodeId> = self.ead.children_named(section, "p").collect();
        for p in paragraphs {
            let text = self.ead.xml().string_value(p);
            self.out.element("p", &[], &text);
            self.out.newline();
        }

        if rule.body == SectionBody::IndexTerms {
            let mut terms = Vec::new();
            self.collect_terms(section, &mut terms);
            if !terms.is_empty() {
                self.out.open("ul", &[]);
                for term in &terms {
                    self.out.element("li", &[], term);
                }
                self.out.close("ul");
                self.out.newline();
            }
        }

        self.out.close("fieldset");
        self.out.newline();
    }

    /// Index terms in document order, descending through nested
    /// `controlaccess` blocks
    fn collect_terms(&self, section: NodeId, terms: &mut Vec<String>) {
        let xml = self.ead.xml();
        let mut stack: Vec<NodeId> = xml.child_elements(section).collect();
        stack.reverse();
        while let Some(child) = stack.pop() {
            if self.ead.is_named(child, "controlaccess") {
                let mark = stack.len();
                stack.extend(xml.child_elements(child));
                stack[mark..].reverse();
            } else if INDEX_TERMS.iter().any(|&t| self.ead.is_named(child, t)) {
                let term = self.ead.normalized_text(Some(child));
                if !term.is_empty() {
                    terms.push(term);
                }
            }
        }
    }

    fn head_or(&self, element: NodeId, default: &str) -> String {
        let head = self.ead.normalized_text(self.ead.child(element, "head"));
        if head.is_empty() {
            default.to_string()
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ead::build_tree;

    const NESTED: &[u8] = include_bytes!("../../fixtures/nested.xml");
    const PARENTED: &[u8] = include_bytes!("../../fixtures/parented.xml");

    fn render(xml: &[u8], options: &Options) -> String {
        let ead = EadDocument::parse(xml).unwrap();
        render_html(&ead, options)
    }

    #[test]
    fn test_document_frame() {
        let html = render(NESTED, &Options::default());
        assert!(html.starts_with("<div class=\"ead\">"));
        assert!(html.ends_with("</div>"));
        assert!(html.contains("<h2 class=\"ead-title\">Guide to the Harmon Family Papers</h2>"));
        assert!(html.contains("<fieldset class=\"ead-archdesc-collection\" id=\"ead-archdesc-"));
        assert!(html.contains("<legend>Harmon Family Papers (1890-1950)</legend>"));
    }

    #[test]
    fn test_document_title_optional() {
        let options = Options {
            include_document_title: false,
            ..Options::default()
        };
        assert!(!render(NESTED, &options).contains("<h2"));
    }

    #[test]
    fn test_did_summary() {
        let html = render(NESTED, &Options::default());
        assert!(html.contains(
            "<dl class=\"ead-did\"><dt>Identifier</dt><dd>MS 12</dd><dt>Dates</dt><dd>1890-1950</dd>\
             <dt>Extent</dt><dd>4 linear feet</dd><dt>Language</dt><dd>English</dd>\
             <dt>Creator</dt><dd>Harmon family</dd><dt>Abstract</dt><dd>Letters &amp; diaries of a farming family.</dd></dl>"
        ));
    }

    #[test]
    fn test_narrative_sections() {
        let html = render(NESTED, &Options::default());
        assert!(html.contains("<fieldset class=\"ead-section ead-accessrestrict collapsible\"><legend>Access</legend>"));
        assert!(html.contains("<legend>Restrictions on Use</legend>"));
        assert!(html.contains("<p>The Harmon family farmed near Ames.</p>"));
        assert!(html.contains("<p>Letters &lt;and&gt; diaries.</p>"));
        assert!(html.contains("<legend>Subjects</legend>\n<ul><li>Farm life</li><li>Harmon, Ada</li></ul>"));
    }

    #[test]
    fn test_components() {
        let html = render(NESTED, &Options::default());
        assert!(html.contains("<fieldset class=\"ead-dsc\"><legend>Container List</legend>"));
        assert!(html.contains(
            "<fieldset class=\"ead-c01-series collapsible collapsed\" id=\"ser1\"><legend>Correspondence (1890-1920)</legend>"
        ));
        assert!(html.contains("<fieldset class=\"ead-c03-file collapsible collapsed\" id=\"ead-c03-"));
        assert!(html.contains(
            "<dl class=\"ead-containers\" title=\"Box 1, Folder 1\"><dt>Box</dt><dd>1</dd><dt>Folder</dt><dd>1</dd></dl>"
        ));
        assert!(!html.contains("Hidden"));
    }

    #[test]
    fn test_expanded_components() {
        let options = Options {
            collapsed: false,
            class_prefix: "fa".into(),
            ..Options::default()
        };
        let html = render(NESTED, &options);
        assert!(html.contains("class=\"fa-c01-series collapsible\" id=\"ser1\""));
    }

    #[test]
    fn test_render_is_stable() {
        let ead = EadDocument::parse(NESTED).unwrap();
        assert_eq!(render_html(&ead, &Options::default()), render_html(&ead, &Options::default()));
    }

    #[test]
    fn test_agrees_with_tree_on_containers() {
        fn count(nodes: &[crate::ead::DisplayNode]) -> usize {
            nodes.iter().map(|n| n.containers.len() + count(&n.children)).sum()
        }

        let ead = EadDocument::parse(PARENTED).unwrap();
        let html = render_html(&ead, &Options::default());
        let tree = build_tree(&ead);
        assert_eq!(html.matches("class=\"ead-containers\"").count(), count(&tree.nodes));
        assert!(html.contains("title=\"Box 1, Folder 2\""));
        // The flat box in the same did is suppressed
        assert!(!html.contains("<dd>99</dd>"));
    }

    #[test]
    fn test_deep_nesting_is_capped() {
        let ead = EadDocument::parse(&crate::ead::tests::deeply_nested(3000)).unwrap();
        let html = render_html(&ead, &Options::default());
        assert_eq!(html.matches("class=\"ead-c-series").count(), MAX_COMPONENT_DEPTH);
        assert_eq!(html.matches("<fieldset").count(), html.matches("</fieldset>").count());
        assert!(html.ends_with("</div>"));
    }
}
