//! Rendering rules
//!
//! Which EAD elements become which HTML blocks. The renderer walks the
//! document and consults these tables; adding a narrative section or a
//! `did` field is a one-line change here.

/// How a narrative section's content is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBody {
    /// `p` children as `<p>`
    Paragraphs,
    /// Indexing terms as a `<ul>`, nested `controlaccess` flattened
    IndexTerms,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionRule {
    pub tag: &'static str,
    /// Legend used when the section has no `head`
    pub label: &'static str,
    pub body: SectionBody,
}

pub const SECTION_RULES: &[SectionRule] = &[
    SectionRule { tag: "accessrestrict", label: "Restrictions on Access", body: SectionBody::Paragraphs },
    SectionRule { tag: "userestrict", label: "Restrictions on Use", body: SectionBody::Paragraphs },
    SectionRule { tag: "prefercite", label: "Preferred Citation", body: SectionBody::Paragraphs },
    SectionRule { tag: "acqinfo", label: "Acquisition Information", body: SectionBody::Paragraphs },
    SectionRule { tag: "processinfo", label: "Processing Information", body: SectionBody::Paragraphs },
    SectionRule { tag: "bioghist", label: "Biographical / Historical", body: SectionBody::Paragraphs },
    SectionRule { tag: "scopecontent", label: "Scope and Content", body: SectionBody::Paragraphs },
    SectionRule { tag: "relatedmaterial", label: "Related Materials", body: SectionBody::Paragraphs },
    SectionRule { tag: "controlaccess", label: "Indexing Terms", body: SectionBody::IndexTerms },
];

pub fn section_rule(local_name: &str) -> Option<&'static SectionRule> {
    SECTION_RULES.iter().find(|r| r.tag == local_name)
}

/// `did` children shown in the summary list, in display order
pub const DID_FIELDS: &[(&str, &str)] = &[
    ("unitid", "Identifier"),
    ("unitdate", "Dates"),
    ("physdesc", "Extent"),
    ("langmaterial", "Language"),
    ("origination", "Creator"),
    ("abstract", "Abstract"),
];

/// Elements listed under an indexing-terms section
pub const INDEX_TERMS: &[&str] = &[
    "corpname",
    "famname",
    "function",
    "genreform",
    "geogname",
    "name",
    "occupation",
    "persname",
    "subject",
    "title",
];

pub const DSC_LABEL: &str = "Container List";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_lookup() {
        assert_eq!(section_rule("bioghist").map(|r| r.label), Some("Biographical / Historical"));
        assert_eq!(section_rule("controlaccess").map(|r| r.body), Some(SectionBody::IndexTerms));
        assert!(section_rule("dsc").is_none());
    }
}
