//! Attribute/element filtering, expressed as a data-driven filter table
//! instead of a long `if` chain: one row per `parse_*` flag, each naming
//! what it strips when disabled.

use crate::config::ParseFlags;
use crate::xml::XmlNode;

enum Selector {
    /// Strip this element wherever it appears in the document.
    Element(&'static str),
    /// Strip all of these elements (e.g. singular and plural container tag
    /// variants) wherever they appear in the document.
    Elements(&'static [&'static str]),
    /// Strip this attribute from the root element only.
    RootAttribute(&'static str),
}

struct FilterRule {
    flag: fn(&ParseFlags) -> bool,
    selector: Selector,
}

const RULES: &[FilterRule] = &[
    FilterRule { flag: |f| f.parse_country, selector: Selector::RootAttribute("country") },
    FilterRule { flag: |f| f.parse_date, selector: Selector::RootAttribute("date") },
    FilterRule { flag: |f| f.parse_family_id, selector: Selector::RootAttribute("family-id") },
    FilterRule {
        flag: |f| f.parse_file_reference_id,
        selector: Selector::RootAttribute("file-reference-id"),
    },
    FilterRule {
        flag: |f| f.parse_date_produced,
        selector: Selector::RootAttribute("date-produced"),
    },
    FilterRule { flag: |f| f.parse_abstract, selector: Selector::Element("abstract") },
    FilterRule { flag: |f| f.parse_claims, selector: Selector::Element("claims") },
    FilterRule { flag: |f| f.parse_description, selector: Selector::Element("description") },
    FilterRule { flag: |f| f.parse_title, selector: Selector::Element("invention-title") },
    FilterRule {
        flag: |f| f.parse_ipcr,
        selector: Selector::Elements(&["classification-ipcr", "classifications-ipcr"]),
    },
    FilterRule {
        flag: |f| f.parse_cpc,
        selector: Selector::Elements(&["classification-cpc", "classifications-cpc"]),
    },
    FilterRule {
        flag: |f| f.parse_main_classification,
        selector: Selector::Element("main-classification"),
    },
    FilterRule {
        flag: |f| f.parse_further_classification,
        selector: Selector::Element("further-classification"),
    },
    FilterRule { flag: |f| f.parse_applicants, selector: Selector::Element("applicants") },
    FilterRule { flag: |f| f.parse_inventors, selector: Selector::Element("inventors") },
    FilterRule { flag: |f| f.parse_agents, selector: Selector::Element("agents") },
    FilterRule { flag: |f| f.parse_citations, selector: Selector::Element("citations") },
    FilterRule { flag: |f| f.parse_drawings, selector: Selector::Element("drawings") },
];

/// Run every disabled flag's rule over the tree, document-wide, in one pass
/// per rule. Applied as the last pre-output step alongside language
/// filtering — both run just before serialization.
pub fn apply_filters(root: &mut XmlNode, flags: &ParseFlags) {
    for rule in RULES {
        if (rule.flag)(flags) {
            continue;
        }
        match rule.selector {
            Selector::Element(tag) => strip_element(root, tag),
            Selector::Elements(tags) => {
                for tag in tags {
                    strip_element(root, tag);
                }
            }
            Selector::RootAttribute(name) => {
                root.remove_attr(name);
            }
        }
    }
}

fn strip_element(node: &mut XmlNode, tag: &str) {
    node.children.retain(|c| c.tag != tag);
    for child in &mut node.children {
        strip_element(child, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn disabled_flag_strips_matching_element_everywhere() {
        let mut tree = parse_str(
            r#"<patent-document><bibliographic-data><abstract/></bibliographic-data><abstract/></patent-document>"#,
        )
        .unwrap();
        let mut flags = ParseFlags::default();
        flags.parse_abstract = false;
        apply_filters(&mut tree, &flags);
        assert_eq!(tree.children_by_tag("abstract").count(), 0);
        assert!(tree.child_by_tag("bibliographic-data").unwrap().child_by_tag("abstract").is_none());
    }

    #[test]
    fn disabled_root_attribute_flag_strips_only_root() {
        let mut tree = parse_str(r#"<patent-document country="EP"/>"#).unwrap();
        let mut flags = ParseFlags::default();
        flags.parse_country = false;
        apply_filters(&mut tree, &flags);
        assert_eq!(tree.get_attr("country"), None);
    }

    #[test]
    fn enabled_flags_leave_tree_untouched() {
        let mut tree = parse_str(r#"<patent-document country="EP"><claims/></patent-document>"#).unwrap();
        apply_filters(&mut tree, &ParseFlags::default());
        assert_eq!(tree.get_attr("country"), Some("EP"));
        assert!(tree.child_by_tag("claims").is_some());
    }

    #[test]
    fn disabled_citations_flag_strips_citations_element() {
        let mut tree = parse_str(r#"<patent-document><citations/></patent-document>"#).unwrap();
        let mut flags = ParseFlags::default();
        flags.parse_citations = false;
        apply_filters(&mut tree, &flags);
        assert!(tree.child_by_tag("citations").is_none());
    }

    #[test]
    fn disabled_ipcr_flag_strips_both_singular_and_plural_container() {
        let mut tree = parse_str(
            r#"<patent-document><classification-ipcr/><classifications-ipcr/></patent-document>"#,
        )
        .unwrap();
        let mut flags = ParseFlags::default();
        flags.parse_ipcr = false;
        apply_filters(&mut tree, &flags);
        assert!(tree.child_by_tag("classification-ipcr").is_none());
        assert!(tree.child_by_tag("classifications-ipcr").is_none());
    }
}
