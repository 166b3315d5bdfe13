//! Canonical child and attribute ordering.

use tracing::debug;

use crate::constants::CANONICAL_ROOT_ATTR_ORDER;
use crate::xml::XmlNode;

const DATES_TAG: &str = "dates-of-public-availability";
const TECHNICAL_DATA_TAG: &str = "technical-data";
const SEARCH_REPORT_TAG: &str = "search-report-data";
const COPYRIGHT_TAG: &str = "copyright";

/// Reposition the canonically-ordered elements and rewrite the root
/// attribute block. Ephemeral helper attributes are attached by the output
/// sinks just before serialization, not here.
pub fn canonicalize(root: &mut XmlNode) {
    reposition_before(root, DATES_TAG, TECHNICAL_DATA_TAG);
    reposition_before(root, SEARCH_REPORT_TAG, COPYRIGHT_TAG);
    move_to_last(root, COPYRIGHT_TAG);
    root.reorder_attrs(CANONICAL_ROOT_ATTR_ORDER);
}

fn reposition_before(root: &mut XmlNode, tag: &str, anchor: &str) {
    let Some(tag_idx) = root.children.iter().position(|c| c.tag == tag) else {
        return;
    };
    if !root.children.iter().any(|c| c.tag == anchor) {
        debug!("cannot reposition '{tag}' before '{anchor}': anchor missing, leaving in place");
        return;
    }
    let node = root.children.remove(tag_idx);
    let anchor_idx = root.children.iter().position(|c| c.tag == anchor).unwrap();
    root.children.insert(anchor_idx, node);
}

fn move_to_last(root: &mut XmlNode, tag: &str) {
    if let Some(idx) = root.children.iter().position(|c| c.tag == tag) {
        let node = root.children.remove(idx);
        root.children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn reorders_dates_search_report_and_copyright() {
        let mut tree = parse_str(
            r#"<patent-document>
                <copyright/>
                <search-report-data/>
                <dates-of-public-availability/>
                <priority-claims/>
                <technical-data/>
            </patent-document>"#,
        )
        .unwrap();
        canonicalize(&mut tree);
        let tags: Vec<&str> = tree.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec!["priority-claims", "dates-of-public-availability", "technical-data", "search-report-data", "copyright"]
        );
    }

    #[test]
    fn leaves_element_in_place_when_anchor_missing() {
        let mut tree = parse_str(
            r#"<patent-document><technical-data/><dates-of-public-availability/></patent-document>"#,
        )
        .unwrap();
        canonicalize(&mut tree);
        let tags: Vec<&str> = tree.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["technical-data", "dates-of-public-availability"]);
    }

    #[test]
    fn root_attrs_follow_canonical_order() {
        let mut tree = parse_str(r#"<patent-document custom="x" lang="EN" ucid="EP-1-VP" country="EP"/>"#).unwrap();
        canonicalize(&mut tree);
        let names: Vec<&str> = tree.attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["ucid", "country", "lang", "custom"]);
    }
}
