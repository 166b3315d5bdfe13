//! Tiered `kind-source` provenance attribution.
//!
//! One recursive rule covers every case: `bibliographic-data` itself never
//! carries the attribute but resets the
//! "inside bibliographic-data" depth counter for its descendants; inside
//! that subtree only Level-2 and Level-3 relative depths are stamped;
//! everywhere else every structural (non-formatting-tag) element is stamped,
//! all the way down.

use crate::constants::ATTRIBUTION_SKIP_TAGS;
use crate::xml::XmlNode;

pub const BIBLIOGRAPHIC_DATA_TAG: &str = "bibliographic-data";

pub fn is_formatting_tag(tag: &str) -> bool {
    ATTRIBUTION_SKIP_TAGS.contains(&tag)
}

/// Apply attribution to every direct child of `root` (Level 1) and
/// everything beneath, as if the whole document had just been contributed
/// by `kind_code`. Used once, on skeleton construction.
pub fn attribute_whole_document(root: &mut XmlNode, kind_code: &str) {
    for child in &mut root.children {
        attribute_subtree(child, kind_code, 1, None);
    }
}

/// Apply attribution to a subtree being inserted at `depth` (the depth of
/// `node` itself, root's direct children being depth 1), given whether that
/// insertion point already sits inside a `bibliographic-data` ancestor
/// (`biblio_root_depth`, the depth at which that ancestor sits).
pub fn attribute_subtree(node: &mut XmlNode, kind_code: &str, depth: usize, biblio_root_depth: Option<usize>) {
    let is_biblio_self = node.tag == BIBLIOGRAPHIC_DATA_TAG && biblio_root_depth.is_none();

    if is_biblio_self {
        for child in &mut node.children {
            attribute_subtree(child, kind_code, depth + 1, Some(depth));
        }
        return;
    }

    if let Some(root_depth) = biblio_root_depth {
        let rel = depth - root_depth;
        if rel == 1 || rel == 2 {
            node.set_attr("kind-source", kind_code);
        }
        for child in &mut node.children {
            attribute_subtree(child, kind_code, depth + 1, biblio_root_depth);
        }
        return;
    }

    if !is_formatting_tag(&node.tag) {
        node.set_attr("kind-source", kind_code);
    }
    for child in &mut node.children {
        attribute_subtree(child, kind_code, depth + 1, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn level1_non_biblio_stamps_self_and_structural_descendants() {
        let mut tree = parse_str(r#"<patent-document><claims><claim><p>x</p></claim></claims></patent-document>"#).unwrap();
        attribute_whole_document(&mut tree, "A1");
        let claims = tree.child_by_tag("claims").unwrap();
        assert_eq!(claims.get_attr("kind-source"), Some("A1"));
        let claim = claims.child_by_tag("claim").unwrap();
        assert_eq!(claim.get_attr("kind-source"), Some("A1"));
        let p = claim.child_by_tag("p").unwrap();
        assert_eq!(p.get_attr("kind-source"), None, "formatting tags never get kind-source");
    }

    #[test]
    fn bibliographic_data_itself_is_never_stamped() {
        let mut tree = parse_str(
            r#"<patent-document><bibliographic-data><applicants><applicant/></applicants></bibliographic-data></patent-document>"#,
        )
        .unwrap();
        attribute_whole_document(&mut tree, "B1");
        let biblio = tree.child_by_tag("bibliographic-data").unwrap();
        assert_eq!(biblio.get_attr("kind-source"), None);
        let applicants = biblio.child_by_tag("applicants").unwrap();
        assert_eq!(applicants.get_attr("kind-source"), Some("B1"));
        let applicant = applicants.child_by_tag("applicant").unwrap();
        assert_eq!(applicant.get_attr("kind-source"), Some("B1"));
    }

    #[test]
    fn level4_within_biblio_is_not_stamped() {
        let mut tree = parse_str(
            r#"<patent-document><bibliographic-data><applicants><applicant><addressbook><name/></addressbook></applicant></applicants></bibliographic-data></patent-document>"#,
        )
        .unwrap();
        attribute_whole_document(&mut tree, "B1");
        let addressbook = tree
            .child_by_tag("bibliographic-data")
            .unwrap()
            .child_by_tag("applicants")
            .unwrap()
            .child_by_tag("applicant")
            .unwrap()
            .child_by_tag("addressbook")
            .unwrap();
        assert_eq!(addressbook.get_attr("kind-source"), None);
    }
}
