//! Existence-check logic for the merge pass: is an incoming element a
//! duplicate of something already in the skeleton?

use crate::xml::XmlNode;

const ABSTRACT_TAG: &str = "abstract";
const FUZZY_MIN_LEN: usize = 50;
const FUZZY_MIN_RATIO: f64 = 0.8;

/// Index of the skeleton sibling that `incoming` duplicates, if any.
pub fn find_match_index(skeleton_children: &[XmlNode], incoming: &XmlNode) -> Option<usize> {
    if incoming.tag == ABSTRACT_TAG {
        skeleton_children
            .iter()
            .position(|c| c.tag == ABSTRACT_TAG && is_semantic_duplicate(c, incoming))
    } else {
        skeleton_children.iter().position(|c| c.tag == incoming.tag)
    }
}

fn source_attr(node: &XmlNode) -> Option<&str> {
    node.get_attr("source").or_else(|| node.get_attr("load-source"))
}

fn is_semantic_duplicate(a: &XmlNode, b: &XmlNode) -> bool {
    let lang_a = a.get_attr("lang");
    let lang_b = b.get_attr("lang");
    if let (Some(x), Some(y)) = (lang_a, lang_b) {
        if !x.eq_ignore_ascii_case(y) {
            return false;
        }
    }

    let source_a = source_attr(a);
    let source_b = source_attr(b);
    if let (Some(x), Some(y)) = (source_a, source_b) {
        if !x.eq_ignore_ascii_case(y) {
            return false;
        }
    }

    if lang_a.is_some() && lang_b.is_some() && source_a.is_some() && source_b.is_some() {
        return true;
    }

    text_equivalent(&a.text, &b.text)
}

fn text_equivalent(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return true;
    }
    if a.len() <= FUZZY_MIN_LEN || b.len() <= FUZZY_MIN_LEN {
        return false;
    }
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if longer.contains(shorter.as_str()) {
        return shorter.len() as f64 >= FUZZY_MIN_RATIO * longer.len() as f64;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    fn child(xml: &str) -> XmlNode {
        let wrapped = parse_str(&format!("<root>{xml}</root>")).unwrap();
        wrapped.children.into_iter().next().unwrap()
    }

    #[test]
    fn abstract_duplicate_when_lang_and_source_match() {
        let a = child(r#"<abstract lang="EN" source="docdb">alpha</abstract>"#);
        let b = child(r#"<abstract lang="en" source="DOCDB">beta totally different</abstract>"#);
        assert!(find_match_index(&[a], &b).is_some());
    }

    #[test]
    fn abstract_not_duplicate_on_language_mismatch() {
        let a = child(r#"<abstract lang="EN">alpha</abstract>"#);
        let b = child(r#"<abstract lang="FR">alpha</abstract>"#);
        assert!(find_match_index(&[a], &b).is_none());
    }

    #[test]
    fn fuzzy_text_match_on_long_near_identical_strings() {
        let long = "the quick brown fox jumps over the lazy dog near the riverbank every single morning";
        let a = child(&format!("<abstract>{long}</abstract>"));
        let b = child(&format!("<abstract>{long} and then some</abstract>"));
        assert!(find_match_index(&[a], &b).is_some());
    }

    #[test]
    fn other_tags_match_on_tag_alone() {
        let a = child("<claims><claim>one</claim></claims>");
        let b = child("<claims><claim>two</claim></claims>");
        assert!(find_match_index(&[a], &b).is_some());
    }

    #[test]
    fn fuzzy_match_requires_both_sides_over_the_length_floor() {
        let short = "a".repeat(44);
        let long = format!("{short}{}", "b".repeat(11));
        assert_eq!(long.len(), 55);
        let a = child(&format!("<abstract>{short}</abstract>"));
        let b = child(&format!("<abstract>{long}</abstract>"));
        assert!(find_match_index(&[a], &b).is_none());
    }
}
