//! Owned XML tree model.
//!
//! The fusion engine needs a mutable DOM it can clone subtrees out of and
//! graft into another tree. Rather than wrap an FFI-backed libxml2 document
//! (which makes structural edits awkward to reason about across threads),
//! every virtual patent is represented as a plain owned tree: a node holds
//! its own attributes and children and can be cloned, re-parented or dropped
//! like any other Rust value. See `merge::merge_group` for the part that
//! actually walks two such trees together.

mod parse;
mod write;

pub use parse::parse_str;
pub use write::{write_pretty, write_pretty_truncated};

/// One XML element. Mirrors the lxml element model this engine's reference
/// implementation relied on: `text` is the content before the first child,
/// `tail` is the content between this element's closing tag and the next
/// sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
    pub tail: String,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>) -> Self {
        XmlNode {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            tail: String::new(),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, preserving its existing position if already present,
    /// otherwise appending it at the end.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Reorder `self.attrs` to exactly `order`, dropping names not present in
    /// `self` and appending any attribute absent from `order` at the end.
    pub fn reorder_attrs(&mut self, order: &[&str]) {
        let mut reordered = Vec::with_capacity(self.attrs.len());
        for name in order {
            if let Some(idx) = self.attrs.iter().position(|(k, _)| k == *name) {
                reordered.push(self.attrs.remove(idx));
            }
        }
        reordered.extend(self.attrs.drain(..));
        self.attrs = reordered;
    }

    pub fn child_by_tag(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn child_by_tag_mut(&mut self, tag: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    pub fn children_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// True if this element carries any content worth merging: non-empty
    /// text/tail, any attribute, or any child.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
            || !self.tail.trim().is_empty()
            || !self.attrs.is_empty()
            || !self.children.is_empty()
    }

    /// Visit every descendant (not including self) depth-first, in document order.
    pub fn visit_descendants_mut(&mut self, f: &mut impl FnMut(&mut XmlNode)) {
        for child in &mut self.children {
            f(child);
            child.visit_descendants_mut(f);
        }
    }

    pub fn visit_descendants(&self, f: &mut impl FnMut(&XmlNode)) {
        for child in &self.children {
            f(child);
            child.visit_descendants(f);
        }
    }

    /// Deep clone, truncating every text/tail node to `max_words` words.
    /// Shared by the CSV and JSON sinks, which (unlike the XML sink) need a
    /// materialized truncated tree rather than truncating while streaming.
    pub fn truncated_clone(&self, max_words: Option<usize>) -> XmlNode {
        XmlNode {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            text: crate::text::truncate_text(&self.text, max_words),
            tail: crate::text::truncate_text(&self.tail, max_words),
            children: self.children.iter().map(|c| c.truncated_clone(max_words)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_preserves_position() {
        let mut n = XmlNode::new("abstract");
        n.set_attr("lang", "EN");
        n.set_attr("source", "docdb");
        n.set_attr("lang", "FR");
        assert_eq!(n.attrs, vec![
            ("lang".to_string(), "FR".to_string()),
            ("source".to_string(), "docdb".to_string()),
        ]);
    }

    #[test]
    fn reorder_attrs_drops_unknown_keeps_extra() {
        let mut n = XmlNode::new("patent-document");
        n.set_attr("lang", "EN");
        n.set_attr("ucid", "EP-100-VP");
        n.set_attr("custom", "x");
        n.reorder_attrs(&["ucid", "lang"]);
        assert_eq!(
            n.attrs,
            vec![
                ("ucid".to_string(), "EP-100-VP".to_string()),
                ("lang".to_string(), "EN".to_string()),
                ("custom".to_string(), "x".to_string()),
            ]
        );
    }
}
