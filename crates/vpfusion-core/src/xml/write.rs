//! Pretty-printing serializer for the owned XML tree.
//!
//! `quick_xml::Writer`'s event stream does not map cleanly onto a tree that
//! tracks `tail` text the way this engine's node model does (mixed content
//! would require re-deriving start/end/text events from the tree anyway), so
//! serialization walks the tree directly and uses `quick_xml::escape` for
//! correctness at the leaves.

use quick_xml::escape::escape;

use super::XmlNode;
use crate::text::truncate_text;

const INDENT: &str = "  ";

/// Serialize with an XML declaration and 2-space indentation, no truncation.
pub fn write_pretty(root: &XmlNode) -> String {
    write_pretty_truncated(root, None)
}

/// Serialize with an XML declaration and 2-space indentation, truncating
/// every text/tail node to `max_words` words first (`None` disables
/// truncation, matching `max_text_length = "ALL"`).
pub fn write_pretty_truncated(root: &XmlNode, max_words: Option<usize>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_node(&mut out, root, 0, max_words);
    out.push('\n');
    out
}

fn write_node(out: &mut String, node: &XmlNode, depth: usize, max_words: Option<usize>) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }

    let text = truncate_text(&node.text, max_words);
    if node.children.is_empty() && text.trim().is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        if !text.is_empty() {
            out.push_str(&escape(&text));
        }
        if !node.children.is_empty() {
            out.push('\n');
            for child in &node.children {
                write_node(out, child, depth + 1, max_words);
                let tail = truncate_text(&child.tail, max_words);
                if !tail.is_empty() {
                    out.push_str(&escape(&tail));
                }
                out.push('\n');
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn round_trips_structure() {
        let xml = r#"<patent-document kind="VP"><abstract lang="EN"><p>alpha beta</p></abstract></patent-document>"#;
        let tree = parse_str(xml).unwrap();
        let out = write_pretty(&tree);
        assert!(out.contains("kind=\"VP\""));
        assert!(out.contains("alpha beta"));
    }

    #[test]
    fn truncation_applies_to_text_nodes() {
        let xml = r#"<p>one two three four five</p>"#;
        let tree = parse_str(xml).unwrap();
        let out = write_pretty_truncated(&tree, Some(2));
        assert!(out.contains(">one two<"));
        assert!(!out.contains("three"));
    }
}
