//! Tolerant XML parsing: a malformed trailing fragment should never abort an
//! otherwise-usable document. `quick_xml::Reader` has no recovery mode of
//! its own, so this stops consuming events as soon as one fails, logs it,
//! and returns whatever tree was assembled up to that point.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::debug;
use vpfusion_error::{Error, ErrorKind, Result};

use super::XmlNode;

/// Parse an XML document, recovering from trailing malformed fragments.
pub fn parse_str(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let decoder = reader.decoder();
                stack.push(node_from_start(&e, decoder)?);
            }
            Ok(Event::Empty(e)) => {
                let decoder = reader.decoder();
                let node = node_from_start(&e, decoder)?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(node) => attach(&mut stack, &mut root, node),
                None => break,
            },
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                append_text(&mut stack, text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_text(&mut stack, text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                debug!("recovering from malformed XML fragment: {err}");
                break;
            }
        }
    }

    // Recovery: auto-close any elements still open when the event stream
    // ended early, the same way `lxml`'s recovering parser patches up a
    // truncated document rather than discarding it.
    while let Some(node) = stack.pop() {
        attach(&mut stack, &mut root, node);
    }

    root.ok_or_else(|| Error::new(ErrorKind::XmlParseFailed, "document has no root element"))
}

fn node_from_start(
    e: &quick_xml::events::BytesStart,
    decoder: quick_xml::encoding::Decoder,
) -> Result<XmlNode> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = XmlNode::new(tag);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            Error::new(ErrorKind::XmlParseFailed, err.to_string()).with_operation("xml::parse")
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .unwrap_or_default()
            .into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        *root = Some(node);
    }
}

fn append_text(stack: &mut [XmlNode], text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(last_child) => last_child.tail.push_str(&text),
            None => parent.text.push_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attrs() {
        let xml = r#"<patent-document lang="EN" kind="A1"><abstract lang="EN"><p>alpha</p></abstract></patent-document>"#;
        let root = parse_str(xml).unwrap();
        assert_eq!(root.tag, "patent-document");
        assert_eq!(root.get_attr("kind"), Some("A1"));
        let abstract_el = root.child_by_tag("abstract").unwrap();
        assert_eq!(abstract_el.get_attr("lang"), Some("EN"));
        let p = abstract_el.child_by_tag("p").unwrap();
        assert_eq!(p.text, "alpha");
    }

    #[test]
    fn captures_tail_text_on_mixed_content() {
        let xml = r#"<claims>lead-in<claim>one</claim>between<claim>two</claim>trailing</claims>"#;
        let root = parse_str(xml).unwrap();
        assert_eq!(root.text, "lead-in");
        assert_eq!(root.children[0].tail, "between");
        assert_eq!(root.children[1].tail, "trailing");
    }

    #[test]
    fn recovers_from_truncated_document() {
        let xml = r#"<patent-document><abstract><p>alpha</p></abstract><description>"#;
        let root = parse_str(xml).unwrap();
        assert_eq!(root.tag, "patent-document");
        assert!(root.child_by_tag("abstract").is_some());
    }
}
