//! JSON hierarchical serialization: attributes keyed `@name`, mixed
//! content text keyed `#text`, tail text keyed `#tail`, repeated sibling
//! tags collapse into an array starting on the second occurrence.

use serde::Serialize;
use serde_json::{Map, Value};
use vpfusion_error::{Error, ErrorKind, Result};

use crate::xml::XmlNode;

fn node_to_value(node: &XmlNode) -> Value {
    let mut map = Map::new();
    for (key, value) in &node.attrs {
        map.insert(format!("@{key}"), Value::String(value.clone()));
    }
    if !node.text.trim().is_empty() {
        map.insert("#text".to_string(), Value::String(node.text.clone()));
    }

    for child in &node.children {
        let mut child_obj = match node_to_value(child) {
            Value::Object(obj) => obj,
            other => {
                let mut obj = Map::new();
                obj.insert("#text".to_string(), other);
                obj
            }
        };
        if !child.tail.trim().is_empty() {
            child_obj.insert("#tail".to_string(), Value::String(child.tail.clone()));
        }
        let child_value = Value::Object(child_obj);

        match map.get_mut(&child.tag) {
            Some(Value::Array(items)) => items.push(child_value),
            Some(existing) => {
                let first = existing.clone();
                map.insert(child.tag.clone(), Value::Array(vec![first, child_value]));
            }
            None => {
                map.insert(child.tag.clone(), child_value);
            }
        }
    }

    Value::Object(map)
}

/// Render `root` as a 4-space-indented JSON document.
pub fn write_json(root: &XmlNode, max_words: Option<usize>) -> Result<String> {
    let truncated = root.truncated_clone(max_words);
    let mut document = Map::new();
    document.insert(truncated.tag.clone(), node_to_value(&truncated));

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    Value::Object(document)
        .serialize(&mut serializer)
        .map_err(|err| Error::new(ErrorKind::SerializationFailed, err.to_string()).with_operation("sink::json"))?;
    String::from_utf8(buf).map_err(|err| Error::new(ErrorKind::SerializationFailed, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn attributes_and_text_use_at_and_hash_keys() {
        let tree = parse_str(r#"<abstract lang="EN">alpha</abstract>"#).unwrap();
        let json = write_json(&tree, None).unwrap();
        assert!(json.contains("\"@lang\""));
        assert!(json.contains("\"#text\""));
        assert!(json.contains("    "));
    }

    #[test]
    fn repeated_siblings_collapse_into_array() {
        let tree = parse_str(r#"<claims><claim>one</claim><claim>two</claim></claims>"#).unwrap();
        let json = write_json(&tree, None).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        let claims = &parsed["claims"]["claim"];
        assert!(claims.is_array());
        assert_eq!(claims.as_array().unwrap().len(), 2);
    }

    #[test]
    fn tail_text_uses_hash_tail_key() {
        let tree = parse_str(r#"<claims><claim>one</claim>between<claim>two</claim></claims>"#).unwrap();
        let json = write_json(&tree, None).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["claims"]["claim"][0]["#tail"], "between");
    }
}
