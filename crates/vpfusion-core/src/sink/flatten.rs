//! CSV flattening: one row per virtual patent, column name =
//! underscore-joined tag chain, attributes suffixed `_attr_<name>`, trailing
//! text suffixed `_tail`, repeated sibling tags disambiguated `_1`, `_2`, …

use std::collections::HashMap;

use vpfusion_error::{Error, ErrorKind, Result};

use crate::xml::XmlNode;

fn join(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{prefix}_{suffix}")
    }
}

/// Flatten `root` into ordered `(column, value)` pairs, document order.
pub fn flatten(root: &XmlNode) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_node(root, "", &mut out);
    out
}

fn flatten_node(node: &XmlNode, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in &node.attrs {
        out.push((join(prefix, &format!("attr_{key}")), value.clone()));
    }
    if !prefix.is_empty() && !node.text.trim().is_empty() {
        out.push((prefix.to_string(), node.text.clone()));
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for child in &node.children {
        *counts.entry(child.tag.as_str()).or_insert(0) += 1;
    }
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for child in &node.children {
        let total = counts[child.tag.as_str()];
        let child_prefix = if total > 1 {
            let idx = seen.entry(child.tag.as_str()).or_insert(0);
            *idx += 1;
            join(prefix, &format!("{}_{}", child.tag, idx))
        } else {
            join(prefix, &child.tag)
        };
        flatten_node(child, &child_prefix, out);
        if !child.tail.trim().is_empty() {
            out.push((join(&child_prefix, "tail"), child.tail.clone()));
        }
    }
}

/// Render `root` as a one-row, `;`-delimited CSV (header + one record).
pub fn write_csv(root: &XmlNode, max_words: Option<usize>) -> Result<String> {
    let truncated = root.truncated_clone(max_words);
    let pairs = flatten(&truncated);

    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(vec![]);
    let csv_err = |err: csv::Error| Error::new(ErrorKind::SerializationFailed, err.to_string()).with_operation("sink::csv");

    writer
        .write_record(pairs.iter().map(|(k, _)| k.as_str()))
        .map_err(csv_err)?;
    writer
        .write_record(pairs.iter().map(|(_, v)| v.as_str()))
        .map_err(csv_err)?;
    let bytes = writer.into_inner().map_err(|err| Error::new(ErrorKind::SerializationFailed, err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| Error::new(ErrorKind::SerializationFailed, err.to_string()))
}
