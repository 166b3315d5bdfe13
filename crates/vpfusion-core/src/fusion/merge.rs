//! The merge pass and top-level `merge_group` entrypoint.

use tracing::debug;
use vpfusion_error::{Error, Result};

use super::attribution::{self, BIBLIOGRAPHIC_DATA_TAG};
use super::duplicate;
use super::reorder;
use crate::xml::XmlNode;

/// One kind-code variant going into a patent group's fusion.
pub struct Variant {
    pub kind_code: String,
    pub source_path: String,
    pub tree: XmlNode,
}

/// Merge a patent group's surviving variants into one virtual-patent tree.
///
/// `group_key` is used only for error context; `priority` is the configured
/// `global_priority` kind-code order, highest priority first.
pub fn merge_group(group_key: &str, variants: Vec<Variant>, priority: &[String]) -> Result<XmlNode> {
    let mut ranked: Vec<Variant> = variants
        .into_iter()
        .filter(|v| priority.iter().any(|p| p == &v.kind_code))
        .collect();
    ranked.sort_by_key(|v| priority.iter().position(|p| p == &v.kind_code).unwrap());

    let mut remaining = ranked.into_iter();
    let base = remaining.next().ok_or_else(|| {
        Error::fusion_failed(group_key.to_string(), "no variant survived priority filtering")
            .with_operation("fusion::merge_group")
    })?;

    let mut skeleton = base.tree;
    skeleton.set_attr("_source_file_path", base.source_path);
    rewrite_identity(&mut skeleton);
    let mut kind_merging = vec![base.kind_code.clone()];
    attribution::attribute_whole_document(&mut skeleton, &base.kind_code);

    for variant in remaining {
        kind_merging.push(variant.kind_code.clone());
        merge_into(&mut skeleton, &variant.tree, &variant.kind_code, 1, None);
    }

    skeleton.set_attr("kind-merging", kind_merging.join(","));
    reorder::canonicalize(&mut skeleton);
    Ok(skeleton)
}

/// Rewrite `kind="VP"` and replace `ucid`'s trailing `-<kind>` segment with
/// `-VP`. UCIDs with no hyphen are left untouched.
fn rewrite_identity(root: &mut XmlNode) {
    root.set_attr("kind", "VP");
    if let Some(ucid) = root.get_attr("ucid").map(|s| s.to_string()) {
        match ucid.rfind('-') {
            Some(pos) => root.set_attr("ucid", format!("{}-VP", &ucid[..pos])),
            None => debug!("ucid '{ucid}' has no hyphen segment to rewrite, leaving unchanged"),
        }
    }
}

/// Merge `incoming`'s children into `skeleton`'s children, applying tiered
/// kind-source attribution rules. `depth` is the depth (from root) of
/// `skeleton` and `incoming` themselves; `biblio_root_depth` is
/// `Some(depth)` of the nearest `bibliographic-data` ancestor already
/// entered, `None` outside one.
fn merge_into(skeleton: &mut XmlNode, incoming: &XmlNode, kind_code: &str, depth: usize, biblio_root_depth: Option<usize>) {
    for child in &incoming.children {
        if !child.has_content() {
            continue;
        }

        let skip_entirely = depth == 1 && child.tag != BIBLIOGRAPHIC_DATA_TAG;

        match duplicate::find_match_index(&skeleton.children, child) {
            Some(_) if skip_entirely => {
                // The highest-priority variant's Level-1 subtree is preserved verbatim.
            }
            Some(idx) => {
                let is_biblio_self = child.tag == BIBLIOGRAPHIC_DATA_TAG && biblio_root_depth.is_none();
                let next_biblio_root_depth = if is_biblio_self { Some(depth) } else { biblio_root_depth };
                merge_into(&mut skeleton.children[idx], child, kind_code, depth + 1, next_biblio_root_depth);
                if depth > 3 {
                    merge_missing_attrs(&mut skeleton.children[idx], child);
                    fill_empty_text(&mut skeleton.children[idx], child);
                }
            }
            None => {
                let mut cloned = child.clone();
                attribution::attribute_subtree(&mut cloned, kind_code, depth, biblio_root_depth);
                skeleton.children.push(cloned);
            }
        }
    }
}

fn merge_missing_attrs(dst: &mut XmlNode, src: &XmlNode) {
    for (key, value) in &src.attrs {
        if key == "kind-source" {
            continue;
        }
        if dst.get_attr(key).is_none() {
            dst.set_attr(key, value.clone());
        }
    }
}

fn fill_empty_text(dst: &mut XmlNode, src: &XmlNode) {
    if dst.text.trim().is_empty() && !src.text.trim().is_empty() {
        dst.text = src.text.clone();
    }
}
