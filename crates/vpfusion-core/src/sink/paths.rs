//! Output path derivation and the ephemeral-attribute / `_source_file_path`
//! handling that only applies right before serialization.

use std::path::{Path, PathBuf};

use crate::constants::{CANONICAL_ROOT_ATTR_ORDER, EPHEMERAL_ROOT_ATTRS};
use crate::xml::XmlNode;

/// Folder-order metadata attached to the root just before an artifact is
/// written, computed by the path scanner at batch time.
pub struct FolderMeta {
    pub xml_file_name: String,
    pub relative_dir: String,
    pub folder_index: u64,
}

/// Strip `_source_file_path`, attach the ephemeral triple and put the root
/// attribute block in its final canonical order. Returns the prepared clone
/// and the source path that was removed (still needed for path derivation).
pub fn prepare_for_serialization(tree: &XmlNode, meta: &FolderMeta) -> (XmlNode, String) {
    let mut out = tree.clone();
    let source_path = out.remove_attr("_source_file_path").unwrap_or_default();
    out.set_attr("xml_file_name", meta.xml_file_name.clone());
    out.set_attr("relative_dir", meta.relative_dir.clone());
    out.set_attr("folder_index", meta.folder_index.to_string());

    let mut order: Vec<&str> = EPHEMERAL_ROOT_ATTRS.to_vec();
    order.extend_from_slice(CANONICAL_ROOT_ATTR_ORDER);
    out.reorder_attrs(&order);

    (out, source_path)
}

pub fn is_merged_patent(tree: &XmlNode) -> bool {
    tree.get_attr("kind-merging")
        .map(|codes| codes.split(',').count() > 1)
        .unwrap_or(false)
}

/// `<office>-<doc-number>-VP.<ext>`.
pub fn output_file_name(office: &str, doc_number: &str, ext: &str) -> String {
    format!("{office}-{doc_number}-VP.{ext}")
}

/// Destination directory under `root` for one artifact.
///
/// With `original_directory_structure`, the source path's
/// `<office>/<date>/<kind>/<doc-path>/…` segments are reused, with `<kind>`
/// replaced by the literal `VP`; otherwise artifacts are grouped flatly by
/// `<root>/<office>/<format>/`.
pub fn derive_output_dir(root: &Path, office: &str, format: &str, source_path: &str, original_directory_structure: bool) -> PathBuf {
    if !original_directory_structure {
        return root.join(office).join(format);
    }

    let components: Vec<&str> = Path::new(source_path).iter().filter_map(|c| c.to_str()).collect();
    let Some(office_idx) = components.iter().position(|c| *c == office) else {
        return root.join(office).join(format);
    };
    // Need at least <office>/<date>/<kind>/<file>.
    if office_idx + 3 >= components.len() {
        return root.join(office).join(format);
    }

    let mut out = root.join(office).join(components[office_idx + 1]).join("VP");
    for component in &components[office_idx + 3..components.len() - 1] {
        out.push(component);
    }
    out
}
