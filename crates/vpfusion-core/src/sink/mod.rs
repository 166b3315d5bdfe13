//! Output sinks: three serializers sharing one in-memory virtual patent
//! tree, plus the path-derivation and merged-patent routing logic that
//! decides where each rendering lands.

mod flatten;
mod json;
mod paths;

pub use flatten::write_csv;
pub use json::write_json;
pub use paths::{derive_output_dir, is_merged_patent, output_file_name, prepare_for_serialization, FolderMeta};

use vpfusion_error::Result;

use crate::xml::{write_pretty_truncated, XmlNode};

/// Render `root` in `format` ("csv" | "xml" | "json"), truncating text to
/// `max_words` words first. The caller is expected to have already called
/// `prepare_for_serialization` on the tree.
pub fn render(root: &XmlNode, format: &str, max_words: Option<usize>) -> Result<String> {
    match format {
        "csv" => write_csv(root, max_words),
        "json" => write_json(root, max_words),
        _ => Ok(write_pretty_truncated(root, max_words)),
    }
}
