//! The fusion engine: merges a patent group's kind-code variants into one
//! provenance-annotated virtual patent.

pub mod attribution;
mod duplicate;
mod merge;
mod reorder;

pub use merge::{merge_group, Variant};
