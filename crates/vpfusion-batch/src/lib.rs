//! Path scanning and batching for the Virtual Patent Fusion Engine: turns a
//! corpus root into an ordered list of atomic, patent-group-safe work
//! batches the fusion pipeline can hand out to workers.

pub mod batch;
pub mod scan;

pub use batch::build_batches;
pub use scan::{scan, DirStats, ScanResult};
