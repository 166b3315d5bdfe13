//! Fusion engine, data model and output sinks for the Virtual Patent Fusion
//! Engine: everything downstream of file discovery and batching.

pub mod config;
pub mod constants;
pub mod filter;
pub mod fusion;
pub mod identifier;
pub mod language;
pub mod sink;
pub mod text;
pub mod xml;

pub use vpfusion_error::{Error, ErrorKind, Result};
