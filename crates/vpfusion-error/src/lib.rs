//! # vpfusion-error
//!
//! Unified error handling for the fusion engine - following OpenDAL's error
//! handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., XmlParseFailed, ConfigInvalid)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use vpfusion_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::XmlParseFailed, "unexpected token")
//!         .with_operation("fusion::merge_element")
//!         .with_context("file", "EP-1234567-A1.xml")
//!         .with_context("patent_group", "EP-1234567"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, vpfusion_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the fusion engine's Error
pub type Result<T> = std::result::Result<T, Error>;
