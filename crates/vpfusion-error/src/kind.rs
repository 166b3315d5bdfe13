//! Error kinds for fusion engine operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    /// Feature or operation not yet implemented
    NotImplemented,

    // =========================================================================
    // XML parse errors
    // =========================================================================
    /// Failed to parse an XML document, even with the tolerant/recovering parser
    XmlParseFailed,

    /// A required attribute or element was missing from an otherwise-valid document
    MissingRequiredField,

    /// Encoding error (invalid UTF-8, etc.)
    EncodingError,

    // =========================================================================
    // Fusion errors
    // =========================================================================
    /// The fusion algorithm could not merge a patent group (see context for group key)
    FusionFailed,

    /// A canonical-reordering anchor (sibling element) was absent
    ReorderAnchorMissing,

    /// A file name did not match `<office>-<docnumber>-<kind>.xml`
    UnparseableFileName,

    /// A kind code fell outside the configured priority list
    UnknownKindCode,

    // =========================================================================
    // Batching / scanning errors
    // =========================================================================
    /// Path scanning failed to enumerate a directory
    ScanFailed,

    /// Batch construction violated an invariant (e.g. split patent group)
    BatchInvalid,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Directory traversal failed
    TraversalFailed,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed (CSV/XML/JSON sink)
    SerializationFailed,

    /// Deserialization failed (temp tree reload)
    DeserializationFailed,

    /// Invalid format requested or produced
    InvalidFormat,

    // =========================================================================
    // Resource errors
    // =========================================================================
    /// Memory limit exceeded
    MemoryLimitExceeded,

    /// Timeout occurred (worker pool result collection)
    Timeout,

    /// Resource exhausted (thread pool, disk)
    ResourceExhausted,

    // =========================================================================
    // Validation errors
    // =========================================================================
    /// Invalid argument passed to function
    InvalidArgument,

    /// Assertion failed
    AssertionFailed,

    /// Invariant violation
    InvariantViolation,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::ResourceExhausted | ErrorKind::IoFailed
        )
    }
}
