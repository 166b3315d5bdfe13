//! Compiled-in constants: the closed vocabularies the configuration surface
//! validates against, plus the fusion algorithm's fixed thresholds.

pub const VALID_PATENT_OFFICES: &[&str] = &["CN", "EP", "JP", "KR", "US", "WO"];

pub const VALID_OUTPUT_FORMATS: &[&str] = &["csv", "xml", "json"];

pub const SUPPORTED_LANGUAGES: &[&str] =
    &["EN", "FR", "DE", "JA", "KO", "ZH", "ES", "IT", "NL", "RU"];

/// Tie-break order used when `parse_lang = "PRIMARY"` and descendant
/// `lang=` frequency ties.
pub const PRIMARY_LANGUAGE_PRIORITY: &[&str] = &["EN", "FR", "DE", "JA", "KO", "ZH"];

pub const DEFAULT_GLOBAL_PRIORITY: &[&str] = &["B9", "B2", "B1", "A9", "A4", "A2", "A1"];

pub const MIN_BATCH_SIZE: usize = 10;

pub const DEFAULT_BATCH_SIZE: usize = 50;

pub const DEFAULT_MAX_TEXT_LENGTH_WORDS: usize = 300;

pub const DEFAULT_MEMORY_LIMIT_GIB: u64 = 8;

/// Estimated per-file overhead used when resolving `chunk_size = "AUTO"`.
pub const CHUNK_SIZE_BYTES_PER_FILE: u64 = 60_000;

pub const CHUNK_SIZE_MIN: usize = 50;
pub const CHUNK_SIZE_MAX: usize = 5000;

/// Formatting tags skipped by recursive `kind-source` attribution.
pub const ATTRIBUTION_SKIP_TAGS: &[&str] = &[
    "p", "b", "i", "u", "strong", "em", "span", "div", "br", "hr", "ul", "ol", "li", "table",
    "tr", "td", "th", "tbody", "thead", "tfoot", "colgroup", "col", "sup", "sub", "math", "mrow",
    "mi", "mn", "mo", "msup", "msub", "mfrac", "img", "figcaption", "text", "content",
];

/// Elements subject to multi-language pruning.
pub const LANGUAGE_FILTERED_TAGS: &[&str] =
    &["abstract", "description", "claims", "invention-title"];

/// Canonical root-attribute order; ephemeral helper attributes come
/// first and are stripped again just before serialization.
pub const EPHEMERAL_ROOT_ATTRS: &[&str] = &["xml_file_name", "relative_dir", "folder_index"];

pub const CANONICAL_ROOT_ATTR_ORDER: &[&str] = &[
    "ucid",
    "country",
    "doc-number",
    "kind",
    "kind-merging",
    "date",
    "family-id",
    "file-reference-id",
    "date-produced",
    "status",
    "lang",
];
