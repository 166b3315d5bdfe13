//! Typed configuration surface.
//!
//! Loaded from a TOML file (see DESIGN.md for why TOML rather than an INI
//! file) and overridable from CLI flags. Validation is a fatal startup
//! step: nothing here is ever a recoverable per-file error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use vpfusion_error::{Error, Result};

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_GLOBAL_PRIORITY, DEFAULT_MAX_TEXT_LENGTH_WORDS,
    DEFAULT_MEMORY_LIMIT_GIB, VALID_OUTPUT_FORMATS, VALID_PATENT_OFFICES,
};
use crate::language::validate_parse_lang;

/// Count-like options that accept either a concrete number or the literal
/// `"ALL"`/`"AUTO"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSized {
    Auto,
    Fixed(usize),
}

/// The dozens of `parse_*` element/attribute filter flags. All default to
/// `true` (nothing is filtered out unless explicitly disabled).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseFlags {
    pub parse_country: bool,
    pub parse_date: bool,
    pub parse_family_id: bool,
    pub parse_file_reference_id: bool,
    pub parse_date_produced: bool,
    pub parse_abstract: bool,
    pub parse_claims: bool,
    pub parse_description: bool,
    pub parse_title: bool,
    pub parse_ipcr: bool,
    pub parse_cpc: bool,
    pub parse_main_classification: bool,
    pub parse_further_classification: bool,
    pub parse_applicants: bool,
    pub parse_inventors: bool,
    pub parse_agents: bool,
    pub parse_citations: bool,
    pub parse_drawings: bool,
}

impl Default for ParseFlags {
    fn default() -> Self {
        ParseFlags {
            parse_country: true,
            parse_date: true,
            parse_family_id: true,
            parse_file_reference_id: true,
            parse_date_produced: true,
            parse_abstract: true,
            parse_claims: true,
            parse_description: true,
            parse_title: true,
            parse_ipcr: true,
            parse_cpc: true,
            parse_main_classification: true,
            parse_further_classification: true,
            parse_applicants: true,
            parse_inventors: true,
            parse_agents: true,
            parse_citations: true,
            parse_drawings: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vertical_origin_path: PathBuf,
    pub destination_path: PathBuf,
    pub patent_office: String,

    pub max_text_length: String,
    pub output_formats: Vec<String>,
    pub enable_merged_inspection: bool,
    pub original_directory_structure: bool,

    #[serde(flatten)]
    pub parse_flags: ParseFlags,
    pub parse_lang: String,

    pub batch_size: usize,
    pub chunk_size: String,
    pub cpu_count: String,
    pub memory_limit: String,

    pub global_priority: Vec<String>,
    /// Parsed but never consulted by the fusion algorithm: a reserved hook
    /// only.
    pub field_priorities: HashMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            vertical_origin_path: PathBuf::new(),
            destination_path: PathBuf::new(),
            patent_office: String::new(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH_WORDS.to_string(),
            output_formats: vec!["csv".to_string()],
            enable_merged_inspection: true,
            original_directory_structure: false,
            parse_flags: ParseFlags::default(),
            parse_lang: "ALL".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: "AUTO".to_string(),
            cpu_count: "ALL".to_string(),
            memory_limit: DEFAULT_MEMORY_LIMIT_GIB.to_string(),
            global_priority: DEFAULT_GLOBAL_PRIORITY.iter().map(|s| s.to_string()).collect(),
            field_priorities: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load_toml(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path).map_err(Error::from)?;
        let cfg: Config = toml::from_str(&raw)
            .map_err(|err| Error::config_invalid(err.to_string()).with_operation("config::load"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn max_text_length_words(&self) -> Option<usize> {
        crate::text::parse_max_text_length(&self.max_text_length)
    }

    pub fn chunk_size_setting(&self) -> AutoSized {
        parse_auto_sized(&self.chunk_size)
    }

    pub fn cpu_count_setting(&self) -> AutoSized {
        parse_auto_sized(&self.cpu_count)
    }

    /// `memory_limit = "ALL"`/`"AUTO"` means "80% of system RAM", resolved
    /// against the live machine rather than parsed as a number.
    pub fn memory_limit_setting(&self) -> AutoSized {
        parse_auto_sized(&self.memory_limit)
    }

    /// Validate every field that can make the run fatal at startup: unknown
    /// office, nonexistent input root, unsupported formats/languages.
    pub fn validate(&self) -> Result<()> {
        if !VALID_PATENT_OFFICES.contains(&self.patent_office.as_str()) {
            return Err(Error::config_invalid(format!(
                "unknown patent_office '{}', expected one of {:?}",
                self.patent_office, VALID_PATENT_OFFICES
            )));
        }
        if !self.vertical_origin_path.is_dir() {
            return Err(Error::config_invalid(format!(
                "vertical_origin_path '{}' is not a directory",
                self.vertical_origin_path.display()
            )));
        }
        if self.output_formats.is_empty() {
            return Err(Error::config_invalid("output_formats must not be empty"));
        }
        for fmt in &self.output_formats {
            if !VALID_OUTPUT_FORMATS.contains(&fmt.as_str()) {
                return Err(Error::config_invalid(format!(
                    "unknown output format '{fmt}', expected one of {VALID_OUTPUT_FORMATS:?}"
                )));
            }
        }
        validate_parse_lang(&self.parse_lang)?;
        if self.global_priority.is_empty() {
            return Err(Error::config_invalid("global_priority must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(Error::config_invalid("batch_size must be positive"));
        }
        Ok(())
    }
}

fn parse_auto_sized(raw: &str) -> AutoSized {
    if raw.eq_ignore_ascii_case("ALL") || raw.eq_ignore_ascii_case("AUTO") {
        AutoSized::Auto
    } else {
        raw.parse::<usize>().map(AutoSized::Fixed).unwrap_or(AutoSized::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_rejects_unknown_office() {
        let cfg = Config::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn auto_sized_parses_numbers_and_sentinels() {
        assert_eq!(parse_auto_sized("AUTO"), AutoSized::Auto);
        assert_eq!(parse_auto_sized("ALL"), AutoSized::Auto);
        assert_eq!(parse_auto_sized("128"), AutoSized::Fixed(128));
    }
}
