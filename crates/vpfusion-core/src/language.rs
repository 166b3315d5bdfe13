//! Multi-language pruning.

use std::collections::{BTreeSet, HashMap};

use vpfusion_error::{Error, Result};

use crate::constants::{LANGUAGE_FILTERED_TAGS, SUPPORTED_LANGUAGES};
use crate::xml::XmlNode;

/// What `parse_lang` resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageFilter {
    /// No filtering.
    All,
    /// Keep elements matching a single language, derived per-document.
    Primary,
    /// Keep the first of these languages present in the document.
    Preferred(Vec<String>),
}

pub fn validate_parse_lang(raw: &str) -> Result<()> {
    parse_lang_filter(raw).map(|_| ())
}

pub fn parse_lang_filter(raw: &str) -> Result<LanguageFilter> {
    if raw.eq_ignore_ascii_case("ALL") {
        return Ok(LanguageFilter::All);
    }
    if raw.eq_ignore_ascii_case("PRIMARY") {
        return Ok(LanguageFilter::Primary);
    }
    let codes: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if codes.is_empty() {
        return Err(Error::config_invalid(format!("invalid parse_lang '{raw}'")));
    }
    for code in &codes {
        if !SUPPORTED_LANGUAGES.contains(&code.as_str()) {
            return Err(Error::config_invalid(format!(
                "unsupported language code '{code}' in parse_lang"
            )));
        }
    }
    Ok(LanguageFilter::Preferred(codes))
}

/// Effective language of `node`: its own `lang` attribute, else the nearest
/// ancestor's. `ancestor_lang` is the resolved language of the element's
/// parent chain (the caller threads it down while walking).
fn effective_lang<'a>(node: &'a XmlNode, ancestor_lang: Option<&'a str>) -> Option<&'a str> {
    node.get_attr("lang").or(ancestor_lang)
}

/// Determine the document's primary language: root `lang` if in the
/// priority list, else the first priority-list language present anywhere
/// among descendants (not the most frequent one), else `EN`.
pub fn determine_primary_language(root: &XmlNode, priority: &[String]) -> String {
    if let Some(lang) = root.get_attr("lang") {
        let upper = lang.to_uppercase();
        if priority.iter().any(|p| p.eq_ignore_ascii_case(&upper)) {
            return upper;
        }
    }

    let mut present: HashMap<String, ()> = HashMap::new();
    root.visit_descendants(&mut |node| {
        if let Some(lang) = node.get_attr("lang") {
            present.insert(lang.to_uppercase(), ());
        }
    });

    if let Some(lang) = priority.iter().find(|p| present.contains_key(p.as_str())) {
        return lang.clone();
    }

    "EN".to_string()
}

/// Apply the language filter in place: for each tag in
/// `LANGUAGE_FILTERED_TAGS`, drop direct siblings whose effective language
/// doesn't match the resolved keep-set.
pub fn apply_language_filter(root: &mut XmlNode, filter: &LanguageFilter, language_priority: &[String]) {
    let keep: Vec<String> = match filter {
        LanguageFilter::All => return,
        LanguageFilter::Primary => vec![determine_primary_language(root, language_priority)],
        LanguageFilter::Preferred(codes) => resolve_preferred(root, codes, language_priority),
    };

    filter_recursive(root, None, &keep);
}

fn resolve_preferred(root: &XmlNode, codes: &[String], language_priority: &[String]) -> Vec<String> {
    let mut present: BTreeSet<String> = BTreeSet::new();
    root.visit_descendants(&mut |node| {
        if let Some(lang) = node.get_attr("lang") {
            present.insert(lang.to_uppercase());
        }
    });
    if let Some(lang) = root.get_attr("lang") {
        present.insert(lang.to_uppercase());
    }

    if let Some(first) = codes.iter().find(|c| present.contains(c.as_str())) {
        return vec![first.clone()];
    }
    if let Some(first) = language_priority.iter().find(|c| present.contains(c.as_str())) {
        return vec![first.clone()];
    }
    present.into_iter().next().into_iter().collect()
}

fn filter_recursive(node: &mut XmlNode, ancestor_lang: Option<&str>, keep: &[String]) {
    let own_lang = effective_lang(node, ancestor_lang).map(|s| s.to_string());

    node.children.retain(|child| {
        if LANGUAGE_FILTERED_TAGS.contains(&child.tag.as_str()) {
            let lang = effective_lang(child, own_lang.as_deref());
            match lang {
                Some(lang) => keep.iter().any(|k| k.eq_ignore_ascii_case(lang)),
                None => true,
            }
        } else {
            true
        }
    });

    for child in &mut node.children {
        let lang = effective_lang(child, own_lang.as_deref()).map(|s| s.to_string());
        filter_recursive(child, lang.as_deref(), keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn keeps_all_languages_when_all() {
        let mut tree =
            parse_str(r#"<patent-document><abstract lang="EN"/><abstract lang="FR"/></patent-document>"#)
                .unwrap();
        apply_language_filter(&mut tree, &LanguageFilter::All, &[]);
        assert_eq!(tree.children_by_tag("abstract").count(), 2);
    }

    #[test]
    fn preferred_filter_keeps_only_requested_language() {
        let mut tree =
            parse_str(r#"<patent-document><abstract lang="EN"/><abstract lang="FR"/></patent-document>"#)
                .unwrap();
        let filter = parse_lang_filter("EN").unwrap();
        apply_language_filter(&mut tree, &filter, &[]);
        let remaining: Vec<_> = tree.children_by_tag("abstract").collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get_attr("lang"), Some("EN"));
    }

    #[test]
    fn primary_filter_uses_root_lang_when_in_priority() {
        let mut tree = parse_str(
            r#"<patent-document lang="EN"><abstract lang="EN"/><abstract lang="FR"/></patent-document>"#,
        )
        .unwrap();
        let priority = vec!["EN".to_string(), "FR".to_string()];
        apply_language_filter(&mut tree, &LanguageFilter::Primary, &priority);
        let remaining: Vec<_> = tree.children_by_tag("abstract").collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get_attr("lang"), Some("EN"));
    }

    #[test]
    fn rejects_unsupported_language_code() {
        assert!(parse_lang_filter("XX").is_err());
    }

    #[test]
    fn primary_language_picks_first_priority_hit_not_most_frequent() {
        let mut tree = parse_str(
            r#"<patent-document><abstract lang="FR"/><abstract lang="FR"/><abstract lang="EN"/></patent-document>"#,
        )
        .unwrap();
        let priority = vec!["EN".to_string(), "FR".to_string()];
        apply_language_filter(&mut tree, &LanguageFilter::Primary, &priority);
        let remaining: Vec<_> = tree.children_by_tag("abstract").collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get_attr("lang"), Some("EN"));
    }
}
