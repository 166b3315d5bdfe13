//! Word-count-based text truncation, shared by the fusion engine and every
//! output sink. `max_words = None` is the `"ALL"` / `0` sentinel from the
//! configuration surface: no truncation.

pub fn truncate_text(text: &str, max_words: Option<usize>) -> String {
    match max_words {
        None => text.to_string(),
        Some(n) => text
            .split_whitespace()
            .take(n)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Parse the configuration value for `max_text_length`: an integer, the
/// literal `"ALL"`, or `0` (both disable truncation).
pub fn parse_max_text_length(raw: &str) -> Option<usize> {
    if raw.eq_ignore_ascii_case("ALL") {
        return None;
    }
    match raw.parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_first_n_words() {
        assert_eq!(truncate_text("alpha beta gamma", Some(2)), "alpha beta");
    }

    #[test]
    fn no_truncation_when_all() {
        assert_eq!(truncate_text("alpha beta gamma", None), "alpha beta gamma");
    }

    #[test]
    fn truncation_is_idempotent() {
        let once = truncate_text("alpha beta gamma delta", Some(3));
        let twice = truncate_text(&once, Some(3));
        assert_eq!(once, twice);
    }

    #[test]
    fn parses_sentinel_values() {
        assert_eq!(parse_max_text_length("ALL"), None);
        assert_eq!(parse_max_text_length("0"), None);
        assert_eq!(parse_max_text_length("300"), Some(300));
    }
}
