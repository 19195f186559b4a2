// src/text.rs

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("regex should parse"));
pub(crate) static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("regex should parse"));

/// Clean a raw cell value: drop BOM and replacement characters left behind by
/// lossy decoding of the source file, then trim surrounding whitespace.
///
/// Invalid byte sequences are repaired (removed) rather than rejected; the
/// source spreadsheets are known to carry encoding artifacts.
pub fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '\u{FEFF}' && *c != '\u{FFFD}')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a header cell into a lookup key: lowercase, strip quote and
/// geresh/gershayim variants plus question marks, fold punctuation to spaces,
/// collapse whitespace. The key is matched exactly against the header table;
/// there is no fuzzy matching.
pub fn header_key(raw: &str) -> String {
    let text = clean_text(raw);
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let folded: String = lowered
        .chars()
        .filter_map(|c| match c {
            '"' | '׳' | '״' | '\'' | '`' | '?' => None,
            ',' | ':' | ';' | '(' | ')' | '-' | '–' | '—' | '/' | '\\' => Some(' '),
            other => Some(other),
        })
        .collect();

    WHITESPACE.replace_all(&folded, " ").trim().to_string()
}

/// First run of digits in the value, as an integer. `None` when the value
/// holds no digits at all.
pub fn parse_int(raw: &str) -> Option<u32> {
    let text = clean_text(raw);
    DIGIT_RUN.find(&text).and_then(|m| m.as_str().parse().ok())
}

/// Slug used inside record UIDs: whitespace runs become hyphens, everything
/// outside alphanumerics (Hebrew included) and hyphens is dropped, lowercased.
/// Empty input yields `"na"` so the UID always has three segments.
pub fn safe_slug(raw: &str) -> String {
    let text = clean_text(raw);
    if text.is_empty() {
        return "na".to_string();
    }

    let hyphenated = WHITESPACE.replace_all(&text, "-");
    hyphenated
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_lowercase()
}
