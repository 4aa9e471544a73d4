//! String helpers shared by the report algorithms.

use once_cell::sync::Lazy;
use regex::Regex;

use super::literal::sequence_items;

/// Segment separator used for value matching, independent of row delimiters.
pub const MATCH_DELIMITER: char = '|';

/// Characters removed from values that are not list literals.
static LIST_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\[\]'"]+"#).unwrap());

/// Split `value` on `delimiter` into trimmed, non-empty tokens.
///
/// An empty delimiter yields the whole trimmed value as a single token.
pub fn split_values(value: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let trimmed = value.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text before the first `delimiter` occurrence, trimmed.
///
/// Values without the delimiter, and an empty delimiter, leave the value as is.
pub fn root_value(value: &str, delimiter: &str) -> String {
    if delimiter.is_empty() {
        return value.to_string();
    }
    match value.split_once(delimiter) {
        Some((root, _)) => root.trim().to_string(),
        None => value.to_string(),
    }
}

/// Collapse a list-like cell into a `", "`-joined string.
///
/// `"['A', 'B']"` becomes `"A, B"`. Values that are not list or tuple
/// literals have brackets and quotes stripped instead: `"foo[1]"` becomes
/// `"foo1"`.
pub fn clean_list_string(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(items) = sequence_items(trimmed) {
        let parts: Vec<&str> = items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect();
        return parts.join(", ");
    }
    LIST_PUNCTUATION.replace_all(trimmed, "").into_owned()
}

/// Whether `needle` is one of the `|`-separated segments of `value`.
///
/// Comparison is case-insensitive and ignores whitespace around segments. An
/// empty needle matches values that contain an empty segment, including the
/// empty string itself.
pub fn contains_segment(value: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    value
        .to_lowercase()
        .split(MATCH_DELIMITER)
        .any(|segment| segment.trim() == needle)
}

/// Parse a boolean-ish cell: `yes`/`true` (any case, trimmed) are true.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true")
    })
    .unwrap_or(false)
}

/// Format `count / total` as a percentage with two decimals.
pub fn format_percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 / total as f64 * 100.0)
}
