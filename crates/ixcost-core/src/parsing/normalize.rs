use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A word fragment ending in a hyphen, whitespace, then the continuation.
static WRAPPED_HYPHEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)-\s+(\w+)").unwrap());

/// Normalize PDF-derived text before pattern matching.
///
/// Steps:
/// 1. Line breaks become single spaces
/// 2. Whitespace runs collapse to one space
/// 3. Words split by line-wrap hyphenation are rejoined ("Inter- connection" -> "Interconnection")
/// 4. Leading/trailing whitespace is trimmed
pub fn normalize_text(raw: &str) -> String {
    let unwrapped = raw.replace(['\r', '\n'], " ");
    let collapsed = WHITESPACE_RUN.replace_all(&unwrapped, " ");
    let joined = WRAPPED_HYPHEN.replace_all(&collapsed, "${1}${2}");
    joined.trim().to_string()
}
