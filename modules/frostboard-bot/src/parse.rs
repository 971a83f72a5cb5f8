//! Line-level parsers for OCR output.
//!
//! Pure functions. Malformed input is never an error, just "no match" —
//! OCR noise is the normal case, not the exception.

use std::sync::OnceLock;

use regex::Regex;

/// Extract a non-negative score from one text line.
///
/// Strips grouping marks and any other non-digit characters, then parses
/// whatever digits remain, so `Score 12,345` and `12.345` both read as
/// 12345. Returns `None` when the line has no digits at all (or the
/// digit run overflows u64, which no real score does).
pub fn parse_score(line: &str) -> Option<u64> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn tag_re() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"\[[^\[\]]+\]").expect("valid tag regex"))
}

/// Recognize a name line: one that carries a bracket-delimited clan tag.
///
/// Returns the tag verbatim (brackets included) and the text after it,
/// trimmed, as the raw player name. Lines without a tag token, or with
/// nothing readable after the tag, are not name lines.
pub fn parse_tag_and_name(line: &str) -> Option<(String, String)> {
    let m = tag_re().find(line)?;
    let tag = m.as_str().to_string();
    let name = line[m.end()..].trim();
    if name.is_empty() {
        return None;
    }
    Some((tag, name.to_string()))
}
