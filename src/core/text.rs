//! Text normalization shared by the indexer.
//!
//! Turns markdown-ish artifact text into a single line of plain text
//! suitable for substring search.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum characters of content stored per index entry
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Characters removed wherever they occur (heading, emphasis and code markers)
const MARKUP_CHARS: &[char] = &['#', '*', '`'];

fn link_regex() -> &'static Regex {
    static LINK_RE: OnceLock<Regex> = OnceLock::new();
    LINK_RE.get_or_init(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("valid regex"))
}

fn whitespace_regex() -> &'static Regex {
    static WS_RE: OnceLock<Regex> = OnceLock::new();
    WS_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Strip markup and collapse whitespace.
///
/// Removes `#`, `*` and backticks, rewrites `[label](target)` to `label`,
/// collapses whitespace runs to one space and trims the result. Applying
/// it to its own output returns the same string.
pub fn strip_markup(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect();
    let mut result = whitespace_regex().replace_all(&stripped, " ").into_owned();

    // Nested brackets can leave a fresh link behind after one pass
    loop {
        let rewritten = link_regex().replace_all(&result, "$1");
        if rewritten == result {
            break;
        }
        result = rewritten.into_owned();
    }

    whitespace_regex()
        .replace_all(&result, " ")
        .trim()
        .to_string()
}

/// Cut text to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Full index cleanup: strip markup, then truncate.
pub fn clean_for_index(text: &str, max_chars: usize) -> String {
    truncate_chars(&strip_markup(text), max_chars).to_string()
}
