//! Text normalisation helpers shared by the scorer and the prompt builders.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercases, collapses whitespace runs to a single space, and trims.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, " ").trim().to_string()
}

/// Returns the first `max_chars` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
