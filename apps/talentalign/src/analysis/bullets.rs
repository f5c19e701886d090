//! Bullet parsing: recovers a short ordered list of statements from LLM prose.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of statements kept from one LLM response.
pub const MAX_BULLETS: usize = 5;

/// A bullet line must be longer than this after its marker is stripped.
const MIN_BULLET_CHARS: usize = 10;

/// A fallback sentence must be longer than this.
const MIN_SENTENCE_CHARS: usize = 20;

/// Digit, dash, bullet glyph or asterisk run, optional `.`/`)`/`:`, then whitespace.
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\-•*]+[.):]?\s+").expect("valid regex"));

/// Which path produced the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedBullets {
    /// At least one marked line was found.
    Bulleted(Vec<String>),
    /// No markers; the text was split into sentences instead.
    FellBackToSentences(Vec<String>),
}

impl ParsedBullets {
    pub fn items(&self) -> &[String] {
        match self {
            ParsedBullets::Bulleted(items) | ParsedBullets::FellBackToSentences(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<String> {
        match self {
            ParsedBullets::Bulleted(items) | ParsedBullets::FellBackToSentences(items) => items,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedBullets::FellBackToSentences(_))
    }
}

/// Parses an LLM response into at most `MAX_BULLETS` clean statements,
/// first-encountered order. Never fails; empty input gives an empty list.
pub fn parse_bullets(text: &str) -> ParsedBullets {
    let bullets: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let marker = BULLET_MARKER.find(line)?;
            let cleaned = line[marker.end()..].trim();
            (cleaned.chars().count() > MIN_BULLET_CHARS).then(|| cleaned.to_string())
        })
        .take(MAX_BULLETS)
        .collect();

    if !bullets.is_empty() {
        return ParsedBullets::Bulleted(bullets);
    }

    let sentences = text
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .take(MAX_BULLETS)
        .collect();

    ParsedBullets::FellBackToSentences(sentences)
}
