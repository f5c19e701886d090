//! Keyword extraction: lowercase word tokens minus stopwords and noise words.
//!
//! Resume and job keyword sets are derived independently; the comparison keeps
//! job keywords only. Keywords that appear in the resume but not in the job
//! description are never surfaced.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// A set of filtered, lowercased tokens. Ordered so that set operations
/// produce lexicographically sorted output without an extra sort.
pub type KeywordSet = BTreeSet<String>;

/// Runs of word characters, numeric symbols (`½`, `²`) included.
static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\p{N}]+").expect("valid regex"));

/// Decimal digits only (`Nd`). Vulgar fractions and roman numerals are words.
static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}+$").expect("valid regex"));

/// Common English words plus job-posting noise ("experience", "role", "work").
const STOPWORD_LIST: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
    "has", "have", "he", "in", "is", "it", "its", "of", "on", "that", "the",
    "to", "was", "will", "with", "looking", "experience", "experienced",
    "this", "these", "those", "their", "our", "you", "your", "they",
    "we", "us", "such", "some", "also", "other", "all", "any", "each",
    "can", "could", "should", "would", "must", "may", "might",
    "been", "being", "had", "do", "does", "did", "about",
    "into", "through", "during", "before", "after", "above", "below",
    "up", "down", "out", "off", "over", "under", "again", "further",
    "then", "once", "here", "there", "when", "where", "why", "how",
    "both", "few", "more", "most", "same", "than", "too", "very",
    "able", "around", "based", "including", "etc", "using", "what", "who",
    "every", "everything", "work", "making", "role",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORD_LIST.iter().copied().collect());

/// Minimum token length (in characters) is this value plus one.
const MIN_TOKEN_CHARS: usize = 2;

/// Returns true if `token` is in the fixed stopword list.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Extracts the keyword set from raw text.
///
/// Tokens are word-character runs of the lowercased text, kept when they are
/// longer than two characters, not made only of decimal digits, and not
/// stopwords.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let lowered = text.to_lowercase();

    WORD_TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| !DIGITS_ONLY.is_match(token))
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Job keywords split by whether the resume covers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordComparison {
    /// job ∩ resume, sorted.
    pub skills_match: Vec<String>,
    /// job − resume, sorted.
    pub missing_skills: Vec<String>,
}

/// Compares two keyword sets. Resume-only keywords are dropped.
pub fn compare_keywords(resume: &KeywordSet, job: &KeywordSet) -> KeywordComparison {
    let (matched, missing): (Vec<&String>, Vec<&String>) =
        job.iter().partition(|kw| resume.contains(*kw));

    KeywordComparison {
        skills_match: matched.into_iter().cloned().collect(),
        missing_skills: missing.into_iter().cloned().collect(),
    }
}
