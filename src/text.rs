//! Text normalization shared by the sentiment and recommendation pipelines.
//!
//! `normalize` lowercases, drops every character that is neither a word
//! character nor whitespace, then drops digit runs. Total and pure: the empty
//! string maps to the empty string.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("punct regex"));
static RE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digits regex"));
static RE_SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(\s+|$)").expect("sentence regex"));

/// Lowercase, strip punctuation, strip digits.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_punct = RE_PUNCT.replace_all(&lower, "");
    RE_DIGITS.replace_all(&no_punct, "").into_owned()
}

/// Split raw text into sentences on `.`, `!` and `?` runs.
/// Empty fragments are dropped; terminal punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in RE_SENTENCE_END.find_iter(text) {
        let piece = text[start..m.end()].trim();
        if !piece.is_empty() {
            out.push(piece);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}
