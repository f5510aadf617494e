//! Aspect taxonomy and the two extraction strategies.
//!
//! - `AspectMode::Chunk`: split text into phrase chunks (maximal runs of
//!   content words between function words) and emit one `(category, phrase)`
//!   pair per chunk per matching category.
//! - `AspectMode::Sentence`: per category, concatenate every sentence that
//!   mentions one of its keywords and score that blob as a whole.
//!
//! Keyword matching is case-insensitive substring containment in both modes.
//! Keyword lists overlap on purpose ("fresh", "friendly", ...), so one phrase
//! may land in several categories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::sentiment::SentimentAnalyzer;
use crate::text::split_sentences;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectCategory {
    FoodQuality,
    Service,
    Ambiance,
    Cleanliness,
    Price,
}

impl AspectCategory {
    pub fn label(self) -> &'static str {
        match self {
            AspectCategory::FoodQuality => "Food Quality",
            AspectCategory::Service => "Service",
            AspectCategory::Ambiance => "Ambiance",
            AspectCategory::Cleanliness => "Cleanliness",
            AspectCategory::Price => "Price",
        }
    }
}

impl fmt::Display for AspectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which extraction strategy the engine runs. Never mixed within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMode {
    #[default]
    Chunk,
    Sentence,
}

const FOOD_QUALITY: &[&str] = &[
    "food", "taste", "flavor", "dish", "meal", "delicious", "yummy", "fresh", "savor", "tasty",
    "flavorful", "spicy", "bland", "sweet", "salty", "bitter", "sour", "crispy", "juicy", "hearty",
    "appetizing", "gourmet", "rich", "succulent", "overcooked", "undercooked", "raw", "burnt",
    "mouthwatering", "greasy",
];

const SERVICE: &[&str] = &[
    "service", "staff", "waiter", "waitress", "attentive", "friendly", "slow", "helpful", "fast",
    "polite", "rude", "unprofessional", "professional", "efficient", "courteous", "wait time",
    "smiling", "assistance", "knowledgeable", "approachable", "accommodating", "disappointing",
    "welcoming", "supportive", "prompt", "unfriendly", "patient", "kind", "disinterested",
    "friendly",
];

const AMBIANCE: &[&str] = &[
    "ambiance", "atmosphere", "vibe", "decor", "music", "lighting", "environment", "comfort",
    "cozy", "warm", "inviting", "chilly", "modern", "classic", "elegant", "rustic", "lively",
    "calm", "romantic", "elegant", "charming", "relaxed", "chilly", "dark", "bright", "stylish",
    "minimal", "warmth", "cool", "friendly", "intimate", "space", "noise", "crowded", "quiet",
    "peaceful", "laid-back", "pleasant", "sophisticated",
];

const CLEANLINESS: &[&str] = &[
    "clean", "dirty", "hygiene", "neat", "messy", "orderly", "spotless", "immaculate", "tidy",
    "unsanitary", "disorganized", "cleanliness", "filthy", "sanitized", "disgusting", "stinky",
    "smelly", "fresh", "pristine", "scruffy", "dusty", "unhygienic", "cluttered", "messy",
    "sterile", "decent", "polished",
];

const PRICE: &[&str] = &[
    "price", "cost", "expensive", "cheap", "affordable", "value", "inexpensive", "overpriced",
    "reasonable", "pricy", "value-for-money", "budget", "luxurious", "high-end", "expensive",
    "costly", "discounted", "affordability", "bargain", "premium", "value", "reasonable",
    "low-cost", "high-price", "worth it", "cheap", "underpriced", "overcharged",
];

/// Static category → keyword configuration. Read-only once built.
#[derive(Debug, Clone)]
pub struct AspectTaxonomy {
    keywords: BTreeMap<AspectCategory, Vec<String>>,
}

impl Default for AspectTaxonomy {
    fn default() -> Self {
        let mut keywords = BTreeMap::new();
        for (cat, list) in [
            (AspectCategory::FoodQuality, FOOD_QUALITY),
            (AspectCategory::Service, SERVICE),
            (AspectCategory::Ambiance, AMBIANCE),
            (AspectCategory::Cleanliness, CLEANLINESS),
            (AspectCategory::Price, PRICE),
        ] {
            keywords.insert(cat, list.iter().map(|k| k.to_lowercase()).collect());
        }
        Self { keywords }
    }
}

impl AspectTaxonomy {
    /// Custom taxonomy; keywords are lowercased, order kept.
    pub fn from_keywords(keywords: BTreeMap<AspectCategory, Vec<String>>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|(c, ks)| (c, ks.into_iter().map(|k| k.to_lowercase()).collect()))
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self, category: AspectCategory) -> &[String] {
        self.keywords.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in enumeration order.
    pub fn categories(&self) -> impl Iterator<Item = AspectCategory> + '_ {
        self.keywords.keys().copied()
    }

    /// Does `text` (any case) contain one of the category's keywords?
    pub fn mentions(&self, category: AspectCategory, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords(category).iter().any(|k| lower.contains(k.as_str()))
    }

    /// Chunk mode: `(category, phrase)` for every chunk × matching category.
    pub fn extract(&self, text: &str) -> Vec<(AspectCategory, String)> {
        let mut aspects = Vec::new();
        for chunk in phrase_chunks(text) {
            for category in self.categories() {
                if self.mentions(category, &chunk) {
                    aspects.push((category, chunk.clone()));
                }
            }
        }
        aspects
    }

    /// Sentence mode: one blended score per mentioned category. Categories
    /// whose keywords appear in no sentence are absent.
    pub fn sentence_scores(
        &self,
        text: &str,
        analyzer: &SentimentAnalyzer,
    ) -> BTreeMap<AspectCategory, f64> {
        let sentences = split_sentences(text);
        let mut out = BTreeMap::new();
        for category in self.categories() {
            let relevant: Vec<&str> = sentences
                .iter()
                .copied()
                .filter(|s| self.mentions(category, s))
                .collect();
            if relevant.is_empty() {
                continue;
            }
            out.insert(category, analyzer.score(&relevant.join(" ")));
        }
        out
    }
}

/// Phrase chunks: maximal runs of tokens that are not function words.
/// Tokens keep inner punctuation ("laid-back") but lose surrounding marks.
pub fn phrase_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for raw in text.split_whitespace() {
        let tok = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let boundary_after = raw.ends_with([',', '.', ';', ':', '!', '?']);
        if tok.is_empty() || is_function_word(&tok.to_lowercase()) {
            flush(&mut current, &mut chunks);
            continue;
        }
        current.push(tok);
        if boundary_after {
            flush(&mut current, &mut chunks);
        }
    }
    flush(&mut current, &mut chunks);
    chunks
}

fn flush(current: &mut Vec<&str>, chunks: &mut Vec<String>) {
    if !current.is_empty() {
        chunks.push(current.join(" "));
        current.clear();
    }
}

fn is_function_word(w: &str) -> bool {
    matches!(
        w,
        "a" | "an"
            | "the"
            | "this"
            | "that"
            | "these"
            | "those"
            | "my"
            | "our"
            | "your"
            | "their"
            | "his"
            | "her"
            | "its"
            | "i"
            | "we"
            | "you"
            | "he"
            | "she"
            | "it"
            | "they"
            | "me"
            | "us"
            | "them"
            | "and"
            | "or"
            | "but"
            | "nor"
            | "so"
            | "yet"
            | "because"
            | "if"
            | "then"
            | "than"
            | "of"
            | "in"
            | "on"
            | "at"
            | "to"
            | "for"
            | "with"
            | "from"
            | "by"
            | "about"
            | "into"
            | "over"
            | "after"
            | "before"
            | "is"
            | "was"
            | "are"
            | "were"
            | "be"
            | "been"
            | "being"
            | "am"
            | "has"
            | "have"
            | "had"
            | "do"
            | "does"
            | "did"
            | "will"
            | "would"
            | "could"
            | "should"
            | "can"
            | "which"
            | "who"
            | "what"
            | "when"
            | "where"
    )
}
