//! Keyword-based cuisine inference. First cuisine (in enumeration order) with a
//! substring hit wins; `Other` otherwise. Matching is on the text as given, so
//! callers decide whether to normalize first.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuisineLabel {
    Italian,
    Chinese,
    Japanese,
    Mexican,
    Indian,
    American,
    Other,
}

impl CuisineLabel {
    const ORDERED: [(CuisineLabel, &'static [&'static str]); 6] = [
        (CuisineLabel::Italian, &["pasta", "pizza", "risotto"]),
        (CuisineLabel::Chinese, &["noodles", "dumplings", "dim sum"]),
        (CuisineLabel::Japanese, &["sushi", "ramen", "tempura"]),
        (CuisineLabel::Mexican, &["tacos", "burrito", "quesadilla"]),
        (CuisineLabel::Indian, &["curry", "naan", "masala"]),
        (CuisineLabel::American, &["burger", "steak", "fries"]),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CuisineLabel::Italian => "italian",
            CuisineLabel::Chinese => "chinese",
            CuisineLabel::Japanese => "japanese",
            CuisineLabel::Mexican => "mexican",
            CuisineLabel::Indian => "indian",
            CuisineLabel::American => "american",
            CuisineLabel::Other => "other",
        }
    }
}

impl fmt::Display for CuisineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn infer_cuisine(text: &str) -> CuisineLabel {
    CuisineLabel::ORDERED
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(label, _)| *label)
        .unwrap_or(CuisineLabel::Other)
}
