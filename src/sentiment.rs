//! Lexicon sentiment scorer (valence-aware, rule-based compound polarity).
//!
//! Each token found in the lexicon contributes its mean valence, adjusted by
//! the tokens before it: boosters/dampeners, ALL-CAPS emphasis, negation in a
//! three-token window and the contrastive "but". The summed valence is squashed
//! into [-1, 1] with `x / sqrt(x² + 15)`.
//!
//! The lexicon is loaded once and shared read-only; `SentimentAnalyzer` is a
//! cheap `Clone` over an `Arc<Lexicon>`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::EngineError;

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

/// word → mean valence in [-4, 4]. Keys are lowercase.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valence: HashMap<String, f64>,
}

impl Lexicon {
    /// The VADER lexicon compiled into the binary.
    pub fn embedded() -> Result<Self, EngineError> {
        Self::from_vader_str(include_str!("../vader_lexicon.txt"))
    }

    /// JSON object `{ "word": valence, ... }`.
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let map: HashMap<String, f64> =
            serde_json::from_str(raw).map_err(|e| EngineError::Lexicon(e.to_string()))?;
        Ok(Self::from_map(map))
    }

    /// VADER text format: `word<TAB>mean<TAB>std<TAB>[ratings]`, one entry per line.
    pub fn from_vader_str(raw: &str) -> Result<Self, EngineError> {
        let mut map = HashMap::new();
        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut cols = line.split('\t');
            let (Some(word), Some(mean)) = (cols.next(), cols.next()) else {
                return Err(EngineError::Lexicon(format!(
                    "line {}: expected `word<TAB>mean`",
                    lineno + 1
                )));
            };
            let mean: f64 = mean.trim().parse().map_err(|_| {
                EngineError::Lexicon(format!("line {}: bad valence `{mean}`", lineno + 1))
            })?;
            map.insert(word.to_string(), mean);
        }
        Ok(Self::from_map(map))
    }

    /// Load from disk; `.json` is parsed as JSON, anything else as VADER text.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| EngineError::Lexicon(format!("reading {}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_vader_str(&raw)
        }
    }

    fn from_map(map: HashMap<String, f64>) -> Self {
        let valence = map
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self { valence }
    }

    #[inline]
    pub fn get(&self, word: &str) -> Option<f64> {
        self.valence.get(word).copied()
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.valence.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.valence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valence.is_empty()
    }
}

/// Full polarity breakdown. `compound` is the headline score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound polarity in [-1, 1]. Empty or sentiment-free text scores 0.
    pub fn score(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }

    /// Score every whitespace token on its own, keeping only non-zero ones.
    pub fn word_sentiments(&self, text: &str) -> Vec<(String, f64)> {
        text.split_whitespace()
            .filter_map(|w| {
                let s = self.score(w);
                (s != 0.0).then(|| (w.to_string(), s))
            })
            .collect()
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let words = words_and_emoticons(text);
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = allcap_differential(&words);

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let item = lower[i].as_str();
            let kind_of = item == "kind" && lower.get(i + 1).is_some_and(|n| n == "of");
            if kind_of || booster(item).is_some() {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence_at(&words, &lower, i, cap_diff));
        }

        but_check(&lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence_at(&self, words: &[&str], lower: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(base) = self.lexicon.get(&lower[i]) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before another sentiment word acts as a negator, not a word.
        if lower[i] == "no" && lower.get(i + 1).is_some_and(|n| self.lexicon.contains(n)) {
            valence = 0.0;
        }
        if (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if is_upper(words[i]) && cap_diff {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start_i in 0..3 {
            if i > start_i && !self.lexicon.contains(&lower[i - (start_i + 1)]) {
                let mut s = scalar_inc_dec(words[i - (start_i + 1)], valence, cap_diff);
                if start_i == 1 && s != 0.0 {
                    s *= 0.95;
                }
                if start_i == 2 && s != 0.0 {
                    s *= 0.9;
                }
                valence += s;
                valence = negation_check(valence, lower, start_i, i);
            }
        }

        least_check(valence, lower, i, &self.lexicon)
    }
}

/// Whitespace tokens with surrounding punctuation stripped (unless that would
/// leave two characters or fewer, which keeps emoticons intact). Single
/// characters are dropped.
fn words_and_emoticons(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|tok| {
            let stripped = tok.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                tok
            } else {
                stripped
            }
        })
        .filter(|w| w.chars().count() > 1)
        .collect()
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL-CAPS.
fn allcap_differential(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_upper(w)).count();
    caps > 0 && caps < words.len()
}

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "fricking" | "frickin"
        | "frigging" | "friggin" | "fully" | "fucking" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most"
        | "particularly" | "purely" | "quite" | "really" | "remarkably" | "so"
        | "substantially" | "thoroughly" | "totally" | "tremendously" | "uber"
        | "unbelievably" | "unusually" | "utterly" | "very" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "kinda" | "kindof" | "kind-of" | "less" | "little"
        | "marginally" | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat"
        | "sorta" | "sortof" | "sort-of" => Some(B_DECR),
        _ => None,
    }
}

fn is_negator(word: &str) -> bool {
    matches!(
        word,
        "aint"
            | "arent"
            | "cannot"
            | "cant"
            | "couldnt"
            | "darent"
            | "didnt"
            | "doesnt"
            | "dont"
            | "hadnt"
            | "hasnt"
            | "havent"
            | "isnt"
            | "mightnt"
            | "mustnt"
            | "neither"
            | "neednt"
            | "never"
            | "none"
            | "nope"
            | "nor"
            | "not"
            | "nothing"
            | "nowhere"
            | "oughtnt"
            | "shant"
            | "shouldnt"
            | "uhuh"
            | "uh-uh"
            | "wasnt"
            | "werent"
            | "without"
            | "wont"
            | "wouldnt"
            | "rarely"
            | "seldom"
            | "despite"
    ) || word.contains("n't")
}

fn scalar_inc_dec(word: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(&word.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_upper(word) && cap_diff {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn negation_check(valence: f64, lower: &[String], start_i: usize, i: usize) -> f64 {
    let w = |k: usize| lower[i - k].as_str();
    match start_i {
        0 if is_negator(w(1)) => valence * N_SCALAR,
        1 if w(2) == "never" && matches!(w(1), "so" | "this") => valence * 1.25,
        1 if w(2) == "without" && w(1) == "doubt" => valence,
        1 if is_negator(w(2)) => valence * N_SCALAR,
        2 if w(3) == "never"
            && (matches!(w(2), "so" | "this") || matches!(w(1), "so" | "this")) =>
        {
            valence * 1.25
        }
        2 if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") => valence,
        2 if is_negator(w(3)) => valence * N_SCALAR,
        _ => valence,
    }
}

fn least_check(valence: f64, lower: &[String], i: usize, lexicon: &Lexicon) -> f64 {
    if i > 1 && !lexicon.contains(&lower[i - 1]) && lower[i - 1] == "least" {
        if lower[i - 2] != "at" && lower[i - 2] != "very" {
            return valence * N_SCALAR;
        }
    } else if i > 0 && !lexicon.contains(&lower[i - 1]) && lower[i - 1] == "least" {
        return valence * N_SCALAR;
    }
    valence
}

/// Contrastive conjunction: dampen what precedes the first "but", amplify what follows.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (si, s) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *s *= 0.5;
        } else if si > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    ep + qm
}

fn normalize_score(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize_score(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
