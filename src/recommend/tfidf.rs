//! TF-IDF vector space over the candidate reviews.
//!
//! - tokens: `(?u)\b\w\w+\b` on lowercased text, English stop words removed
//! - idf: `ln((1 + n) / (1 + df)) + 1` (smoothed)
//! - rows: raw term counts × idf, L2-normalized
//!
//! Rows are L2-normalized, so cosine similarity is a sparse dot product.
//! Query terms outside the fitted vocabulary are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use super::stopwords::is_stop_word;
use crate::error::IndexError;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token regex"));

/// (term id, weight), sorted by term id.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf weights, returning the document-term rows too.
    pub fn fit_transform<S: AsRef<str>>(
        corpus: &[S],
    ) -> Result<(Self, Vec<SparseVector>), IndexError> {
        if corpus.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }
        let docs: Vec<Vec<String>> = corpus.iter().map(|d| analyze(d.as_ref())).collect();

        let terms: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for doc in &docs {
            let unique: BTreeSet<usize> = doc.iter().map(|t| vocabulary[t.as_str()]).collect();
            for id in unique {
                df[id] += 1;
            }
        }
        let n = docs.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        let matrix = docs.iter().map(|d| vectorizer.weigh(d)).collect();
        debug!(
            docs = docs.len(),
            terms = vectorizer.vocabulary.len(),
            "tfidf fitted"
        );
        Ok((vectorizer, matrix))
    }

    /// Project a new document into the fitted space.
    pub fn transform(&self, doc: &str) -> SparseVector {
        self.weigh(&analyze(doc))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for t in tokens {
            if let Some(&id) = self.vocabulary.get(t.as_str()) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        let mut v: SparseVector = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id]))
            .collect();
        let norm = v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in v.iter_mut() {
                *w /= norm;
            }
        }
        v
    }
}

/// Cosine similarity of two L2-normalized sparse vectors. Zero vectors → 0.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

fn analyze(doc: &str) -> Vec<String> {
    let lower = doc.to_lowercase();
    RE_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Fitted vectorizer plus the document-term matrix, one row per review.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
}

impl ContentIndex {
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Result<Self, IndexError> {
        let (vectorizer, matrix) = TfidfVectorizer::fit_transform(corpus)?;
        Ok(Self { vectorizer, matrix })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn row(&self, i: usize) -> Option<&SparseVector> {
        self.matrix.get(i)
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let q = self.vectorizer.transform(query);
        self.matrix.iter().map(|row| cosine(&q, row)).collect()
    }
}
