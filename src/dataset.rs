//! Review rows and the in-memory dataset supplied to both engines.
//!
//! The dataset is an arena: rows are addressed by their position and never
//! reordered while a request is in flight. Loading supports a JSON array
//! (`.json`) or JSON lines (`.jsonl`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use strsim::normalized_levenshtein;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Raw review body. Missing or `null` is tolerated (see `MalformedRows`).
    #[serde(default)]
    pub text: Option<String>,
    pub name: String,
    pub city: String,
    pub address: String,
    pub stars_y: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Review {
    /// Review body, coercing a missing value to "".
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    reviews: Vec<Review>,
}

impl Dataset {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self { reviews }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dataset from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let reviews = if ext == "jsonl" {
            parse_jsonl(&content)?
        } else {
            serde_json::from_str::<Vec<Review>>(&content)
                .with_context(|| format!("parsing dataset {}", path.display()))?
        };
        info!(rows = reviews.len(), path = %path.display(), "dataset loaded");
        Ok(Self { reviews })
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// All rows of one restaurant (exact name match). Empty when unknown.
    pub fn for_restaurant(&self, name: &str) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect()
    }

    /// Distinct restaurant names, sorted.
    pub fn restaurant_names(&self) -> Vec<String> {
        self.reviews
            .iter()
            .map(|r| r.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Up to `limit` known names closest to `query` (case-insensitive edit similarity).
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let q = query.trim().to_lowercase();
        let mut scored: Vec<(f64, String)> = self
            .restaurant_names()
            .into_iter()
            .map(|n| (normalized_levenshtein(&q, &n.to_lowercase()), n))
            .filter(|(sim, _)| *sim >= 0.5)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().take(limit).map(|(_, n)| n).collect()
    }
}

fn parse_jsonl(content: &str) -> Result<Vec<Review>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            serde_json::from_str::<Review>(l).with_context(|| format!("dataset line {}", i + 1))
        })
        .collect()
}
