// src/analyze/mod.rs
//! Sentiment analysis engine: whole-review polarity plus per-aspect scores.
//!
//! Per row:
//! 1) optionally normalize the text
//! 2) compound polarity of the whole review
//! 3) aspect scores, either chunk extraction + keyword aggregation or
//!    sentence-mode blending (chosen by `AspectMode`)
//!
//! Rows are independent. The batch fans out over a fixed-size rayon pool and
//! is collected back by index, so output order always equals input order.

pub mod aspects;
pub mod scoring;
pub mod summary;

use metrics::{counter, histogram};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::dataset::Review;
use crate::error::{EngineError, RowError};
use crate::sentiment::SentimentAnalyzer;
use crate::text::normalize;

pub use aspects::{AspectCategory, AspectMode, AspectTaxonomy};
pub use scoring::aggregate;
pub use summary::{summarize, RestaurantSummary};

pub const DEFAULT_WORKERS: usize = 4;

/// What to do with a row whose `text` is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRows {
    /// Treat missing text as "" (row still yields a result).
    #[default]
    Coerce,
    /// Report the row as failed in its own slot.
    Report,
}

/// Per-review output. `aspect_sentiments` only holds categories that were
/// actually scored; an absent category is not the same as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub row: usize,
    pub sentiment_score: f64,
    pub aspect_sentiments: BTreeMap<AspectCategory, f64>,
}

pub type RowResult = Result<SentimentResult, RowError>;

/// Immutable inputs shared by every row: lexicon, taxonomy and policy.
#[derive(Debug, Clone)]
pub struct SentimentContext {
    pub analyzer: SentimentAnalyzer,
    pub taxonomy: AspectTaxonomy,
    pub mode: AspectMode,
    pub normalize: bool,
    pub malformed_rows: MalformedRows,
}

impl SentimentContext {
    pub fn new(analyzer: SentimentAnalyzer) -> Self {
        Self {
            analyzer,
            taxonomy: AspectTaxonomy::default(),
            mode: AspectMode::default(),
            normalize: true,
            malformed_rows: MalformedRows::default(),
        }
    }

    pub fn with_mode(mut self, mode: AspectMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_malformed_rows(mut self, policy: MalformedRows) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// Score a single review. Pure given the context.
    pub fn process(&self, row: usize, review: &Review) -> RowResult {
        let raw = match (&review.text, self.malformed_rows) {
            (Some(t), _) => t.as_str(),
            (None, MalformedRows::Coerce) => "",
            (None, MalformedRows::Report) => return Err(RowError::MissingText { row }),
        };
        let prepared: Cow<'_, str> = if self.normalize {
            Cow::Owned(normalize(raw))
        } else {
            Cow::Borrowed(raw)
        };

        let sentiment_score = self.analyzer.score(&prepared);
        let aspect_sentiments = match self.mode {
            AspectMode::Chunk => {
                let found = self.taxonomy.extract(&prepared);
                let words = self.analyzer.word_sentiments(&prepared);
                aggregate(&self.taxonomy, &found, &words)
            }
            // sentence boundaries need the punctuation that normalization removes
            AspectMode::Sentence => self.taxonomy.sentence_scores(raw, &self.analyzer),
        };

        debug!(row, sentiment_score, aspects = aspect_sentiments.len(), "review scored");
        Ok(SentimentResult {
            row,
            sentiment_score,
            aspect_sentiments,
        })
    }
}

pub struct SentimentEngine {
    ctx: SentimentContext,
    pool: ThreadPool,
    workers: usize,
}

impl SentimentEngine {
    pub fn new(ctx: SentimentContext, workers: usize) -> Result<Self, EngineError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sentiment-{i}"))
            .build()?;
        Ok(Self { ctx, pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// One result per input row, in input order. Empty input → empty output.
    pub fn analyze(&self, reviews: &[Review]) -> Vec<RowResult> {
        if reviews.is_empty() {
            return Vec::new();
        }
        let started = Instant::now();
        let ctx = &self.ctx;
        let results: Vec<RowResult> = self.pool.install(|| {
            reviews
                .par_iter()
                .enumerate()
                .map(|(row, review)| ctx.process(row, review))
                .collect()
        });

        let failed = results.iter().filter(|r| r.is_err()).count();
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            warn!(error = %err, "row skipped");
        }
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        counter!("taste_reviews_analyzed_total").increment(reviews.len() as u64);
        counter!("taste_row_failures_total").increment(failed as u64);
        histogram!("taste_analyze_ms").record(elapsed_ms);
        info!(
            rows = reviews.len(),
            failed,
            mode = ?ctx.mode,
            elapsed_ms,
            "sentiment batch analyzed"
        );
        results
    }
}
