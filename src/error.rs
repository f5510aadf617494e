//! Error taxonomy for the two engines.
//!
//! "No matching rows" is never an error: filters return empty results and the
//! caller decides how to present it. Row-level problems are reported in the
//! row's own result slot. Only request-level failures surface as `Err`.

use thiserror::Error;

/// Failure to build the TF-IDF content index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("cannot build a content index over an empty corpus")]
    EmptyCorpus,
    #[error("empty vocabulary: every document is blank or contains only stop words")]
    EmptyVocabulary,
}

/// Request-level failure of the recommendation ranker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("content index unavailable: {0}")]
    Index(#[from] IndexError),
    #[error("content index covers {index_rows} rows but {reviews} reviews were supplied")]
    IndexMismatch { index_rows: usize, reviews: usize },
}

/// Per-row failure inside the sentiment fan-out. Siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row {row}: missing `text` field")]
    MissingText { row: usize },
}

/// Failure to construct the sentiment engine (fatal for the process or request).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sentiment lexicon: {0}")]
    Lexicon(String),
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
