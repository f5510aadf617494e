// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod sentiment;
pub mod text;

// Aspect-based sentiment engine (extraction, aggregation, summary)
pub mod analyze;

// Content + metadata recommendation ranker (cuisine, TF-IDF, ranking)
pub mod recommend;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    AspectCategory, AspectMode, MalformedRows, SentimentContext, SentimentEngine, SentimentResult,
};
pub use crate::api::{router, AppState};
pub use crate::dataset::{Dataset, Review};
pub use crate::error::{EngineError, IndexError, RecommendError, RowError};
pub use crate::recommend::{
    ContentIndex, CuisineLabel, RankWeights, Recommendation, RecommendationCandidate, Recommender,
};
pub use crate::sentiment::{Lexicon, SentimentAnalyzer};
