//! Restaurant recommendation ranker.
//!
//! Score per row = `location·[city matches] + cuisine·[cuisine matches] + quality·stars/5`
//! with non-negative weights summing to 1, so scores stay in [0, 1]. Content
//! similarity (TF-IDF cosine between the query and the row's review) only
//! breaks ties. Sorting is stable: full ties keep dataset order.
//!
//! Candidates carry their row id next to their scores, so a similarity can
//! never drift onto the wrong row.

pub mod cuisine;
pub mod stopwords;
pub mod tfidf;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::Review;
use crate::error::RecommendError;
use crate::text::normalize;

pub use cuisine::{infer_cuisine, CuisineLabel};
pub use tfidf::ContentIndex;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub location: f64,
    pub cuisine: f64,
    pub quality: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            location: 0.55,
            cuisine: 0.25,
            quality: 0.20,
        }
    }
}

impl RankWeights {
    /// Non-negative, finite, summing to 1 (±1e-6).
    pub fn is_valid(&self) -> bool {
        let ws = [self.location, self.cuisine, self.quality];
        ws.iter().all(|w| w.is_finite() && *w >= 0.0) && (ws.iter().sum::<f64>() - 1.0).abs() < 1e-6
    }
}

/// Ranking-time association of a row with its scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendationCandidate {
    pub row: usize,
    pub weighted_score: f64,
    pub content_similarity: f64,
}

/// One ranked restaurant as handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rank: usize,
    pub restaurant: String,
    pub city: String,
    pub address: String,
    pub stars: f64,
    pub cuisine: CuisineLabel,
    pub matched_review: String,
    pub score: f64,
    pub similarity: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    weights: RankWeights,
    cuisine_from_raw_query: bool,
}

impl Recommender {
    /// Falls back to default weights when `weights` is not a convex combination.
    pub fn new(weights: RankWeights, cuisine_from_raw_query: bool) -> Self {
        let weights = if weights.is_valid() {
            weights
        } else {
            warn!(?weights, "rank weights must be non-negative and sum to 1; using defaults");
            RankWeights::default()
        };
        Self {
            weights,
            cuisine_from_raw_query,
        }
    }

    pub fn weights(&self) -> RankWeights {
        self.weights
    }

    /// Build the content index for `reviews` (normalized review text per row).
    pub fn build_index(reviews: &[Review]) -> Result<ContentIndex, RecommendError> {
        let corpus: Vec<String> = reviews.iter().map(|r| normalize(r.text_or_empty())).collect();
        ContentIndex::build(&corpus).map_err(|e| {
            counter!("taste_index_build_failures_total").increment(1);
            warn!(error = %e, rows = reviews.len(), "content index build failed");
            RecommendError::from(e)
        })
    }

    /// Rebuild the index for this request, then rank.
    pub fn recommend(
        &self,
        reviews: &[Review],
        user_text: &str,
        user_city: &str,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }
        let index = Self::build_index(reviews)?;
        self.rank(reviews, user_text, user_city, &index, top_n)
    }

    /// Rank every row against the query using a prebuilt index aligned to `reviews`.
    pub fn rank(
        &self,
        reviews: &[Review],
        user_text: &str,
        user_city: &str,
        index: &ContentIndex,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        counter!("taste_recommend_requests_total").increment(1);
        if reviews.is_empty() {
            return Ok(Vec::new());
        }
        if index.rows() != reviews.len() {
            return Err(RecommendError::IndexMismatch {
                index_rows: index.rows(),
                reviews: reviews.len(),
            });
        }

        let cleaned = normalize(user_text);
        let user_cuisine = if self.cuisine_from_raw_query {
            infer_cuisine(user_text)
        } else {
            infer_cuisine(&cleaned)
        };
        let similarities = index.similarities(&cleaned);

        let cuisines: Vec<CuisineLabel> = reviews
            .iter()
            .map(|r| infer_cuisine(&normalize(r.text_or_empty())))
            .collect();
        let candidates =
            self.score_candidates(reviews, &cuisines, &similarities, user_cuisine, user_city)?;

        let out: Vec<Recommendation> = candidates
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(pos, c)| {
                let r = &reviews[c.row];
                Recommendation {
                    rank: pos + 1,
                    restaurant: r.name.clone(),
                    city: r.city.clone(),
                    address: r.address.clone(),
                    stars: r.stars_y,
                    cuisine: cuisines[c.row],
                    matched_review: r.text_or_empty().to_string(),
                    score: c.weighted_score,
                    similarity: c.content_similarity,
                    latitude: r.latitude,
                    longitude: r.longitude,
                }
            })
            .collect();

        info!(
            rows = reviews.len(),
            returned = out.len(),
            cuisine = %user_cuisine,
            "recommendations ranked"
        );
        Ok(out)
    }

    /// All candidates, sorted by (weighted score, similarity) descending.
    /// `cuisines` and `similarities` must be row-aligned with `reviews`.
    fn score_candidates(
        &self,
        reviews: &[Review],
        cuisines: &[CuisineLabel],
        similarities: &[f64],
        user_cuisine: CuisineLabel,
        user_city: &str,
    ) -> Result<Vec<RecommendationCandidate>, RecommendError> {
        let aligned = cuisines.len().min(similarities.len());
        if aligned != reviews.len() {
            return Err(RecommendError::IndexMismatch {
                index_rows: aligned,
                reviews: reviews.len(),
            });
        }
        let city = user_city.to_lowercase();
        let w = self.weights;
        let mut candidates: Vec<RecommendationCandidate> = reviews
            .iter()
            .enumerate()
            .map(|(row, r)| {
                let location = if r.city.to_lowercase() == city { 1.0 } else { 0.0 };
                let cuisine = if cuisines[row] == user_cuisine { 1.0 } else { 0.0 };
                let quality = if r.stars_y.is_finite() {
                    (r.stars_y / 5.0).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                RecommendationCandidate {
                    row,
                    weighted_score: w.location * location + w.cuisine * cuisine + w.quality * quality,
                    content_similarity: similarities[row],
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.weighted_score
                .total_cmp(&a.weighted_score)
                .then_with(|| b.content_similarity.total_cmp(&a.content_similarity))
        });
        Ok(candidates)
    }
}
