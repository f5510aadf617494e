//! HTTP surface over the two engines.
//!
//! - `GET  /health`
//! - `GET  /restaurants`            → known restaurant names
//! - `POST /analyze   {restaurant}` → summary + per-review scores
//! - `POST /recommend {review, city, top_n?}` → ranked restaurants
//!
//! "No rows for this restaurant" is a normal 200 response with `found: false`.
//! A content index that cannot be built is a 422, never an empty list.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::OnceCell;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::analyze::{
    summarize, AspectCategory, RestaurantSummary, SentimentContext, SentimentEngine,
};
use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::error::RecommendError;
use crate::recommend::{ContentIndex, Recommendation, Recommender};
use crate::sentiment::{Lexicon, SentimentAnalyzer};

const MAX_SUGGESTIONS: usize = 3;

#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
    sentiment: Arc<SentimentEngine>,
    recommender: Arc<Recommender>,
    /// Built on first use, kept for the lifetime of the loaded dataset.
    index: Arc<OnceCell<ContentIndex>>,
    default_top_n: usize,
}

impl AppState {
    pub fn new(
        dataset: Dataset,
        sentiment: SentimentEngine,
        recommender: Recommender,
        default_top_n: usize,
    ) -> Self {
        Self {
            dataset: Arc::new(dataset),
            sentiment: Arc::new(sentiment),
            recommender: Arc::new(recommender),
            index: Arc::new(OnceCell::new()),
            default_top_n,
        }
    }

    /// Wire lexicon, engines and policy from configuration.
    pub fn from_config(cfg: &AppConfig, dataset: Dataset) -> anyhow::Result<Self> {
        let lexicon = match &cfg.sentiment.lexicon_path {
            Some(p) => Lexicon::from_path(p)?,
            None => Lexicon::embedded()?,
        };
        info!(entries = lexicon.len(), "sentiment lexicon loaded");

        let ctx = SentimentContext::new(SentimentAnalyzer::new(Arc::new(lexicon)))
            .with_mode(cfg.sentiment.mode)
            .with_normalize(cfg.sentiment.normalize)
            .with_malformed_rows(cfg.sentiment.malformed_rows);
        let engine = SentimentEngine::new(ctx, cfg.sentiment.workers)?;
        info!(
            workers = engine.workers(),
            mode = ?cfg.sentiment.mode,
            "sentiment engine ready"
        );
        let recommender = Recommender::new(
            cfg.recommend.weights,
            cfg.recommend.cuisine_from_raw_query,
        );
        Ok(Self::new(dataset, engine, recommender, cfg.recommend.top_n))
    }

    pub fn analyze_restaurant(&self, restaurant: &str) -> AnalyzeResp {
        let rows = self.dataset.for_restaurant(restaurant);
        if rows.is_empty() {
            return AnalyzeResp {
                restaurant: restaurant.to_string(),
                found: false,
                suggestions: self.dataset.suggest(restaurant, MAX_SUGGESTIONS),
                summary: None,
                reviews: Vec::new(),
            };
        }

        let results = self.sentiment.analyze(&rows);
        let summary = summarize(restaurant, &rows, &results);
        let reviews = results
            .into_iter()
            .enumerate()
            .map(|(row, r)| match r {
                Ok(s) => ReviewSentiment {
                    row: s.row,
                    sentiment_score: Some(s.sentiment_score),
                    aspect_sentiments: s.aspect_sentiments,
                    error: None,
                },
                Err(e) => ReviewSentiment {
                    row,
                    sentiment_score: None,
                    aspect_sentiments: BTreeMap::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        AnalyzeResp {
            restaurant: restaurant.to_string(),
            found: true,
            suggestions: Vec::new(),
            summary: Some(summary),
            reviews,
        }
    }

    pub fn recommend(
        &self,
        review: &str,
        city: &str,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let reviews = self.dataset.reviews();
        if reviews.is_empty() {
            return Ok(Vec::new());
        }
        let index = self
            .index
            .get_or_try_init(|| Recommender::build_index(reviews))?;
        self.recommender.rank(reviews, review, city, index, top_n)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/restaurants", get(restaurants))
        .route("/analyze", post(analyze))
        .route("/recommend", post(recommend))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    restaurant: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewSentiment {
    pub row: usize,
    pub sentiment_score: Option<f64>,
    pub aspect_sentiments: BTreeMap<AspectCategory, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct AnalyzeResp {
    pub restaurant: String,
    pub found: bool,
    pub suggestions: Vec<String>,
    pub summary: Option<RestaurantSummary>,
    pub reviews: Vec<ReviewSentiment>,
}

#[derive(serde::Deserialize)]
struct RecommendReq {
    review: String,
    city: String,
    #[serde(default)]
    top_n: Option<usize>,
}

#[derive(serde::Serialize)]
struct RecommendResp {
    recommendations: Vec<Recommendation>,
}

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

async fn restaurants(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dataset.restaurant_names())
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeResp>, ApiError> {
    let name = body.restaurant.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("restaurant must not be empty".into()));
    }
    let resp = tokio::task::spawn_blocking(move || state.analyze_restaurant(&name))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))?;
    Ok(Json(resp))
}

async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendReq>,
) -> Result<Json<RecommendResp>, ApiError> {
    if body.review.trim().is_empty() || body.city.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "both review and city are required".into(),
        ));
    }
    let top_n = body.top_n.unwrap_or(state.default_top_n);
    let recs = tokio::task::spawn_blocking(move || {
        state.recommend(&body.review, &body.city, top_n)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("ranking task failed: {e}")))?
    .map_err(|e| {
        warn!(error = %e, "no recommendations possible");
        ApiError::Unprocessable(e.to_string())
    })?;
    Ok(Json(RecommendResp {
        recommendations: recs,
    }))
}
