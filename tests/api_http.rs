// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use taste_text::config::AppConfig;
use taste_text::{api, AppState, Dataset, Review};

const BODY_LIMIT: usize = 1024 * 1024;

fn review(text: Option<&str>, name: &str, city: &str, stars: f64) -> Review {
    Review {
        text: text.map(str::to_string),
        name: name.to_string(),
        city: city.to_string(),
        address: "1 State St".to_string(),
        stars_y: stars,
        latitude: 34.42,
        longitude: -119.70,
    }
}

fn router_with(rows: Vec<Review>) -> Router {
    let state = AppState::from_config(&AppConfig::default(), Dataset::new(rows)).expect("state");
    api::router(state)
}

fn test_router() -> Router {
    router_with(vec![
        review(
            Some("The food was absolutely delicious but the service was slow and rude"),
            "Harbor Grill",
            "Santa Barbara",
            4.0,
        ),
        review(Some("Great fresh fish, friendly staff."), "Harbor Grill", "Santa Barbara", 5.0),
        review(None, "Harbor Grill", "Santa Barbara", 3.0),
        review(Some("Best tacos in town!"), "Taqueria Sol", "Santa Barbara", 5.0),
        review(Some("Sushi was fine."), "Sushi Go", "Goleta", 3.5),
    ])
}

async fn call(app: Router, method: &str, uri: &str, payload: Option<Json>) -> (StatusCode, Json) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match payload {
        Some(p) => builder
            .header("content-type", "application/json")
            .body(Body::from(p.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Json::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = call(test_router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Json::String("ok".into()));
}

#[tokio::test]
async fn restaurants_lists_distinct_names() {
    let (status, body) = call(test_router(), "GET", "/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Harbor Grill", "Sushi Go", "Taqueria Sol"]));
}

#[tokio::test]
async fn analyze_returns_summary_and_rows() {
    let (status, v) = call(
        test_router(),
        "POST",
        "/analyze",
        Some(json!({ "restaurant": "Harbor Grill" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["found"], json!(true));
    assert_eq!(v["summary"]["total_reviews"], json!(3));
    assert_eq!(v["summary"]["average_rating"], json!(4.0));
    assert_eq!(v["reviews"].as_array().unwrap().len(), 3);

    let first = &v["reviews"][0];
    assert!(first["aspect_sentiments"]["food_quality"].as_f64().unwrap() > 0.0);
    assert!(first["aspect_sentiments"]["service"].as_f64().unwrap() < 0.0);

    // missing text is coerced by default: scored as neutral, no aspects
    assert_eq!(v["reviews"][2]["sentiment_score"], json!(0.0));
    assert_eq!(v["reviews"][2]["aspect_sentiments"], json!({}));
}

#[tokio::test]
async fn analyze_unknown_restaurant_is_empty_with_suggestions() {
    let (status, v) = call(
        test_router(),
        "POST",
        "/analyze",
        Some(json!({ "restaurant": "harbour grill" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["found"], json!(false));
    assert_eq!(v["summary"], Json::Null);
    assert_eq!(v["suggestions"], json!(["Harbor Grill"]));
}

#[tokio::test]
async fn recommend_ranks_matching_restaurant_first() {
    let (status, v) = call(
        test_router(),
        "POST",
        "/recommend",
        Some(json!({ "review": "I want tacos", "city": "santa barbara", "top_n": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = v["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["restaurant"], json!("Taqueria Sol"));
    assert_eq!(recs[0]["cuisine"], json!("mexican"));
    assert!((recs[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn recommend_requires_review_and_city() {
    let (status, v) = call(
        test_router(),
        "POST",
        "/recommend",
        Some(json!({ "review": "  ", "city": "Santa Barbara" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].is_string());
}

#[tokio::test]
async fn index_failure_is_distinct_from_no_results() {
    let app = router_with(vec![review(Some("the and of"), "A", "X", 3.0)]);
    let (status, v) = call(
        app,
        "POST",
        "/recommend",
        Some(json!({ "review": "tacos", "city": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(v["error"].as_str().unwrap().contains("vocabulary"));

    let (status, v) = call(
        router_with(Vec::new()),
        "POST",
        "/recommend",
        Some(json!({ "review": "tacos", "city": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["recommendations"], json!([]));
}
