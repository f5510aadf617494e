// tests/recommend_ranking.rs
//
// Ranking properties and scenarios for the recommendation engine.

use taste_text::{CuisineLabel, IndexError, RecommendError, Recommender, Review};

fn review(name: &str, city: &str, stars: f64, text: &str) -> Review {
    Review {
        text: Some(text.to_string()),
        name: name.to_string(),
        city: city.to_string(),
        address: format!("{name}, {city}"),
        stars_y: stars,
        latitude: 34.42,
        longitude: -119.70,
    }
}

fn pool() -> Vec<Review> {
    vec![
        review("Sushi Go", "Goleta", 4.5, "Fresh sushi and ramen, great service"),
        review("Taqueria Sol", "Santa Barbara", 5.0, "Best tacos and burrito in town!"),
        review("Pasta Bella", "Santa Barbara", 3.5, "Decent pasta, slow waiter"),
        review("Burger Barn", "Ventura", 4.0, "Juicy burger and fries"),
        review("Curry House", "Santa Barbara", 4.0, "Spicy curry and warm naan"),
        review("Taco Truck", "Ventura", 3.0, "cheap tacos"),
    ]
}

#[test]
fn tacos_in_santa_barbara_scenario() {
    let out = Recommender::default()
        .recommend(&pool(), "I want tacos", "Santa Barbara", 1)
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].restaurant, "Taqueria Sol");
    assert_eq!(out[0].cuisine, CuisineLabel::Mexican);
    assert!((out[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn city_match_ignores_case() {
    let rows = vec![
        review("Elsewhere", "Goleta", 5.0, "salad"),
        review("Local", "Santa Barbara", 1.0, "salad"),
    ];
    let out = Recommender::default()
        .recommend(&rows, "salad", "santa barbara", 2)
        .unwrap();
    assert_eq!(out[0].restaurant, "Local");
    // 0.55 location + 0.25 cuisine (both `other`) + 0.2 * 1/5
    assert!((out[0].score - 0.84).abs() < 1e-9);
}

#[test]
fn output_length_is_min_of_top_n_and_rows() {
    let rec = Recommender::default();
    let rows = pool();
    for top_n in [0, 1, 3, rows.len(), rows.len() + 10] {
        let out = rec.recommend(&rows, "tacos", "Santa Barbara", top_n).unwrap();
        assert_eq!(out.len(), top_n.min(rows.len()));
    }
}

#[test]
fn scores_bounded_and_order_non_increasing() {
    let out = Recommender::default()
        .recommend(&pool(), "spicy curry please", "Santa Barbara", 10)
        .unwrap();
    for r in &out {
        assert!((0.0..=1.0).contains(&r.score));
    }
    for pair in out.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.score > b.score || (a.score == b.score && a.similarity >= b.similarity),
            "{} ({}, {}) before {} ({}, {})",
            a.restaurant,
            a.score,
            a.similarity,
            b.restaurant,
            b.score,
            b.similarity
        );
    }
    let ranks: Vec<usize> = out.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=out.len()).collect::<Vec<_>>());
}

#[test]
fn unknown_city_still_ranks_by_cuisine_and_quality() {
    let out = Recommender::default()
        .recommend(&pool(), "tacos", "Atlantis", 2)
        .unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].restaurant, "Taqueria Sol");
    assert_eq!(out[1].restaurant, "Taco Truck");
    assert!(out.iter().all(|r| r.score <= 0.45 + 1e-9));
}

#[test]
fn empty_pool_is_empty_not_error() {
    let out = Recommender::default().recommend(&[], "tacos", "Santa Barbara", 5);
    assert_eq!(out, Ok(Vec::new()));
}

#[test]
fn stop_word_only_corpus_is_an_index_failure() {
    let rows = vec![review("A", "X", 3.0, "the and of"), review("B", "X", 3.0, "")];
    assert_eq!(
        Recommender::default().recommend(&rows, "tacos", "X", 5),
        Err(RecommendError::Index(IndexError::EmptyVocabulary))
    );
}

#[test]
fn prebuilt_index_gives_same_ranking() {
    let rows = pool();
    let rec = Recommender::default();
    let idx = Recommender::build_index(&rows).unwrap();
    assert_eq!(
        rec.rank(&rows, "burger", "Ventura", &idx, 3).unwrap(),
        rec.recommend(&rows, "burger", "Ventura", 3).unwrap()
    );
}

#[test]
fn result_carries_row_fields() {
    let out = Recommender::default()
        .recommend(&pool(), "ramen", "Goleta", 1)
        .unwrap();
    let top = &out[0];
    assert_eq!(top.restaurant, "Sushi Go");
    assert_eq!(top.city, "Goleta");
    assert_eq!(top.address, "Sushi Go, Goleta");
    assert_eq!(top.stars, 4.5);
    assert_eq!(top.matched_review, "Fresh sushi and ramen, great service");
    assert!(top.similarity > 0.0);
}
