//! Per-restaurant roll-up of analyzed reviews (table + radar input for the UI).

use serde::Serialize;
use std::collections::BTreeMap;

use super::{AspectCategory, RowResult};
use crate::dataset::Review;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSummary {
    pub restaurant: String,
    pub total_reviews: usize,
    /// Mean `stars_y`, rounded to 2 decimals. `None` without rows.
    pub average_rating: Option<f64>,
    /// Mean compound score over successfully analyzed rows.
    pub average_sentiment: Option<f64>,
    /// Mean per category over the rows where that category is present.
    pub category_means: BTreeMap<AspectCategory, f64>,
    pub failed_rows: usize,
}

pub fn summarize(restaurant: &str, reviews: &[Review], results: &[RowResult]) -> RestaurantSummary {
    let average_rating = mean(reviews.iter().map(|r| r.stars_y)).map(|m| (m * 100.0).round() / 100.0);

    let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let average_sentiment = mean(ok.iter().map(|r| r.sentiment_score));

    let mut sums: BTreeMap<AspectCategory, (f64, usize)> = BTreeMap::new();
    for r in &ok {
        for (cat, v) in &r.aspect_sentiments {
            let e = sums.entry(*cat).or_insert((0.0, 0));
            e.0 += v;
            e.1 += 1;
        }
    }
    let category_means = sums
        .into_iter()
        .map(|(cat, (sum, n))| (cat, sum / n as f64))
        .collect();

    RestaurantSummary {
        restaurant: restaurant.to_string(),
        total_reviews: reviews.len(),
        average_rating,
        average_sentiment,
        category_means,
        failed_rows: results.len() - ok.len(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::SentimentResult;
    use crate::error::RowError;

    fn review(stars: f64) -> Review {
        Review {
            text: Some(String::new()),
            name: "A".into(),
            city: "X".into(),
            address: "Y".into(),
            stars_y: stars,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn absent_categories_do_not_drag_means_down() {
        let reviews = vec![review(4.0), review(5.0), review(3.333)];
        let results: Vec<RowResult> = vec![
            Ok(SentimentResult {
                row: 0,
                sentiment_score: 0.5,
                aspect_sentiments: BTreeMap::from([(AspectCategory::Service, -0.4)]),
            }),
            Ok(SentimentResult {
                row: 1,
                sentiment_score: 0.1,
                aspect_sentiments: BTreeMap::from([
                    (AspectCategory::Service, 0.2),
                    (AspectCategory::Price, 0.6),
                ]),
            }),
            Err(RowError::MissingText { row: 2 }),
        ];
        let s = summarize("A", &reviews, &results);
        assert_eq!(s.total_reviews, 3);
        assert_eq!(s.failed_rows, 1);
        assert_eq!(s.average_rating, Some(4.11));
        assert!((s.average_sentiment.unwrap() - 0.3).abs() < 1e-12);
        assert!((s.category_means[&AspectCategory::Service] + 0.1).abs() < 1e-12);
        assert!((s.category_means[&AspectCategory::Price] - 0.6).abs() < 1e-12);
        assert!(!s.category_means.contains_key(&AspectCategory::Ambiance));
    }

    #[test]
    fn empty_input_has_no_averages() {
        let s = summarize("Ghost", &[], &[]);
        assert_eq!(s.total_reviews, 0);
        assert_eq!(s.average_rating, None);
        assert_eq!(s.average_sentiment, None);
        assert!(s.category_means.is_empty());
    }
}
