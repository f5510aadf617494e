//! Aspect sentiment aggregation for chunk mode.
//!
//! For each `(category, phrase)` occurrence, add the scores of every scored
//! word whose lowercase form contains one of the category's keywords. The
//! phrase itself only decides *that* a category was mentioned (and how often);
//! the contribution is a keyword re-match over the review's scored words.
//! Categories whose total is exactly zero are omitted.

use std::collections::BTreeMap;

use super::aspects::{AspectCategory, AspectTaxonomy};

pub fn aggregate(
    taxonomy: &AspectTaxonomy,
    aspects: &[(AspectCategory, String)],
    word_sentiments: &[(String, f64)],
) -> BTreeMap<AspectCategory, f64> {
    let mut totals: BTreeMap<AspectCategory, f64> = BTreeMap::new();
    for (category, _phrase) in aspects {
        let keywords = taxonomy.keywords(*category);
        let contribution: f64 = word_sentiments
            .iter()
            .filter(|(word, _)| {
                let w = word.to_lowercase();
                keywords.iter().any(|k| w.contains(k.as_str()))
            })
            .map(|(_, s)| s)
            .sum();
        *totals.entry(*category).or_insert(0.0) += contribution;
    }
    totals.retain(|_, v| *v != 0.0);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(w, s)| (w.to_string(), *s)).collect()
    }

    #[test]
    fn repeated_aspects_accumulate() {
        let tax = AspectTaxonomy::default();
        let aspects = vec![
            (AspectCategory::FoodQuality, "food".to_string()),
            (AspectCategory::FoodQuality, "absolutely delicious".to_string()),
        ];
        let out = aggregate(&tax, &aspects, &ws(&[("delicious", 0.5719), ("rude", -0.4588)]));
        assert!((out[&AspectCategory::FoodQuality] - 2.0 * 0.5719).abs() < 1e-12);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn zero_net_categories_are_dropped() {
        let tax = AspectTaxonomy::default();
        let aspects = vec![(AspectCategory::Price, "price".to_string())];
        // no scored word contains a price keyword
        let out = aggregate(&tax, &aspects, &ws(&[("delicious", 0.5719)]));
        assert!(out.is_empty());
    }

    #[test]
    fn keyword_rematch_is_case_insensitive_substring() {
        let tax = AspectTaxonomy::default();
        let aspects = vec![(AspectCategory::Service, "staff".to_string())];
        let out = aggregate(&tax, &aspects, &ws(&[("UNFRIENDLY", -0.3), ("Rude!", -0.4)]));
        assert!((out[&AspectCategory::Service] + 0.7).abs() < 1e-12);
    }

    #[test]
    fn no_aspects_means_empty_map() {
        let tax = AspectTaxonomy::default();
        assert!(aggregate(&tax, &[], &ws(&[("great", 0.6)])).is_empty());
    }
}
