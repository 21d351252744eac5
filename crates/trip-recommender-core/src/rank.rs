//! Proximity ranking.
//!
//! Exact-match items are placed ahead of range-match items, the combined
//! list is stable-sorted by `|averageCost - budget|`, then truncated.
//! Stability means an exact item still precedes a range item with the
//! same distance.

use std::cmp::Ordering;

use crate::models::Recommendation;

/// Default number of recommendations returned.
pub const DEFAULT_MAX_RESULTS: usize = 5;

pub fn rank(
    exact: Vec<Recommendation>,
    range: Vec<Recommendation>,
    budget: f64,
    limit: usize,
) -> Vec<Recommendation> {
    let mut combined = exact;
    combined.extend(range);

    // Vec::sort_by is stable.
    combined.sort_by(|a, b| {
        a.distance_from(budget)
            .partial_cmp(&b.distance_from(budget))
            .unwrap_or(Ordering::Equal)
    });
    combined.truncate(limit);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceMatch;

    fn item(id: &str, cost: f64, price_match: PriceMatch) -> Recommendation {
        Recommendation {
            id: id.into(),
            title: id.into(),
            categories: vec!["beach".into()],
            image: String::new(),
            average_time: String::new(),
            average_cost: cost,
            location: String::new(),
            description: String::new(),
            price_match,
        }
    }

    fn ids(items: &[Recommendation]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_distance() {
        let range = vec![
            item("far", 6900.0, PriceMatch::OverBudget(1900.0)),
            item("near", 5100.0, PriceMatch::OverBudget(100.0)),
            item("mid", 4500.0, PriceMatch::UnderBudget(500.0)),
        ];
        let ranked = rank(Vec::new(), range, 5000.0, 5);
        assert_eq!(ids(&ranked), vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let range = vec![
            item("over", 5500.0, PriceMatch::OverBudget(500.0)),
            item("under", 4500.0, PriceMatch::UnderBudget(500.0)),
        ];
        let ranked = rank(Vec::new(), range, 5000.0, 5);
        assert_eq!(ids(&ranked), vec!["over", "under"]);
    }

    #[test]
    fn test_exact_precedes_equal_range_item() {
        let exact = vec![item("exact", 5000.0, PriceMatch::Exact)];
        let range = vec![item("range", 5000.0, PriceMatch::OverBudget(0.0))];
        let ranked = rank(exact, range, 5000.0, 5);
        assert_eq!(ids(&ranked), vec!["exact", "range"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let range: Vec<Recommendation> = (0..8)
            .map(|i| item(&format!("r{}", i), 5000.0 + i as f64 * 100.0, PriceMatch::Exact))
            .collect();
        let ranked = rank(Vec::new(), range, 5000.0, DEFAULT_MAX_RESULTS);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ids(&ranked), vec!["r0", "r1", "r2", "r3", "r4"]);
    }

    #[test]
    fn test_fewer_than_limit() {
        let ranked = rank(
            vec![item("only", 5000.0, PriceMatch::Exact)],
            Vec::new(),
            5000.0,
            5,
        );
        assert_eq!(ranked.len(), 1);
    }
}
