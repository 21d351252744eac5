//! Lookup criteria for the itinerary store.
//!
//! A recommendation issues at most two lookups, both restricted to records
//! whose categories intersect the requested set:
//!
//! 1. **Exact**: the record's cost text, trimmed, equals [`format_budget`]
//!    of the budget. This is a string comparison: `"100.0"` does not
//!    match a budget of `100`.
//! 2. **Range**: the record's cost, trimmed and parsed, lies within
//!    `[budget - price_range, budget + price_range]`.
//!
//! Store backends may push parts of a filter down into their query
//! language, but [`ItineraryFilter::matches`] is the reference predicate.

use crate::models::ItineraryRecord;

/// Half-width of the range criterion, in the domain currency unit.
pub const DEFAULT_PRICE_RANGE: f64 = 2000.0;

/// Constraint on a record's textual `averageCost`.
#[derive(Debug, Clone, PartialEq)]
pub enum CostCriterion {
    /// Trimmed cost text equals this string.
    Exact(String),
    /// Trimmed, parsed cost lies in `[min, max]`.
    Range { min: f64, max: f64 },
}

impl CostCriterion {
    pub fn matches(&self, average_cost: Option<&str>) -> bool {
        let Some(raw) = average_cost else {
            return false;
        };
        match self {
            CostCriterion::Exact(expected) => raw.trim() == expected,
            CostCriterion::Range { min, max } => match parse_cost(raw) {
                Some(cost) => *min <= cost && cost <= *max,
                None => false,
            },
        }
    }
}

/// A store lookup. `None` fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryFilter {
    /// Record must carry at least one of these categories.
    pub categories: Option<Vec<String>>,
    pub cost: Option<CostCriterion>,
}

impl ItineraryFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &ItineraryRecord) -> bool {
        if let Some(wanted) = &self.categories {
            if !record.has_any_category(wanted) {
                return false;
            }
        }
        match &self.cost {
            Some(criterion) => criterion.matches(record.average_cost.as_deref()),
            None => true,
        }
    }
}

/// Criterion for the first-phase exact lookup.
pub fn exact_filter(budget: f64, categories: &[String]) -> ItineraryFilter {
    ItineraryFilter {
        categories: Some(categories.to_vec()),
        cost: Some(CostCriterion::Exact(format_budget(budget))),
    }
}

/// Criterion for the fallback range lookup.
pub fn range_filter(budget: f64, price_range: f64, categories: &[String]) -> ItineraryFilter {
    ItineraryFilter {
        categories: Some(categories.to_vec()),
        cost: Some(CostCriterion::Range {
            min: budget - price_range,
            max: budget + price_range,
        }),
    }
}

/// Text form of a budget used by the exact criterion.
///
/// Shortest round-trip decimal: `5000.0` renders as `"5000"`, `99.5` as
/// `"99.5"`.
pub fn format_budget(budget: f64) -> String {
    budget.to_string()
}

/// Parse a stored cost: trim, then require a finite float.
pub fn parse_cost(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|c| c.is_finite())
}
