//! Itinerary records and recommendation result items.
//!
//! [`ItineraryRecord`] mirrors what the backing store holds: every field
//! except `id` may be missing, and `average_cost` is free-form text. The
//! typed [`Recommendation`] only exists after a record survives
//! [`normalize`](crate::normalize).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A raw itinerary document as persisted by the store.
///
/// Deserializes from the document shape used by the travel frontend
/// (`_id`, `averageTime`, `averageCost`, ...). `averageCost` is accepted
/// as either a string or a number; numbers keep their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub average_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub average_cost: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItineraryRecord {
    /// True when the record carries at least one of `wanted`.
    ///
    /// An empty `wanted` set never intersects.
    pub fn has_any_category(&self, wanted: &[String]) -> bool {
        match &self.categories {
            Some(own) => own.iter().any(|c| wanted.contains(c)),
            None => false,
        }
    }
}

/// Accept a JSON string or number and keep it as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected string or number, got {}",
                other
            )))
        }
    })
}

/// How an item's cost relates to the requested budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceMatch {
    /// Item came from the exact-match query.
    Exact,
    /// Range item cheaper than the budget, by this amount.
    UnderBudget(f64),
    /// Range item at or above the budget, by this amount.
    OverBudget(f64),
}

impl PriceMatch {
    /// Label for a range-match item with the given parsed cost.
    pub fn for_range(cost: f64, budget: f64) -> Self {
        if cost < budget {
            PriceMatch::UnderBudget(budget - cost)
        } else {
            PriceMatch::OverBudget(cost - budget)
        }
    }
}

impl fmt::Display for PriceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceMatch::Exact => write!(f, "Exact price match"),
            PriceMatch::UnderBudget(amount) => write!(f, "Under budget by Rs {:.2}", amount),
            PriceMatch::OverBudget(amount) => write!(f, "Over budget by Rs {:.2}", amount),
        }
    }
}

impl Serialize for PriceMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A normalized itinerary returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub categories: Vec<String>,
    pub image: String,
    pub average_time: String,
    /// Parsed from the record's textual cost.
    pub average_cost: f64,
    pub location: String,
    pub description: String,
    pub price_match: PriceMatch,
}

impl Recommendation {
    /// Ranking score: absolute distance from the budget.
    pub fn distance_from(&self, budget: f64) -> f64 {
        (self.average_cost - budget).abs()
    }
}
