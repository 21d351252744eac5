//! Record normalization.
//!
//! Turns raw [`ItineraryRecord`]s into typed [`Recommendation`]s. A record
//! missing a required field, or whose cost does not parse, is skipped and
//! logged; it never fails the request.

use thiserror::Error;

use crate::models::{ItineraryRecord, PriceMatch, Recommendation};
use crate::query::parse_cost;

/// Placeholder used when a record has no description.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Which lookup produced a record. Decides the `priceMatch` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOrigin {
    Exact,
    Range,
}

/// Why a record was left out of the results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unparsable averageCost: {0:?}")]
    UnparsableCost(String),
}

fn required<'a, T>(value: &'a Option<T>, field: &'static str) -> Result<&'a T, SkipReason> {
    value.as_ref().ok_or(SkipReason::MissingField(field))
}

/// Normalize one record.
pub fn normalize(
    record: &ItineraryRecord,
    origin: MatchOrigin,
    budget: f64,
) -> Result<Recommendation, SkipReason> {
    let title = required(&record.title, "title")?;
    let categories = required(&record.categories, "categories")?;
    let image = required(&record.image, "image")?;
    let average_time = required(&record.average_time, "averageTime")?;
    let raw_cost = required(&record.average_cost, "averageCost")?;
    let location = required(&record.location, "location")?;

    let cost = parse_cost(raw_cost).ok_or_else(|| SkipReason::UnparsableCost(raw_cost.clone()))?;

    let price_match = match origin {
        MatchOrigin::Exact => PriceMatch::Exact,
        MatchOrigin::Range => PriceMatch::for_range(cost, budget),
    };

    Ok(Recommendation {
        id: record.id.clone(),
        title: title.clone(),
        categories: categories.clone(),
        image: image.clone(),
        average_time: average_time.clone(),
        average_cost: cost,
        location: location.clone(),
        description: record
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        price_match,
    })
}

/// Normalize a batch, preserving order and dropping records that fail.
pub fn normalize_all(
    records: &[ItineraryRecord],
    origin: MatchOrigin,
    budget: f64,
) -> Vec<Recommendation> {
    records
        .iter()
        .filter_map(|record| match normalize(record, origin, budget) {
            Ok(item) => Some(item),
            Err(reason) => {
                tracing::warn!(id = %record.id, %reason, "skipping invalid itinerary");
                None
            }
        })
        .collect()
}
