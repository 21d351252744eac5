//! The recommendation pipeline and response shapes.
//!
//! ```text
//! exact lookup ──▶ (empty?) ──▶ range lookup
//!        │                           │
//!        ▼                           ▼
//!   normalize(Exact)           normalize(Range)
//!        └──────────┬────────────────┘
//!                   ▼
//!        rank + truncate ──▶ RecommendOutcome
//! ```
//!
//! The range lookup only runs when the exact lookup returned no records
//! at all. Exact records that later fail normalization do not re-enable
//! it.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::models::Recommendation;
use crate::normalize::{normalize_all, MatchOrigin};
use crate::query::{exact_filter, range_filter, DEFAULT_PRICE_RANGE};
use crate::rank::{rank, DEFAULT_MAX_RESULTS};
use crate::store::ItineraryStore;

/// Error string for the not-found outcome.
pub const NOT_FOUND_MESSAGE: &str =
    "No itineraries found matching both categories and price criteria";

/// Error string for unexpected failures. Internal detail is never exposed.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A validated recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub budget: f64,
    pub categories: Vec<String>,
}

impl RecommendRequest {
    /// Validate a raw JSON body.
    ///
    /// `budget` may be a number or a numeric string; `categories` must be an
    /// array of strings (possibly empty).
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let obj = body.as_object().ok_or(RequestError::NotAnObject)?;

        let budget = match obj.get("budget") {
            None | Some(Value::Null) => return Err(RequestError::MissingBudget),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| RequestError::InvalidBudget(n.to_string()))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| RequestError::InvalidBudget(s.clone()))?,
            Some(other) => return Err(RequestError::InvalidBudget(other.to_string())),
        };
        if !budget.is_finite() {
            return Err(RequestError::InvalidBudget(budget.to_string()));
        }

        let categories = match obj.get("categories") {
            None | Some(Value::Null) => return Err(RequestError::MissingCategories),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
                .ok_or(RequestError::InvalidCategories)?,
            Some(_) => return Err(RequestError::InvalidCategories),
        };

        Ok(Self { budget, categories })
    }
}

/// Pipeline tuning, decoupled from application config.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendParams {
    /// Half-width of the range criterion.
    pub price_range: f64,
    /// Maximum recommendations returned.
    pub max_results: usize,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            price_range: DEFAULT_PRICE_RANGE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Metadata echoed alongside the recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendMeta {
    pub budget: f64,
    pub price_range: f64,
    pub categories: Vec<String>,
    /// Raw exact-lookup count, before invalid records are skipped.
    pub num_exact_matches: usize,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
    pub meta: RecommendMeta,
}

/// Failure response body shared by the not-found, bad-request, and
/// internal-error paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

impl FailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_MESSAGE)
    }
}

/// Result of a recommendation that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendOutcome {
    Found(RecommendResponse),
    /// Neither lookup produced a valid record.
    NotFound,
}

/// Run the recommendation pipeline against `store`.
///
/// Store failures propagate as errors; invalid records are skipped.
pub async fn recommend<S: ItineraryStore + ?Sized>(
    store: &S,
    req: &RecommendRequest,
    params: &RecommendParams,
) -> Result<RecommendOutcome> {
    let budget = req.budget;

    let exact_records = store.find(&exact_filter(budget, &req.categories)).await?;
    let range_records = if exact_records.is_empty() {
        store
            .find(&range_filter(budget, params.price_range, &req.categories))
            .await?
    } else {
        Vec::new()
    };

    let exact = normalize_all(&exact_records, MatchOrigin::Exact, budget);
    let range = normalize_all(&range_records, MatchOrigin::Range, budget);

    if exact.is_empty() && range.is_empty() {
        tracing::info!(
            budget,
            categories = req.categories.len(),
            exact_records = exact_records.len(),
            range_records = range_records.len(),
            "no recommendations found"
        );
        return Ok(RecommendOutcome::NotFound);
    }

    let recommendations = rank(exact, range, budget, params.max_results);

    tracing::info!(
        budget,
        categories = req.categories.len(),
        exact_records = exact_records.len(),
        range_records = range_records.len(),
        returned = recommendations.len(),
        "recommendations ranked"
    );

    Ok(RecommendOutcome::Found(RecommendResponse {
        success: true,
        recommendations,
        meta: RecommendMeta {
            budget,
            price_range: params.price_range,
            categories: req.categories.clone(),
            num_exact_matches: exact_records.len(),
        },
    }))
}
