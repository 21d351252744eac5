//! One-shot recommendations from the command line.
//!
//! Runs the same pipeline as `POST /services/recommend` against the
//! configured database and prints the response body as JSON.

use anyhow::Result;
use serde_json::json;

use trip_recommender_core::recommend::FailureBody;
use trip_recommender_core::{recommend, RecommendOutcome, RecommendRequest};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Core function returning the outcome (used by the CLI and tests).
pub async fn recommend_from_db(
    config: &Config,
    budget: f64,
    categories: Vec<String>,
) -> Result<RecommendOutcome> {
    // Validate through the same path as HTTP bodies.
    let req = RecommendRequest::from_json(&json!({
        "budget": budget,
        "categories": categories,
    }))?;

    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    let store = SqliteStore::new(pool);

    let outcome = recommend(&store, &req, &config.recommend.params()).await;
    store.pool().close().await;
    outcome
}

/// CLI entry point for `trec recommend`.
///
/// Returns `true` when recommendations were found.
pub async fn run_recommend(config: &Config, budget: f64, categories: Vec<String>) -> Result<bool> {
    match recommend_from_db(config, budget, categories).await? {
        RecommendOutcome::Found(resp) => {
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Ok(true)
        }
        RecommendOutcome::NotFound => {
            println!("{}", serde_json::to_string_pretty(&FailureBody::not_found())?);
            Ok(false)
        }
    }
}
