//! Store statistics and a sample record.
//!
//! Used by `trec stats` to confirm an import landed: total count, time of
//! the last write, a per-category breakdown, and the first itinerary in
//! store order.

use anyhow::Result;

use trip_recommender_core::query::ItineraryFilter;
use trip_recommender_core::ItineraryStore;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    let store = SqliteStore::new(pool);

    let total = store.count(&ItineraryFilter::all()).await?;
    let categories = store.category_counts().await?;
    let sample = store.first().await?;
    let last_updated = store.last_updated().await?;

    println!("Trip Recommender — Store Stats");
    println!("==============================");
    println!();
    println!("  Database:     {}", config.db.path.display());
    println!("  Itineraries:  {}", total);
    match last_updated {
        Some(ts) => println!(
            "  Last update:  {} ({})",
            format_ts_iso(ts),
            format_ts_relative(ts)
        ),
        None => println!("  Last update:  never"),
    }
    println!();

    if categories.is_empty() {
        println!("  No categories indexed.");
    } else {
        println!("  {:<24} {:>8}", "CATEGORY", "COUNT");
        for c in &categories {
            println!("  {:<24} {:>8}", c.category, c.count);
        }
    }
    println!();

    match sample {
        Some(record) => {
            println!("  Sample itinerary:");
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("  Sample itinerary: (none)"),
    }

    store.pool().close().await;
    Ok(())
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let delta = chrono::Utc::now().timestamp() - ts;

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
