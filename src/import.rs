//! Itinerary import from JSON exports.
//!
//! Accepts a JSON array of itinerary documents in the frontend's shape
//! (`_id`, `title`, `categories`, `image`, `averageTime`, `averageCost`,
//! `location`, `description`). Documents are stored as-is: missing fields
//! stay missing and are skipped at recommendation time, not here.
//!
//! - `_id` may be a string, `{"$oid": "..."}`, or absent (a UUID v4 is
//!   generated).
//! - Numeric `averageCost` / `averageTime` values keep their JSON text.
//! - Documents that cannot be represented at all (e.g. `categories` is not
//!   an array of strings) are reported and left out.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

use trip_recommender_core::{ItineraryRecord, ItineraryStore};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Outcome of parsing an export file.
#[derive(Debug, Default)]
pub struct ParsedExport {
    pub records: Vec<ItineraryRecord>,
    /// `(index in file, reason)` for each document left out.
    pub rejected: Vec<(usize, String)>,
}

/// Parse an export file's contents.
pub fn parse_export(content: &str) -> Result<ParsedExport> {
    let value: Value = serde_json::from_str(content).context("Import file is not valid JSON")?;
    let Value::Array(documents) = value else {
        bail!("Import file must contain a JSON array of itineraries");
    };

    let mut parsed = ParsedExport::default();
    for (index, document) in documents.into_iter().enumerate() {
        match to_record(document) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.rejected.push((index, e.to_string())),
        }
    }
    Ok(parsed)
}

fn to_record(mut document: Value) -> Result<ItineraryRecord> {
    let Some(obj) = document.as_object_mut() else {
        bail!("document is not a JSON object");
    };

    // Unwrap extended-JSON object ids.
    if let Some(oid) = obj
        .get("_id")
        .and_then(|id| id.get("$oid"))
        .and_then(Value::as_str)
        .map(str::to_string)
    {
        obj.insert("_id".to_string(), Value::String(oid));
    }

    let mut record: ItineraryRecord = serde_json::from_value(document)?;
    if record.id.trim().is_empty() {
        record.id = uuid::Uuid::new_v4().to_string();
    }
    Ok(record)
}

/// CLI entry point for `trec import`.
pub async fn run_import(config: &Config, path: &Path, dry_run: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let parsed = parse_export(&content)?;

    for (index, reason) in &parsed.rejected {
        tracing::warn!(index, %reason, "rejected itinerary document");
    }

    if dry_run {
        println!("Import dry run: {}", path.display());
        println!("  valid documents: {}", parsed.records.len());
        println!("  rejected documents: {}", parsed.rejected.len());
        return Ok(());
    }

    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    let store = SqliteStore::new(pool);

    for record in &parsed.records {
        store
            .upsert(record)
            .await
            .with_context(|| format!("Failed to store itinerary {}", record.id))?;
    }

    println!("imported itineraries: {}", parsed.records.len());
    println!("rejected documents: {}", parsed.rejected.len());

    store.pool().close().await;
    Ok(())
}
