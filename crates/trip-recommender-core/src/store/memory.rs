//! In-memory [`ItineraryStore`] implementation for tests and embedding.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`; insertion order is
//! the store order. Filtering is a linear scan with
//! [`ItineraryFilter::matches`].

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::ItineraryRecord;
use crate::query::ItineraryFilter;

use super::ItineraryStore;

/// In-memory itinerary store.
pub struct InMemoryStore {
    records: RwLock<Vec<ItineraryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<ItineraryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl ItineraryStore for InMemoryStore {
    async fn find(&self, filter: &ItineraryFilter) -> Result<Vec<ItineraryRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ItineraryFilter) -> Result<i64> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as i64)
    }

    async fn upsert(&self, record: &ItineraryRecord) -> Result<String> {
        let mut records = self.records.write().map_err(poisoned)?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record.id.clone())
    }
}
