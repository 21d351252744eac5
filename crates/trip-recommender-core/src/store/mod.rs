//! Storage abstraction for itineraries.
//!
//! The [`ItineraryStore`] trait is everything the recommendation pipeline
//! needs from a backing store. Implementations must be `Send + Sync` so a
//! single handle can be shared across concurrent requests.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ItineraryRecord;
use crate::query::ItineraryFilter;

pub use memory::InMemoryStore;

/// Abstract itinerary store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find`](ItineraryStore::find) | Records matching a filter, in store order |
/// | [`count`](ItineraryStore::count) | Number of matching records (diagnostics) |
/// | [`upsert`](ItineraryStore::upsert) | Insert or replace a record by id (import only) |
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Return matching records in store order.
    ///
    /// Results must agree with [`ItineraryFilter::matches`].
    async fn find(&self, filter: &ItineraryFilter) -> Result<Vec<ItineraryRecord>>;

    /// Count matching records.
    async fn count(&self, filter: &ItineraryFilter) -> Result<i64>;

    /// Insert or replace a record, returning its id.
    async fn upsert(&self, record: &ItineraryRecord) -> Result<String>;
}
