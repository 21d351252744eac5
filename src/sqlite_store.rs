//! SQLite-backed [`ItineraryStore`] implementation.
//!
//! Category intersection is pushed down to SQL via `json_each` over the
//! stored `categories_json` array. The cost criterion is applied in Rust
//! with [`ItineraryFilter::matches`] so trimming and number parsing behave
//! exactly like the in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use trip_recommender_core::models::ItineraryRecord;
use trip_recommender_core::query::ItineraryFilter;
use trip_recommender_core::store::ItineraryStore;

const SELECT_COLUMNS: &str = "SELECT i.id, i.title, i.categories_json, i.image, i.average_time, \
     i.average_cost, i.location, i.description FROM itineraries i";

/// SQLite implementation of the [`ItineraryStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Number of itineraries tagged with a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Itinerary counts per category, most common first.
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let rows = sqlx::query(
            r#"
            SELECT je.value AS category, COUNT(*) AS count
            FROM itineraries i, json_each(i.categories_json) je
            GROUP BY je.value
            ORDER BY count DESC, category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| CategoryCount {
                category: row.get("category"),
                count: row.get("count"),
            })
            .collect())
    }

    /// Unix timestamp of the most recent insert or update, if any.
    pub async fn last_updated(&self) -> Result<Option<i64>> {
        let ts: Option<i64> = sqlx::query_scalar("SELECT MAX(updated_at) FROM itineraries")
            .fetch_one(&self.pool)
            .await?;
        Ok(ts)
    }

    /// The first itinerary in store order, if any.
    pub async fn first(&self) -> Result<Option<ItineraryRecord>> {
        let sql = format!("{} ORDER BY i.rowid LIMIT 1", SELECT_COLUMNS);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(record_from_row))
    }

    /// Rows whose categories intersect the filter's set, in store order.
    async fn fetch_category_candidates(
        &self,
        filter: &ItineraryFilter,
    ) -> Result<Vec<ItineraryRecord>> {
        let mut sql = String::from(SELECT_COLUMNS);
        let categories_json = category_param(filter)?;
        if categories_json.is_some() {
            sql.push_str(CATEGORY_CLAUSE);
        }
        sql.push_str(" ORDER BY i.rowid");

        let mut query = sqlx::query(&sql);
        if let Some(json) = categories_json {
            query = query.bind(json);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(record_from_row).collect())
    }
}

/// The requested set is bound as a single JSON array, so the number of
/// categories never runs into SQLite's bind-variable limit.
const CATEGORY_CLAUSE: &str = " WHERE EXISTS (SELECT 1 FROM json_each(i.categories_json) je \
     WHERE je.value IN (SELECT value FROM json_each(?)))";

fn category_param(filter: &ItineraryFilter) -> Result<Option<String>> {
    match &filter.categories {
        Some(categories) => Ok(Some(serde_json::to_string(categories)?)),
        None => Ok(None),
    }
}

fn record_from_row(row: &SqliteRow) -> ItineraryRecord {
    let categories_json: Option<String> = row.get("categories_json");
    ItineraryRecord {
        id: row.get("id"),
        title: row.get("title"),
        // Unreadable category arrays surface as missing, so the record is
        // skipped by normalization.
        categories: categories_json.and_then(|json| serde_json::from_str(&json).ok()),
        image: row.get("image"),
        average_time: row.get("average_time"),
        average_cost: row.get("average_cost"),
        location: row.get("location"),
        description: row.get("description"),
    }
}

fn has_empty_category_set(filter: &ItineraryFilter) -> bool {
    matches!(&filter.categories, Some(c) if c.is_empty())
}

#[async_trait]
impl ItineraryStore for SqliteStore {
    async fn find(&self, filter: &ItineraryFilter) -> Result<Vec<ItineraryRecord>> {
        if has_empty_category_set(filter) {
            return Ok(Vec::new());
        }
        let mut records = self.fetch_category_candidates(filter).await?;
        records.retain(|r| filter.matches(r));
        Ok(records)
    }

    async fn count(&self, filter: &ItineraryFilter) -> Result<i64> {
        if has_empty_category_set(filter) {
            return Ok(0);
        }
        if filter.cost.is_some() {
            return Ok(self.find(filter).await?.len() as i64);
        }

        let mut sql = String::from("SELECT COUNT(*) FROM itineraries i");
        let categories_json = category_param(filter)?;
        if categories_json.is_some() {
            sql.push_str(CATEGORY_CLAUSE);
        }
        let mut query = sqlx::query_scalar(&sql);
        if let Some(json) = categories_json {
            query = query.bind(json);
        }
        let count: i64 = query.fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn upsert(&self, record: &ItineraryRecord) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let categories_json = match &record.categories {
            Some(c) => Some(serde_json::to_string(c)?),
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO itineraries (id, title, categories_json, image, average_time,
                                     average_cost, location, description,
                                     created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                categories_json = excluded.categories_json,
                image = excluded.image,
                average_time = excluded.average_time,
                average_cost = excluded.average_cost,
                location = excluded.location,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&categories_json)
        .bind(&record.image)
        .bind(&record.average_time)
        .bind(&record.average_cost)
        .bind(&record.location)
        .bind(&record.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(record.id.clone())
    }
}
