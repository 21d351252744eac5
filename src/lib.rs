//! # Trip Recommender
//!
//! **Budget- and category-driven itinerary recommendations over HTTP.**
//!
//! Given a budget and a set of categories, the service looks up itineraries
//! whose categories intersect the request, first by exact cost and then,
//! if nothing matched exactly, within a price band around the budget. The
//! results are ranked by distance from the budget and the closest few are
//! returned with a price-match label.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────┐   ┌──────────┐
//! │  JSON export │──▶│ trec import           │──▶│  SQLite  │
//! └──────────────┘   └───────────────────────┘   └────┬─────┘
//!                                                     │
//!                      ┌──────────────────────────────┤
//!                      ▼                              ▼
//!                 ┌──────────┐                  ┌──────────┐
//!                 │   CLI    │                  │   HTTP   │
//!                 │  (trec)  │                  │  server  │
//!                 └──────────┘                  └──────────┘
//! ```
//!
//! The matching, normalization, and ranking logic lives in the
//! `trip-recommender-core` crate and runs against any
//! [`ItineraryStore`](trip_recommender_core::ItineraryStore).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Schema creation (idempotent) |
//! | [`sqlite_store`] | SQLite-backed `ItineraryStore` |
//! | [`import`] | JSON export import |
//! | [`stats`] | Store counts and a sample record |
//! | [`recommend_cmd`] | One-shot recommendations from the CLI |
//! | [`server`] | HTTP server (Axum) with CORS |

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod migrate;
pub mod recommend_cmd;
pub mod server;
pub mod sqlite_store;
pub mod stats;

pub use trip_recommender_core::store;
