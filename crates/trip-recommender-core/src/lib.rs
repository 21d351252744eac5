//! # Trip Recommender Core
//!
//! Pure recommendation logic for Trip Recommender: itinerary models, query
//! criteria, per-record normalization, proximity ranking, and the store
//! abstraction.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.
//! Backends implement [`store::ItineraryStore`]; frontends (CLI, HTTP)
//! call [`recommend::recommend`].
//!
//! ## Pipeline
//!
//! ```text
//! request ─▶ exact query ─┬─▶ normalize ─▶ rank ─▶ truncate ─▶ response
//!                         └─▶ range query (only when exact is empty)
//! ```

pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod rank;
pub mod recommend;
pub mod store;

pub use error::RequestError;
pub use models::{ItineraryRecord, PriceMatch, Recommendation};
pub use recommend::{
    recommend, RecommendMeta, RecommendOutcome, RecommendParams, RecommendRequest,
    RecommendResponse,
};
pub use store::ItineraryStore;
