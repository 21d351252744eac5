//! HTTP recommendation server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/services/recommend` | Budget/category recommendations (top matches by price proximity) |
//! | `GET`  | `/health` | Health check (version and itinerary count) |
//!
//! # Error Contract
//!
//! Every failure body has the same shape:
//!
//! ```json
//! { "success": false, "error": "No itineraries found matching both categories and price criteria" }
//! ```
//!
//! | Status | When |
//! |--------|------|
//! | 400 | Body is not JSON, or `budget` / `categories` missing or malformed |
//! | 413 / 415 | Body too large, or not sent as `application/json` |
//! | 404 | No valid itinerary matched |
//! | 500 | Store failure or any other internal error (detail is only logged) |
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser frontend
//! can call the service directly.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use trip_recommender_core::query::ItineraryFilter;
use trip_recommender_core::recommend::{FailureBody, INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use trip_recommender_core::{
    recommend, ItineraryStore, RecommendOutcome, RecommendParams, RecommendRequest,
    RecommendResponse, RequestError,
};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    /// Store handle built once at startup and shared read-only.
    store: Arc<dyn ItineraryStore>,
    params: Arc<RecommendParams>,
}

/// Starts the server against the configured SQLite database.
///
/// The schema is created if missing. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    run_server_with_store(config, Arc::new(SqliteStore::new(pool))).await
}

/// Starts the server with an explicitly supplied store.
///
/// Fails before binding if the store cannot answer a count query.
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<dyn ItineraryStore>,
) -> anyhow::Result<()> {
    let total = store
        .count(&ItineraryFilter::all())
        .await
        .map_err(|e| e.context("itinerary store unavailable at startup"))?;

    let app = router(store, config.recommend.params());

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        itineraries = total,
        "recommendation server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router. Exposed so callers can embed the service.
pub fn router(store: Arc<dyn ItineraryStore>, params: RecommendParams) -> Router {
    let state = AppState {
        store,
        params: Arc::new(params),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/services/recommend", post(handle_recommend))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(FailureBody::new(self.message))).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn not_found() -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: NOT_FOUND_MESSAGE.to_string(),
    }
}

/// Keep the extractor's status (400, 413, 415) with the shared client message.
fn rejected_body(rejection: JsonRejection) -> AppError {
    let status = rejection.status();
    let err = RequestError::MalformedBody(rejection.body_text());
    tracing::warn!(%status, error = %err, "rejected recommendation body");
    AppError {
        status,
        message: err.public_message().to_string(),
    }
}

/// Log the cause and hide it from the client.
fn internal(err: anyhow::Error) -> AppError {
    tracing::error!(error = %format!("{:#}", err), "error in recommendation");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: INTERNAL_ERROR_MESSAGE.to_string(),
    }
}

// ============ POST /services/recommend ============

async fn handle_recommend(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(body) = body.map_err(rejected_body)?;

    let req = RecommendRequest::from_json(&body).map_err(|e| {
        tracing::warn!(error = %e, "invalid recommendation request");
        bad_request(e.public_message())
    })?;

    match recommend(state.store.as_ref(), &req, &state.params)
        .await
        .map_err(internal)?
    {
        RecommendOutcome::Found(resp) => Ok(Json(resp)),
        RecommendOutcome::NotFound => Err(not_found()),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    /// `"ok"`, or `"unavailable"` when the store cannot be queried.
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    itineraries: Option<i64>,
}

async fn handle_health(State(state): State<AppState>) -> Response {
    let version = env!("CARGO_PKG_VERSION");
    match state.store.count(&ItineraryFilter::all()).await {
        Ok(count) => Json(HealthResponse {
            status: "ok",
            version,
            itineraries: Some(count),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version,
                    itineraries: None,
                }),
            )
                .into_response()
        }
    }
}
