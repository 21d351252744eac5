//! HTTP-level tests for the recommendation server.
//!
//! Each test starts `run_server_with_store` on a free port with an
//! in-memory store and talks to it over real HTTP.

use serde_json::{json, Value};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use trip_recommender::config::Config;
use trip_recommender::server::{router, run_server_with_store};
use trip_recommender::store::InMemoryStore;
use trip_recommender_core::query::ItineraryFilter;
use trip_recommender_core::{ItineraryRecord, ItineraryStore, RecommendParams};

// ─── Helpers ────────────────────────────────────────────────────────

fn test_config(port: u16, extra: &str) -> Config {
    let config_content = format!(
        r#"[db]
path = "./unused.sqlite"

[server]
bind = "127.0.0.1:{}"
{}
"#,
        port, extra
    );
    toml::from_str(&config_content).unwrap()
}

fn itinerary(id: &str, categories: &[&str], cost: Value) -> ItineraryRecord {
    serde_json::from_value(json!({
        "_id": id,
        "title": format!("Trip {}", id),
        "categories": categories,
        "image": format!("{}.jpg", id),
        "averageTime": "2 days",
        "averageCost": cost,
        "location": "Sri Lanka",
    }))
    .unwrap()
}

fn fixture() -> Vec<ItineraryRecord> {
    vec![
        itinerary("beach-5000", &["beach"], json!("5000")),
        itinerary("beach-4000", &["beach"], json!("4000")),
        itinerary("surf-6000", &["surf"], json!(6000)),
        itinerary("hike-5000", &["hiking"], json!("5000")),
        itinerary("beach-9000", &["beach"], json!("9000")),
    ]
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start_server(records: Vec<ItineraryRecord>, extra: &str) -> (u16, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let cfg = test_config(port, extra);
    let store = Arc::new(InMemoryStore::with_records(records));
    let handle = tokio::spawn(async move {
        run_server_with_store(&cfg, store).await.ok();
    });
    wait_for_server(port).await;
    (port, handle)
}

/// Answers counts but fails every lookup.
struct BrokenLookupStore;

#[async_trait]
impl ItineraryStore for BrokenLookupStore {
    async fn find(&self, _filter: &ItineraryFilter) -> anyhow::Result<Vec<ItineraryRecord>> {
        Err(anyhow!("disk I/O error at /var/lib/secret.sqlite"))
    }

    async fn count(&self, _filter: &ItineraryFilter) -> anyhow::Result<i64> {
        Ok(0)
    }

    async fn upsert(&self, record: &ItineraryRecord) -> anyhow::Result<String> {
        Ok(record.id.clone())
    }
}

/// Fails every operation.
struct UnavailableStore;

#[async_trait]
impl ItineraryStore for UnavailableStore {
    async fn find(&self, _filter: &ItineraryFilter) -> anyhow::Result<Vec<ItineraryRecord>> {
        Err(anyhow!("connection refused"))
    }

    async fn count(&self, _filter: &ItineraryFilter) -> anyhow::Result<i64> {
        Err(anyhow!("connection refused"))
    }

    async fn upsert(&self, _record: &ItineraryRecord) -> anyhow::Result<String> {
        Err(anyhow!("connection refused"))
    }
}

async fn post_recommend(port: u16, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/services/recommend", port))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn ids(body: &Value) -> Vec<&str> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["_id"].as_str().unwrap())
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exact_match_response_shape() {
    let (port, server) = start_server(fixture(), "").await;

    let (status, body) =
        post_recommend(port, json!({"budget": 5000, "categories": ["beach"]})).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec!["beach-5000"]);

    let rec = &body["recommendations"][0];
    assert_eq!(rec["title"], "Trip beach-5000");
    assert_eq!(rec["averageTime"], "2 days");
    assert_eq!(rec["averageCost"], 5000.0);
    assert_eq!(rec["description"], "No description available");
    assert_eq!(rec["priceMatch"], "Exact price match");

    assert_eq!(body["meta"]["budget"], 5000.0);
    assert_eq!(body["meta"]["price_range"], 2000.0);
    assert_eq!(body["meta"]["categories"], json!(["beach"]));
    assert_eq!(body["meta"]["num_exact_matches"], 1);

    server.abort();
}

#[tokio::test]
async fn test_range_fallback_sorted_by_distance() {
    let (port, server) = start_server(fixture(), "").await;

    let (status, body) = post_recommend(
        port,
        json!({"budget": 5500, "categories": ["beach", "surf"]}),
    )
    .await;
    assert_eq!(status, 200);
    // 500 over, 500 under (tie keeps store order), 1500 under. 9000 is out of range.
    assert_eq!(ids(&body), vec!["beach-5000", "surf-6000", "beach-4000"]);
    assert_eq!(
        body["recommendations"][0]["priceMatch"],
        "Under budget by Rs 500.00"
    );
    assert_eq!(
        body["recommendations"][1]["priceMatch"],
        "Over budget by Rs 500.00"
    );
    assert_eq!(body["meta"]["num_exact_matches"], 0);

    server.abort();
}

#[tokio::test]
async fn test_budget_as_numeric_string() {
    let (port, server) = start_server(fixture(), "").await;

    let (status, body) =
        post_recommend(port, json!({"budget": "5000", "categories": ["beach"]})).await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["beach-5000"]);

    server.abort();
}

#[tokio::test]
async fn test_results_capped() {
    let records = (0..8)
        .map(|i| itinerary(&format!("b{}", i), &["beach"], json!(format!("{}", 4000 + i * 100))))
        .collect();
    let (port, server) = start_server(records, "").await;

    let (status, body) =
        post_recommend(port, json!({"budget": 4750, "categories": ["beach"]})).await;
    assert_eq!(status, 200);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);

    server.abort();
}

#[tokio::test]
async fn test_configured_params() {
    let (port, server) = start_server(
        fixture(),
        "\n[recommend]\nprice_range = 500.0\nmax_results = 1\n",
    )
    .await;

    let (status, body) = post_recommend(
        port,
        json!({"budget": 5500, "categories": ["beach", "surf"]}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["beach-5000"]);
    assert_eq!(body["meta"]["price_range"], 500.0);

    server.abort();
}

#[tokio::test]
async fn test_no_match_is_404() {
    let (port, server) = start_server(fixture(), "").await;

    let (status, body) =
        post_recommend(port, json!({"budget": 5000, "categories": ["safari"]})).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "No itineraries found matching both categories and price criteria"
    );

    let (status, _) = post_recommend(port, json!({"budget": 5000, "categories": []})).await;
    assert_eq!(status, 404);

    server.abort();
}

#[tokio::test]
async fn test_invalid_requests_are_400() {
    let (port, server) = start_server(fixture(), "").await;

    for body in [
        json!({"categories": ["beach"]}),
        json!({"budget": 5000}),
        json!({"budget": "cheap", "categories": ["beach"]}),
        json!({"budget": 5000, "categories": "beach"}),
        json!([1, 2, 3]),
    ] {
        let (status, resp) = post_recommend(port, body.clone()).await;
        assert_eq!(status, 400, "expected 400 for {}", body);
        assert_eq!(resp["success"], false);
        assert_eq!(resp["error"], "Budget and categories array are required");
    }

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/services/recommend", port))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Budget and categories array are required");

    server.abort();
}

#[tokio::test]
async fn test_rejected_body_keeps_extractor_status() {
    let (port, server) = start_server(fixture(), "").await;

    // No content-type header.
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/services/recommend", port))
        .body(r#"{"budget": 5000, "categories": ["beach"]}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 415);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Budget and categories array are required");

    server.abort();
}

#[tokio::test]
async fn test_health_reports_count() {
    let (port, server) = start_server(fixture(), "").await;

    let body: Value = reqwest::get(format!("http://127.0.0.1:{}/health", port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["itineraries"], 5);
    assert!(body["version"].is_string());

    server.abort();
}

#[tokio::test]
async fn test_cors_preflight() {
    let (port, server) = start_server(fixture(), "").await;

    let resp = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://127.0.0.1:{}/services/recommend", port),
        )
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    server.abort();
}

#[tokio::test]
async fn test_store_failure_is_500_without_detail() {
    let port = find_free_port();
    let cfg = test_config(port, "");
    let server = tokio::spawn(async move {
        run_server_with_store(&cfg, Arc::new(BrokenLookupStore))
            .await
            .ok();
    });
    wait_for_server(port).await;

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/services/recommend", port))
        .json(&json!({"budget": 5000, "categories": ["beach"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let text = resp.text().await.unwrap();
    assert!(!text.contains("secret"));
    assert!(!text.contains("disk I/O"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({"success": false, "error": "Internal server error"}));

    server.abort();
}

#[tokio::test]
async fn test_startup_fails_when_store_unavailable() {
    let cfg = test_config(find_free_port(), "");
    let result = run_server_with_store(&cfg, Arc::new(UnavailableStore)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_health_unavailable_is_503() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let app = router(Arc::new(UnavailableStore), RecommendParams::default());
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let resp = reqwest::get(format!("http://127.0.0.1:{}/health", port))
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "unavailable");
    assert!(body["version"].is_string());
    assert!(body.get("itineraries").is_none());

    server.abort();
}
