//! Integration tests for the directory cache over HTTP.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::spawn_upstream;
use covin_client::directory::{DirectoryCache, HttpDirectorySource};
use covin_client::http::HttpAccess;
use serde_json::json;

fn router() -> Router {
    Router::new()
        .route(
            "/districts",
            get(|| async {
                Json(json!({
                    "districts": [
                        {"district_id": 296, "district_name": "Thiruvananthapuram", "state_id": 17},
                        {"district_id": 571, "district_name": "Chennai", "state_id": 31},
                        {"district_id": 307, "district_name": "Ernakulam", "state_id": 17}
                    ],
                    "ttl": 24
                }))
            }),
        )
        .route(
            "/all_centers.json",
            get(|| async {
                Json(json!([
                    {"centerId": 11, "name": "PHC Vellanad", "districtId": 296, "stateId": 17},
                    {"centerId": 12, "name": "GH Ernakulam", "districtId": 307, "stateId": 17},
                    {"centerId": 13, "name": "CHC Kallara", "districtId": 296, "stateId": 17}
                ]))
            }),
        )
}

fn cache(base: &str) -> DirectoryCache {
    let source = HttpDirectorySource::new(
        HttpAccess::new(),
        format!("{base}/districts"),
        format!("{base}/all_centers.json"),
        17,
    );
    DirectoryCache::new(Arc::new(source), 17)
}

// ---------------------------------------------------------------------------
// Test: each document is fetched once and filtered locally afterwards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn documents_fetched_once() {
    let (base, log) = spawn_upstream(router()).await;
    let cache = cache(&base);

    let districts = cache.districts().await.unwrap();
    let again = cache.districts().await.unwrap();
    assert!(Arc::ptr_eq(&districts, &again));
    let names: Vec<&str> = districts.iter().map(|d| d.district_name.as_str()).collect();
    assert_eq!(names, vec!["Thiruvananthapuram", "Ernakulam"]);

    let tvm = cache.centers(296).await.unwrap();
    let ekm = cache.centers(307).await.unwrap();
    assert_eq!(tvm.iter().map(|c| c.center_id).collect::<Vec<_>>(), vec![11, 13]);
    assert_eq!(ekm.len(), 1);
    assert!(cache.centers(571).await.unwrap().is_empty());

    assert_eq!(log.to_path("/districts").len(), 1);
    assert_eq!(log.to_path("/all_centers.json").len(), 1);
}

#[tokio::test]
async fn district_lookup_is_restricted_to_state() {
    let (base, _log) = spawn_upstream(router()).await;
    let cache = cache(&base);

    assert_eq!(
        cache.district(307).await.unwrap().map(|d| d.district_name),
        Some("Ernakulam".to_string())
    );
    assert_eq!(cache.district(571).await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Test: a failed first fetch propagates and is retried on the next read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_fetch_propagates_and_is_not_cached() {
    let router = Router::new().route(
        "/districts",
        get(|| async { (StatusCode::BAD_GATEWAY, "nope") }),
    );
    let (base, log) = spawn_upstream(router).await;
    let cache = cache(&base);

    assert_eq!(cache.districts().await.unwrap_err().status(), Some(502));
    assert!(cache.districts().await.is_err());
    assert_eq!(log.to_path("/districts").len(), 2);
}

// ---------------------------------------------------------------------------
// Test: a per-state envelope without state ids lists the state's districts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_envelope_without_state_ids_lists_districts() {
    let router = Router::new().route(
        "/districts",
        get(|| async {
            Json(json!({
                "districts": [
                    {"district_id": 296, "district_name": "Thiruvananthapuram"},
                    {"district_id": 307, "district_name": "Ernakulam"}
                ],
                "ttl": 24
            }))
        }),
    );
    let (base, _log) = spawn_upstream(router).await;
    let cache = cache(&base);

    let districts = cache.districts().await.unwrap();
    let ids: Vec<_> = districts.iter().map(|d| d.district_id).collect();
    assert_eq!(ids, vec![296, 307]);
    assert!(districts.iter().all(|d| d.state_id == 17));
}
