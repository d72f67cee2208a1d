//! Integration tests for the HTTP access layer against a local upstream.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{access_token, spawn_upstream};
use covin_client::error::{AuthError, ClientError};
use covin_client::http::HttpAccess;
use covin_client::session::TokenSession;
use serde_json::{json, Value};

fn router() -> Router {
    Router::new()
        .route("/ok", get(|| async { Json(json!({"hello": "world"})) }))
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route("/created", get(|| async { (StatusCode::CREATED, "{}") }))
}

// ---------------------------------------------------------------------------
// Test: 2xx responses are returned to the caller
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_statuses_pass_through() {
    let (base, _log) = spawn_upstream(router()).await;
    let http = HttpAccess::new();

    let body: Value = http.fetch_json(http.get(&format!("{base}/ok"))).await.unwrap();
    assert_eq!(body["hello"], "world");

    let response = http.public_fetch(http.get(&format!("{base}/created"))).await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
}

// ---------------------------------------------------------------------------
// Test: non-2xx responses become ClientError::Http with status and body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_http_error() {
    let (base, log) = spawn_upstream(router()).await;
    let http = HttpAccess::new();

    let err = http
        .public_fetch(http.get(&format!("{base}/boom")))
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Http { status: 500, ref body } if body == "upstream exploded");

    // One attempt only.
    assert_eq!(log.to_path("/boom").len(), 1);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (base, _log) = spawn_upstream(router()).await;
    let http = HttpAccess::new();
    let err = http
        .public_fetch(http.get(&format!("{base}/missing")))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ---------------------------------------------------------------------------
// Test: authenticated fetch attaches the bearer token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_fetch_attaches_bearer_token() {
    let (base, log) = spawn_upstream(router()).await;
    let http = HttpAccess::new();
    let token = access_token("asha");
    let session = TokenSession::new(Some(token.clone()), None);

    http.auth_fetch(http.get(&format!("{base}/ok")), &session)
        .await
        .unwrap();

    let seen = log.to_path("/ok");
    assert_eq!(seen[0].authorization.as_deref(), Some(format!("Bearer {token}").as_str()));
}

#[tokio::test]
async fn auth_fetch_without_session_sends_nothing() {
    let (base, log) = spawn_upstream(router()).await;
    let http = HttpAccess::new();
    let session = TokenSession::signed_out();

    let err = http
        .auth_fetch(http.get(&format!("{base}/ok")), &session)
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Auth(AuthError::NoSession));
    assert!(log.all().is_empty());
}

// ---------------------------------------------------------------------------
// Test: connection failures surface as Fetch errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_host_is_fetch_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = HttpAccess::new();
    let err = http
        .public_fetch(http.get(&format!("http://{addr}/ok")))
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Fetch(_));
}
