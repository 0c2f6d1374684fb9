//! Admission pipeline ordering and interaction tests.
//!
//! These exercise the assembled router, not individual layers, and verify:
//!
//! 1. The rate limiter decides before anything else runs
//! 2. The auth gate covers every route except register, login, and refresh
//! 3. A denied request produces no handler side effects
//! 4. Distinct client IPs are rate limited independently

use axum::http::StatusCode;
use courier_core::store::RecordStore;
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceExt;

use crate::helpers::{
    authed_request, build_default_app, build_test_app, json_request, request, response_json,
    CLIENT_ADDR,
};

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = build_default_app();
    let response = app
        .router
        .oneshot(request("GET", "/items/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let app = build_default_app();
    let response = app
        .router
        .oneshot(authed_request("GET", "/items/all", CLIENT_ADDR, "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_valid_token_succeeds() {
    let app = build_default_app();
    let token = app.tokens.issue_access("u_test").unwrap();
    let response = app
        .router
        .oneshot(authed_request("GET", "/items/all", CLIENT_ADDR, &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_routes_skip_the_auth_gate() {
    // A malformed register payload must reach the handler (400), not be
    // stopped by the auth gate (401).
    let app = build_default_app();
    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/new",
            CLIENT_ADDR,
            &json!({ "name": "", "email": "", "password": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_route_is_public_but_still_verifies_the_token() {
    let app = build_default_app();
    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/refresh",
            CLIENT_ADDR,
            &json!({ "id": "u_x", "token": "not-a-refresh-token" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn exhausted_bucket_returns_429() {
    let app = build_test_app(0.001, 3);
    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/users/all", CLIENT_ADDR))
            .await
            .unwrap();
        // Auth rejects these, but they were admitted and spent tokens.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .router
        .oneshot(request("GET", "/users/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn rate_limit_decides_before_auth() {
    // With a zero-capacity window the very first denial must be 429 even
    // though the request also lacks a token. 429 proves the limiter ran
    // first; 401 would mean the auth gate saw a request it never should.
    let app = build_test_app(0.001, 1);
    let ok = app
        .router
        .clone()
        .oneshot(request("GET", "/orders/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::UNAUTHORIZED);

    let denied = app
        .router
        .oneshot(request("GET", "/orders/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn rate_limit_applies_to_public_routes_too() {
    let app = build_test_app(0.001, 1);
    let first = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            CLIENT_ADDR,
            &json!({ "email": "a@b.c", "password": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/login",
            CLIENT_ADDR,
            &json!({ "email": "a@b.c", "password": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn denied_request_leaves_no_side_effects() {
    let app = build_test_app(0.001, 1);

    // Spend the only token.
    let admitted = app
        .router
        .clone()
        .oneshot(request("GET", "/users/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(admitted.status(), StatusCode::UNAUTHORIZED);

    // This registration is denied by the limiter and must never reach the
    // handler, so no user record may appear.
    let denied = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/new",
            CLIENT_ADDR,
            &json!({ "name": "Eve", "email": "eve@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(app.store.scan("users").await.unwrap().is_empty());
}

#[tokio::test]
async fn distinct_client_ips_have_independent_buckets() {
    let app = build_test_app(0.001, 1);
    let other = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 40000);

    let first = app
        .router
        .clone()
        .oneshot(request("GET", "/users/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let denied = app
        .router
        .clone()
        .oneshot(request("GET", "/users/all", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client still has a full bucket.
    let fresh = app
        .router
        .oneshot(request("GET", "/users/all", other))
        .await
        .unwrap();
    assert_eq!(fresh.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_still_rate_limited() {
    let app = build_test_app(0.001, 1);
    let first = app
        .router
        .clone()
        .oneshot(request("GET", "/no/such/route", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::NOT_FOUND);

    let denied = app
        .router
        .oneshot(request("GET", "/no/such/route", CLIENT_ADDR))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
}
