//! End-to-end API flows through the full middleware stack.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{
    authed_json_request, authed_request, build_default_app, json_request, response_json, TestApp,
    CLIENT_ADDR,
};

async fn register_and_login(app: &TestApp, email: &str) -> (String, String, String) {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/new",
            CLIENT_ADDR,
            &json!({ "name": "Ada", "email": email, "password": "correct horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = response_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            CLIENT_ADDR,
            &json!({ "email": email, "password": "correct horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    (
        user_id,
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn register_login_then_access_protected_route() {
    let app = build_default_app();
    let (user_id, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/users/id/{user_id}"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    // The stored hash must never appear in any response.
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = build_default_app();
    register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/login",
            CLIENT_ADDR,
            &json!({ "email": "ada@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = build_default_app();
    register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/new",
            CLIENT_ADDR,
            &json!({ "name": "Imposter", "email": "ada@example.com", "password": "whatever1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_exchanges_token_for_new_access_token() {
    let app = build_default_app();
    let (user_id, _, refresh) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/refresh",
            CLIENT_ADDR,
            &json!({ "id": user_id, "token": refresh }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let access = response_json(response).await["access_token"].as_str().unwrap().to_string();
    let response = app
        .router
        .oneshot(authed_request("GET", "/users/all", CLIENT_ADDR, &access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_with_mismatched_id_is_unauthorized() {
    let app = build_default_app();
    let (_, _, refresh) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/refresh",
            CLIENT_ADDR,
            &json!({ "id": "u_somebody-else", "token": refresh }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let app = build_default_app();
    let (user_id, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users/refresh",
            CLIENT_ADDR,
            &json!({ "id": user_id, "token": access }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn item_crud_round_trip() {
    let app = build_default_app();
    let (_, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/items/new",
            CLIENT_ADDR,
            &access,
            &json!({ "name": "Widget", "price": 9.99, "inventory": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let item_id = response_json(response).await["id"].as_str().unwrap().to_string();
    assert!(item_id.starts_with("i_"));

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/items/item/update",
            CLIENT_ADDR,
            &access,
            &json!({ "id": item_id, "name": "Widget v2", "price": 12.5, "inventory": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/items/item/{item_id}"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["name"], "Widget v2");
    assert!(body["updated_at"].is_i64());

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/items/item/{item_id}/delete"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            &format!("/items/item/{item_id}"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_creation_requires_a_name() {
    let app = build_default_app();
    let (_, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(authed_json_request(
            "POST",
            "/items/new",
            CLIENT_ADDR,
            &access,
            &json!({ "name": "  ", "price": 1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn event_creation_validates_dates() {
    let app = build_default_app();
    let (_, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/events/new",
            CLIENT_ADDR,
            &access,
            &json!({ "name": "Launch", "start_date": 0, "end_date": 1700000000000i64 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(authed_json_request(
            "POST",
            "/events/new",
            CLIENT_ADDR,
            &access,
            &json!({
                "name": "Launch",
                "start_date": 1700000000000i64,
                "end_date": 1700003600000i64,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn chat_messages_flow() {
    let app = build_default_app();
    let (user_id, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/chats/new",
            CLIENT_ADDR,
            &access,
            &json!({ "name": "general", "members": [user_id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let chat_id = response_json(response).await["id"].as_str().unwrap().to_string();
    assert!(chat_id.starts_with("c_"));

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/chats/chat/{chat_id}/messages/new"),
            CLIENT_ADDR,
            &access,
            &json!({ "sender": user_id, "body": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let message_id = response_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/chats/chat/{chat_id}/messages"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    let messages = response_json(response).await;
    assert_eq!(messages.as_array().unwrap().len(), 1);
    assert_eq!(messages[0]["body"], "hello");

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/chats/chat/{chat_id}/messages/message/{message_id}/delete"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            &format!("/chats/chat/{chat_id}/messages"),
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    let messages = response_json(response).await;
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_creation_requires_user_and_status() {
    let app = build_default_app();
    let (user_id, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/orders/new",
            CLIENT_ADDR,
            &access,
            &json!({ "user": "", "status": "pending" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(authed_json_request(
            "POST",
            "/orders/new",
            CLIENT_ADDR,
            &access,
            &json!({ "user": user_id, "status": "pending", "items": ["i_1"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn maps_routes_answer_503_when_unconfigured() {
    let app = build_default_app();
    let (_, access, _) = register_and_login(&app, "ada@example.com").await;

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            "/maps/geocode/1600%20Pennsylvania%20Ave",
            CLIENT_ADDR,
            &access,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn upload_then_download_round_trips() {
    let app = build_default_app();
    let (_, access, _) = register_and_login(&app, "ada@example.com").await;

    let upload = axum::http::Request::builder()
        .method("POST")
        .uri("/upload?name=report.txt")
        .extension(axum::extract::ConnectInfo(CLIENT_ADDR))
        .header("authorization", format!("Bearer {access}"))
        .body(axum::body::Body::from("file contents"))
        .unwrap();
    let response = app.router.clone().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .clone()
        .oneshot(authed_request("GET", "/download?name=report.txt", CLIENT_ADDR, &access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"file contents");

    let response = app
        .router
        .oneshot(authed_request("GET", "/download?name=missing.txt", CLIENT_ADDR, &access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
