//! HTTP integration tests — gateway → reqwest → mock BotEmail service.

use axum::extract::{Path, Request};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use botemail_mcp::types::RemoteConfig;
use botemail_mcp::{Gateway, ToolCall, ToolResult};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;

fn auth_of(headers: &HeaderMap) -> Value {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null)
}

async fn create_account(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    // Account creation is unauthenticated; any credential header is a client bug.
    if headers.contains_key("authorization") {
        return Json(json!({"error": "unexpected Authorization header"}));
    }
    if body["username"] == "taken" {
        return Json(json!({"error": "Username already taken"}));
    }
    Json(json!({
        "email": format!("{}_bot@botemail.ai", body["username"].as_str().unwrap_or("")),
        "apiKey": "generated-key",
        "message": "Account created",
        "createdAt": "2026-01-01T00:00:00Z",
    }))
}

async fn inbox(Path(email): Path<String>, headers: HeaderMap, request: Request) -> Response {
    match email.as_str() {
        "html@x" => (StatusCode::BAD_GATEWAY, Html("<html>Bad Gateway</html>")).into_response(),
        "slow@x" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"emails": []})).into_response()
        }
        "forbidden@x" => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid API key"})),
        )
            .into_response(),
        _ => Json(json!({
            "email": email,
            "rawPath": request.uri().path(),
            "auth": auth_of(&headers),
            "emails": [{"id": "m1", "subject": "Welcome"}],
        }))
        .into_response(),
    }
}

async fn message(
    Path((email, id)): Path<(String, String)>,
    headers: HeaderMap,
    request: Request,
) -> Json<Value> {
    Json(json!({
        "email": email,
        "id": id,
        "rawPath": request.uri().path(),
        "auth": auth_of(&headers),
        "subject": "Welcome",
    }))
}

async fn register_webhook(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    // Non-2xx with a JSON success body: status must not matter.
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "received": body,
            "auth": auth_of(&headers),
        })),
    )
}

async fn start_mock() -> String {
    let app = Router::new()
        .route("/api/create-account", post(create_account))
        .route("/api/emails/{email}", get(inbox))
        .route("/api/emails/{email}/{id}", get(message))
        .route("/api/webhook/register", post(register_webhook));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn gateway() -> Gateway {
    let config = RemoteConfig {
        base_url: start_mock().await,
        timeout: Duration::from_secs(2),
        ..RemoteConfig::default()
    };
    Gateway::new(&config).unwrap()
}

fn parsed(result: &ToolResult) -> Value {
    assert!(!result.is_error, "unexpected error: {}", result.text());
    serde_json::from_str(result.text()).unwrap()
}

#[tokio::test]
async fn test_create_bot_email_selects_fields() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("create_bot_email", json!({"username": "mybot"})))
        .await;
    assert_eq!(
        parsed(&result),
        json!({
            "email": "mybot_bot@botemail.ai",
            "apiKey": "generated-key",
            "message": "Account created",
        })
    );
}

#[tokio::test]
async fn test_create_bot_email_sends_no_credential() {
    let config = RemoteConfig {
        base_url: start_mock().await,
        default_api_key: Some("default-key".to_string()),
        timeout: Duration::from_secs(2),
    };
    let gw = Gateway::new(&config).unwrap();
    let result = gw
        .dispatch(ToolCall::new(
            "create_bot_email",
            json!({"username": "mybot", "apiKey": "caller-key"}),
        ))
        .await;
    assert_eq!(parsed(&result)["apiKey"], "generated-key");
}

#[tokio::test]
async fn test_create_bot_email_remote_rejection() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("create_bot_email", json!({"username": "taken"})))
        .await;
    assert_eq!(result, ToolResult::error("Username already taken"));
}

#[tokio::test]
async fn test_get_emails_sends_bearer_and_encoded_path() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("get_emails", json!({"email": "bot@x", "apiKey": "secret"})))
        .await;
    let payload = parsed(&result);
    assert_eq!(payload["auth"], "Bearer secret");
    assert_eq!(payload["rawPath"], "/api/emails/bot%40x");
    assert_eq!(payload["email"], "bot@x");
    assert_eq!(payload["emails"][0]["id"], "m1");
}

#[tokio::test]
async fn test_get_email_by_id() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new(
            "get_email_by_id",
            json!({"email": "bot@x", "emailId": "m1", "apiKey": "secret"}),
        ))
        .await;
    let payload = parsed(&result);
    assert_eq!(payload["rawPath"], "/api/emails/bot%40x/m1");
    assert_eq!(payload["id"], "m1");
    assert_eq!(payload["auth"], "Bearer secret");
}

#[tokio::test]
async fn test_register_webhook_body_and_no_auth_header() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new(
            "register_webhook",
            json!({"email": "bot@x", "webhookUrl": "https://hooks.example/mail", "apiKey": "secret"}),
        ))
        .await;
    let payload = parsed(&result);
    assert_eq!(
        payload["received"],
        json!({"botEmail": "bot@x", "webhookUrl": "https://hooks.example/mail", "apiKey": "secret"})
    );
    assert_eq!(payload["auth"], Value::Null);
    assert_eq!(payload["success"], true);
}

#[tokio::test]
async fn test_error_status_with_json_error_body() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("get_emails", json!({"email": "forbidden@x", "apiKey": "bad"})))
        .await;
    assert_eq!(result, ToolResult::error("Invalid API key"));
}

#[tokio::test]
async fn test_non_json_body_is_error_envelope() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("get_emails", json!({"email": "html@x", "apiKey": "k"})))
        .await;
    assert!(result.is_error);
    assert!(result.text().starts_with("Error: invalid JSON response"));
    assert!(result.text().contains("HTTP 502"));
}

#[tokio::test]
async fn test_timeout_is_error_envelope() {
    let gw = gateway().await;
    let result = gw
        .dispatch(ToolCall::new("get_emails", json!({"email": "slow@x", "apiKey": "k"})))
        .await;
    assert_eq!(result, ToolResult::error("request timed out after 2s"));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let gw = gateway().await;
    let calls = (0..8).map(|i| {
        let gw = gw.clone();
        async move {
            gw.dispatch(ToolCall::new(
                "get_emails",
                json!({"email": format!("bot{}@x", i), "apiKey": format!("key-{}", i)}),
            ))
            .await
        }
    });
    let results = futures::future::join_all(calls).await;
    for (i, result) in results.iter().enumerate() {
        let payload = parsed(result);
        assert_eq!(payload["email"], format!("bot{}@x", i));
        assert_eq!(payload["auth"], format!("Bearer key-{}", i));
    }
}
