//! Integration tests for the contact, projects, health, diagnostics and
//! metrics endpoints, driven through the full router and middleware stack

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use portfolio_api::{
    config::{Config, ProviderConfig, ProviderKind},
    handlers::AppState,
    middleware::REQUEST_ID_HEADER,
    server,
    storage::{FileStore, MemoryStore, Storage},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

fn memory_state(config: Config) -> AppState {
    AppState::new(Arc::new(config), Arc::new(MemoryStore::seeded()))
        .expect("should create AppState")
}

fn default_state() -> AppState {
    memory_state(Config::default())
}

/// State whose file store points at a directory that does not exist
fn disconnected_state(temp_dir: &TempDir) -> AppState {
    let store = FileStore::new(temp_dir.path().join("not-created"));
    AppState::new(Arc::new(Config::default()), Arc::new(store)).expect("should create AppState")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response should be JSON")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Contact
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_contact_valid_submission_is_created_and_stored() {
    let state = default_state();
    let response = send(
        server::router(state.clone()),
        post_json(
            "/api/contact",
            json!({ "name": "Jane", "email": "jane@example.com", "message": "Nice portfolio" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Message sent successfully" })
    );

    let stored = state.storage().contacts().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Jane");
    assert_eq!(stored[0].message, "Nice portfolio");
}

#[tokio::test]
async fn test_contact_missing_email_names_the_field() {
    let state = default_state();
    let response = send(
        server::router(state.clone()),
        post_json("/api/contact", json!({ "name": "Jane", "message": "Hello" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "email");
    assert!(state.storage().contacts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_contact_invalid_email_is_rejected() {
    let response = send(
        server::router(default_state()),
        post_json(
            "/api/contact",
            json!({ "name": "Jane", "email": "jane(at)example", "message": "Hello" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_contact_unavailable_when_storage_disconnected() {
    let temp_dir = TempDir::new().unwrap();
    let response = send(
        server::router(disconnected_state(&temp_dir)),
        post_json(
            "/api/contact",
            json!({ "name": "Jane", "email": "jane@example.com", "message": "Hello" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Database connection unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_contact_persists_to_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let state = AppState::new(Arc::new(Config::default()), Arc::new(store)).unwrap();

    let response = send(
        server::router(state),
        post_json(
            "/api/contact",
            json!({ "name": "Sam", "email": "sam@example.org", "message": "Let's talk" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let reopened = FileStore::new(temp_dir.path());
    let stored = reopened.contacts().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "sam@example.org");
}

#[tokio::test]
async fn test_contact_storage_failure_is_server_error() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the contacts file should be makes every append fail
    std::fs::create_dir(temp_dir.path().join("contacts.jsonl")).unwrap();
    let store = FileStore::new(temp_dir.path());
    let state = AppState::new(Arc::new(Config::default()), Arc::new(store)).unwrap();

    let response = send(
        server::router(state),
        post_json(
            "/api/contact",
            json!({ "name": "Sam", "email": "sam@example.org", "message": "Hello" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({ "message": "Server error" }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects and health
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_projects_lists_seeded_projects() {
    let response = send(server::router(default_state()), get("/api/projects")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Quiz Application"));
    assert!(titles.contains(&"DevOps Pipeline"));
}

#[tokio::test]
async fn test_projects_unavailable_when_storage_disconnected() {
    let temp_dir = TempDir::new().unwrap();
    let response = send(
        server::router(disconnected_state(&temp_dir)),
        get("/api/projects"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_reports_status_and_storage() {
    let response = send(server::router(default_state()), get("/api/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "OK", "message": "API is running", "database": "connected" })
    );
}

#[tokio::test]
async fn test_health_ok_with_disconnected_storage() {
    let temp_dir = TempDir::new().unwrap();
    let response = send(
        server::router(disconnected_state(&temp_dir)),
        get("/api/health"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["database"], "disconnected");
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ─────────────────────────────────────────────────────────────────────────────

fn keyed_config(reveal: bool) -> Config {
    let mut config = Config::default();
    config.provider = ProviderConfig::new(
        ProviderKind::ChatCompletions,
        Some("sk-live-abcdef123456".to_string()),
    );
    config.diagnostics.reveal_key_prefix = reveal;
    config
}

#[tokio::test]
async fn test_diagnostics_never_leaks_key_by_default() {
    for uri in ["/api/chat/debug", "/api/debug"] {
        let response = send(server::router(memory_state(keyed_config(false))), get(uri)).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["provider"]["keyExists"], true);
        assert!(body["provider"].get("keyPrefix").is_none());
        assert!(!body.to_string().contains("sk-live"));
    }
}

#[tokio::test]
async fn test_diagnostics_reveals_prefix_when_enabled() {
    let response = send(
        server::router(memory_state(keyed_config(true))),
        get("/api/chat/debug"),
    )
    .await;

    let body = json_body(response).await;
    assert_eq!(body["provider"]["keyPrefix"], "sk-li...");
    assert!(!body.to_string().contains("abcdef123456"));
}

#[tokio::test]
async fn test_diagnostics_reports_missing_key() {
    let response = send(server::router(default_state()), get("/api/chat/debug")).await;
    let body = json_body(response).await;

    assert_eq!(body["provider"]["keyExists"], false);
    assert_eq!(body["storage"]["uri"], "file://data...");
    assert_eq!(body["environment"]["port"], 5000);
}

#[tokio::test]
async fn test_diagnostics_not_mounted_when_disabled() {
    let mut config = Config::default();
    config.diagnostics.enabled = false;

    let response = send(server::router(memory_state(config)), get("/api/chat/debug")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-cutting
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_response_carries_request_id() {
    for request in [
        get("/api/health"),
        get("/api/projects"),
        post_json("/api/chat", json!({})),
    ] {
        let response = send(server::router(default_state()), request).await;
        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }
}

#[tokio::test]
async fn test_security_headers_present_on_errors() {
    let response = send(
        server::router(default_state()),
        post_json("/api/chat", json!({ "message": "" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
}

#[tokio::test]
async fn test_metrics_reflect_handled_requests() {
    let state = default_state();
    let app = server::router(state);

    let response = send(
        app.clone(),
        post_json("/api/chat", json!({ "message": "Where do you live?" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(app, get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#"portfolio_chat_requests_total{mode="fallback"} 1"#));
    assert!(text.contains(r#"portfolio_chat_fallbacks_total{reason="not_configured"} 1"#));
}
