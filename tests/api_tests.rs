// tests/api_tests.rs

use secure_input::{config::Config, routes, state::AppState};
use std::net::SocketAddr;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let config = Config {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        rust_log: "error".to_string(),
        log_dir: "logs".to_string(),
        max_body_bytes: 256 * 1024,
        max_field_chars: 200,
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };

    let state = AppState { config };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/health", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_path_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn sanitize_escapes_disallowed_tags() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/sanitize", address))
        .json(&serde_json::json!({
            "text": "<p>This tag is valid.</p><aside>This one is not.</aside>"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["html"],
        "<p>This tag is valid.</p>&lt;aside&gt;This one is not.&lt;/aside&gt;"
    );
}

#[tokio::test]
async fn sanitize_markdown_preset_renders_by_default() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .post(&format!("{}/api/sanitize", address))
        .json(&serde_json::json!({
            "text": "This text can be easily be\n\n marked down.",
            "preset": "markdown"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse json");

    assert_eq!(
        body["html"],
        "<p>This text can be easily be</p>\n<p>marked down.</p>"
    );

    // Markdown can be switched off explicitly.
    let body: serde_json::Value = client
        .post(&format!("{}/api/sanitize", address))
        .json(&serde_json::json!({
            "text": "*kept*",
            "preset": "markdown",
            "markdown": false
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["html"], "*kept*");
}

#[tokio::test]
async fn sanitize_rejects_oversized_text() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Fits the body limit but exceeds the text length rule.
    let text = "a".repeat(65537);
    let response = client
        .post(&format!("{}/api/sanitize", address))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn sanitize_rejects_unknown_preset() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/sanitize", address))
        .json(&serde_json::json!({ "text": "x", "preset": "anything-goes" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn policy_endpoint_describes_presets() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(&format!("{}/api/policies/markdown", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["tags"]["p"].is_array());
    assert_eq!(body["tags"]["a"], serde_json::json!(["href", "title"]));
    assert!(body["tags"].get("script").is_none());
    assert_eq!(body["disposition"], "escape");

    let plain: serde_json::Value = client
        .get(&format!("{}/api/policies/plain", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plain["tags"], serde_json::json!({}));

    let response = client
        .get(&format!("{}/api/policies/nope", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
