//! Common test utilities for the bridge tests.

#![allow(dead_code)] // Not all test files use every helper

use std::sync::Arc;
use std::time::Duration;

use ankibridge::{AnkiServer, SchemaCache};
use ankiconnect::{AnkiClient, RetryPolicy};
use rmcp::model::{CallToolResult, JsonObject, ReadResourceResult, ResourceContents};
use serde::Serialize;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens on port 1 on a test machine.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Start a new mock AnkiConnect.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client with millisecond backoff so failure tests stay fast.
pub fn fast_client(url: impl Into<String>) -> AnkiClient {
    AnkiClient::builder()
        .url(url)
        .timeout(Duration::from_secs(2))
        .probe_timeout(Duration::from_secs(1))
        .retry_policy(RetryPolicy::new(
            1,
            Duration::from_millis(1),
            Duration::from_millis(5),
        ))
        .build()
}

/// A bridge server talking to `url` with a fresh schema cache.
pub fn bridge(url: impl Into<String>) -> AnkiServer {
    AnkiServer::from_client(fast_client(url), Arc::new(SchemaCache::new()))
}

/// Create a successful AnkiConnect response.
pub fn mock_anki_response<T: Serialize>(result: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": result,
        "error": null
    }))
}

/// Create an error AnkiConnect response.
pub fn mock_anki_error(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": null,
        "error": error
    }))
}

/// Mount a mock for a specific action, expected exactly once.
pub async fn mock_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": action,
            "version": 6
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a mock for a specific action, any number of calls.
pub async fn stub_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": action,
            "version": 6
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Answer the connectivity probe.
pub async fn mount_probe(server: &MockServer) {
    stub_action(server, "version", mock_anki_response(6)).await;
}

/// Serve the "Basic" note type (fields Front and Back).
pub async fn mount_basic_note_type(server: &MockServer) {
    stub_action(server, "modelNames", mock_anki_response(vec!["Basic", "Cloze"])).await;
    stub_action(
        server,
        "modelFieldNames",
        mock_anki_response(vec!["Front", "Back"]),
    )
    .await;
    stub_action(
        server,
        "modelTemplates",
        mock_anki_response(serde_json::json!({
            "Card 1": {"Front": "{{Front}}", "Back": "{{FrontSide}}<hr id=answer>{{Back}}"}
        })),
    )
    .await;
    stub_action(
        server,
        "modelStyling",
        mock_anki_response(serde_json::json!({"css": ".card { font-family: arial; }"})),
    )
    .await;
}

/// Number of requests the mock server has seen for `action`.
pub async fn requests_for(server: &MockServer, action: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| {
            serde_json::from_slice::<serde_json::Value>(&request.body)
                .map(|body| body["action"] == action)
                .unwrap_or(false)
        })
        .count()
}

/// Total number of requests the mock server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

/// Tool arguments from a JSON object literal.
pub fn args(value: serde_json::Value) -> Option<JsonObject> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        other => panic!("tool arguments must be an object, got {}", other),
    }
}

/// The text of a single-text tool result.
pub fn text(result: &CallToolResult) -> String {
    result.content[0]
        .raw
        .as_text()
        .map(|t| t.text.clone())
        .expect("text content")
}

/// The text of a tool result parsed as JSON.
pub fn json(result: &CallToolResult) -> serde_json::Value {
    serde_json::from_str(&text(result)).expect("JSON content")
}

/// The text and MIME type of a single-content resource read.
pub fn resource_text(result: &ReadResourceResult) -> (String, Option<String>) {
    match &result.contents[0] {
        ResourceContents::TextResourceContents {
            text, mime_type, ..
        } => (text.clone(), mime_type.clone()),
        _ => panic!("Expected TextResourceContents"),
    }
}
