//! Shared fixtures: a wiremock stand-in for AnkiConnect and response helpers.

use std::time::Duration;

use ankiconnect::{AnkiClient, RetryPolicy};
use serde::Serialize;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A fresh mock AnkiConnect and a default client pointed at it.
#[allow(dead_code)]
pub async fn mock_anki() -> (MockServer, AnkiClient) {
    let server = MockServer::start().await;
    let client = AnkiClient::builder().url(server.uri()).build();
    (server, client)
}

/// Expect exactly one request whose body contains `body`.
#[allow(dead_code)]
pub async fn expect_request(
    server: &MockServer,
    body: serde_json::Value,
    response: ResponseTemplate,
) {
    Mock::given(method("POST"))
        .and(body_partial_json(body))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Client pointed at `url` with millisecond backoff so retry tests stay fast.
#[allow(dead_code)]
pub fn fast_client(url: impl Into<String>) -> AnkiClient {
    AnkiClient::builder()
        .url(url)
        .timeout(Duration::from_secs(2))
        .probe_timeout(Duration::from_secs(1))
        .retry_policy(RetryPolicy::new(
            2,
            Duration::from_millis(1),
            Duration::from_millis(5),
        ))
        .build()
}

/// `{"result": result, "error": null}`
pub fn mock_anki_response<T: Serialize>(result: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": result,
        "error": null
    }))
}

/// `{"result": null, "error": error}`
#[allow(dead_code)]
pub fn mock_anki_error(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": null,
        "error": error
    }))
}

/// Answer `action` with `response`, expecting exactly one call.
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

/// Serve the three calls behind `models().schema("Basic")`.
#[allow(dead_code)]
pub async fn mount_basic_schema(server: &MockServer) {
    mock_action(
        server,
        "modelFieldNames",
        mock_anki_response(vec!["Front", "Back"]),
    )
    .await;
    mock_action(
        server,
        "modelTemplates",
        mock_anki_response(serde_json::json!({
            "Card 1": {"Front": "{{Front}}", "Back": "{{FrontSide}}<hr id=answer>{{Back}}"}
        })),
    )
    .await;
    mock_action(
        server,
        "modelStyling",
        mock_anki_response(serde_json::json!({"css": ".card { color: black; }"})),
    )
    .await;
}

/// Number of requests the mock server has seen for `action`.
#[allow(dead_code)]
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
