//! Tests for request routing and the connectivity check.

mod common;

use ankibridge::resources::DECKS_URI;
use common::{
    UNREACHABLE_URL, args, bridge, mock_anki_error, mock_anki_response, mount_probe,
    request_count, requests_for, setup_mock_server, stub_action,
};
use rmcp::ServerHandler;
use rmcp::model::ErrorCode;
use serde_json::json;

#[tokio::test]
async fn test_list_tools_works_without_anki() {
    let server = bridge(UNREACHABLE_URL);

    let tools = server.tool_definitions();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();

    assert_eq!(tools.len(), 14);
    for expected in [
        "list_decks",
        "create_deck",
        "delete_deck",
        "list_note_types",
        "get_note_type_info",
        "create_note_type",
        "create_note",
        "batch_create_notes",
        "search_notes",
        "get_note_info",
        "update_note",
        "delete_note",
        "gui_current_card",
        "gui_selected_notes",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
}

#[tokio::test]
async fn test_tool_call_without_anki_is_connection_error() {
    let server = bridge(UNREACHABLE_URL);

    let err = server.call("list_decks", None).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("Anki connection error"), "{}", err.message);
}

#[tokio::test]
async fn test_resource_requests_without_anki_are_connection_errors() {
    let server = bridge(UNREACHABLE_URL);

    let err = server.read(DECKS_URI).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("not reachable"));

    assert!(server.resources().await.is_err());
    assert!(server.resource_templates().await.is_err());
}

#[tokio::test]
async fn test_missing_required_field_makes_no_request() {
    let mock = setup_mock_server().await;
    mount_probe(&mock).await;
    let server = bridge(mock.uri());

    for (tool, arguments) in [
        ("create_deck", json!({})),
        ("delete_deck", json!({"cards_too": true})),
        ("get_note_type_info", json!({})),
        ("create_note", json!({"deck": "Default", "model": "Basic"})),
        ("create_note_type", json!({"name": "Vocab", "fields": ["Word"]})),
        ("batch_create_notes", json!({"stop_on_error": true})),
        ("search_notes", json!({"limit": 5})),
        ("get_note_info", json!({})),
        ("update_note", json!({"fields": {"Front": "x"}})),
        ("delete_note", json!({})),
    ] {
        let err = server.call(tool, args(arguments)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS, "tool {}", tool);
    }

    assert_eq!(request_count(&mock).await, 0);
}

#[tokio::test]
async fn test_unknown_tool_makes_no_request() {
    let mock = setup_mock_server().await;
    mount_probe(&mock).await;
    let server = bridge(mock.uri());

    let err = server.call("sync", None).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(request_count(&mock).await, 0);
}

#[tokio::test]
async fn test_every_request_probes_anki() {
    let mock = setup_mock_server().await;
    mount_probe(&mock).await;
    stub_action(&mock, "deckNames", mock_anki_response(vec!["Default"])).await;
    let server = bridge(mock.uri());

    server.call("list_decks", None).await.unwrap();
    server.call("list_decks", None).await.unwrap();
    server.read(DECKS_URI).await.unwrap();

    assert_eq!(requests_for(&mock, "version").await, 3);
    assert_eq!(requests_for(&mock, "deckNames").await, 3);
}

#[tokio::test]
async fn test_probe_rejected_stops_request() {
    let mock = setup_mock_server().await;
    stub_action(&mock, "version", mock_anki_error("valid api key must be provided")).await;
    let server = bridge(mock.uri());

    let err = server.call("list_decks", None).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("valid api key"));
    assert_eq!(requests_for(&mock, "deckNames").await, 0);
}

#[tokio::test]
async fn test_resource_listing_after_probe() {
    let mock = setup_mock_server().await;
    mount_probe(&mock).await;
    let server = bridge(mock.uri());

    let resources = server.resources().await.unwrap();
    let templates = server.resource_templates().await.unwrap();

    assert_eq!(resources.len(), 3);
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].raw.uri_template, "anki://note-types/{modelName}");
}

#[test]
fn test_server_info() {
    let server = bridge(UNREACHABLE_URL);
    let info = server.get_info();

    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
    assert!(info.instructions.unwrap().contains("AnkiConnect"));
}
