//! Tests for model actions.

mod common;

use ankiconnect::{CreateModelParams, Error};
use common::{
    expect_request, mock_action, mock_anki, mock_anki_error, mock_anki_response,
    mount_basic_schema,
};

#[tokio::test]
async fn test_model_names() {
    let (server, client) = mock_anki().await;

    mock_action(&server, "modelNames", mock_anki_response(vec!["Basic", "Cloze"])).await;

    let names = client.models().names().await.unwrap();
    assert_eq!(names, vec!["Basic", "Cloze"]);
}

#[tokio::test]
async fn test_model_field_names() {
    let (server, client) = mock_anki().await;

    expect_request(
        &server,
        serde_json::json!({
            "action": "modelFieldNames",
            "params": { "modelName": "Basic" }
        }),
        mock_anki_response(vec!["Front", "Back"]),
    )
    .await;

    let fields = client.models().field_names("Basic").await.unwrap();
    assert_eq!(fields, vec!["Front", "Back"]);
}

#[tokio::test]
async fn test_model_schema() {
    let (server, client) = mock_anki().await;
    mount_basic_schema(&server).await;

    let schema = client.models().schema("Basic").await.unwrap();

    assert_eq!(schema.name, "Basic");
    assert_eq!(schema.fields, vec!["Front", "Back"]);
    assert_eq!(schema.templates.len(), 1);
    assert_eq!(schema.templates[0].name, "Card 1");
    assert_eq!(schema.templates[0].front, "{{Front}}");
    assert_eq!(schema.css.as_deref(), Some(".card { color: black; }"));
    assert!(!schema.is_cloze());
}

#[tokio::test]
async fn test_model_schema_unknown_model() {
    let (server, client) = mock_anki().await;

    mock_action(
        &server,
        "modelFieldNames",
        mock_anki_error("model was not found: Missing"),
    )
    .await;

    let err = client.models().schema("Missing").await.unwrap_err();
    assert_eq!(err, Error::Api("model was not found: Missing".into()));
}

#[tokio::test]
async fn test_create_model() {
    let (server, client) = mock_anki().await;

    expect_request(
        &server,
        serde_json::json!({
            "action": "createModel",
            "params": {
                "modelName": "Vocabulary",
                "inOrderFields": ["Word", "Meaning"],
                "cardTemplates": [{
                    "Name": "Recognition",
                    "Front": "{{Word}}",
                    "Back": "{{Meaning}}"
                }]
            }
        }),
        mock_anki_response(serde_json::json!({
            "id": 1551462107104_i64,
            "name": "Vocabulary"
        })),
    )
    .await;

    let params = CreateModelParams::new("Vocabulary")
        .field("Word")
        .field("Meaning")
        .template("Recognition", "{{Word}}", "{{Meaning}}");

    let created = client.models().create(params).await.unwrap();
    assert_eq!(created["name"], "Vocabulary");
}
