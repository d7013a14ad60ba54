//! Tests for deck actions.

mod common;

use ankiconnect::Error;
use common::{expect_request, mock_action, mock_anki, mock_anki_error, mock_anki_response};
use wiremock::Mock;
use wiremock::matchers::{body_partial_json, method};

#[tokio::test]
async fn test_deck_names() {
    let (server, client) = mock_anki().await;

    mock_action(
        &server,
        "deckNames",
        mock_anki_response(vec!["Default", "Japanese::Vocabulary"]),
    )
    .await;

    let decks = client.decks().names().await.unwrap();
    assert_eq!(decks, vec!["Default", "Japanese::Vocabulary"]);
}

#[tokio::test]
async fn test_deck_names_and_ids() {
    let (server, client) = mock_anki().await;

    mock_action(
        &server,
        "deckNamesAndIds",
        mock_anki_response(serde_json::json!({
            "Default": 1,
            "Japanese": 1651445861967_i64
        })),
    )
    .await;

    let decks = client.decks().names_and_ids().await.unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks["Japanese"], 1651445861967);
}

#[tokio::test]
async fn test_create_deck() {
    let (server, client) = mock_anki().await;

    expect_request(
        &server,
        serde_json::json!({
            "action": "createDeck",
            "params": { "deck": "Japanese::Kanji" }
        }),
        mock_anki_response(1519323742721_i64),
    )
    .await;

    let id = client.decks().create("Japanese::Kanji").await.unwrap();
    assert_eq!(id, 1519323742721);
}

#[tokio::test]
async fn test_delete_decks_sends_cards_too() {
    let (server, client) = mock_anki().await;

    expect_request(
        &server,
        serde_json::json!({
            "action": "deleteDecks",
            "params": { "decks": ["Old"], "cardsToo": true }
        }),
        mock_anki_response(serde_json::Value::Null),
    )
    .await;

    client.decks().delete(&["Old"], true).await.unwrap();
}

#[tokio::test]
async fn test_delete_deck_error() {
    let (server, client) = mock_anki().await;

    mock_action(
        &server,
        "deleteDecks",
        mock_anki_error("cardsToo must be set to True"),
    )
    .await;

    let err = client.decks().delete(&["Old"], false).await.unwrap_err();
    assert_eq!(err, Error::Api("cardsToo must be set to True".into()));
}

#[tokio::test]
async fn test_deck_id_lookup() {
    let (server, client) = mock_anki().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "action": "deckNamesAndIds" })))
        .respond_with(mock_anki_response(serde_json::json!({
            "Default": 1,
            "Spanish": 1651445861967_i64
        })))
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(
        client.decks().id_of("Spanish").await.unwrap(),
        Some(1651445861967)
    );
    assert_eq!(client.decks().id_of("French").await.unwrap(), None);
}
