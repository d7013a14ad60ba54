//! Deck management tools.

use ankiconnect::Error as AnkiError;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ToolHandler, Validate, json_result, require, text_result};
use crate::error::anki_error;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateDeckParams {
    /// Name of the deck to create
    pub name: String,
}

impl Validate for CreateDeckParams {
    fn validate(&self) -> Result<(), String> {
        require("name", &self.name)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteDeckParams {
    /// Name of the deck to delete
    pub name: String,
    /// If true (the default), also delete all cards in the deck
    #[serde(default = "default_true")]
    pub cards_too: bool,
}

impl Validate for DeleteDeckParams {
    fn validate(&self) -> Result<(), String> {
        require("name", &self.name)
    }
}

fn default_true() -> bool {
    true
}

impl ToolHandler {
    pub(super) async fn list_decks(&self) -> Result<CallToolResult, McpError> {
        debug!("Listing decks");

        let decks = self.client.decks().names().await.map_err(anki_error)?;

        debug!(count = decks.len(), "Listed decks");
        json_result(&decks)
    }

    pub(super) async fn create_deck(
        &self,
        params: CreateDeckParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(name = %params.name, "Creating deck");

        match self.client.decks().create(&params.name).await {
            Ok(deck_id) => {
                info!(deck_id, name = %params.name, "Deck created");
                Ok(text_result(format!(
                    "Created deck '{}' with ID: {}",
                    params.name, deck_id
                )))
            }
            Err(AnkiError::Api(msg)) if msg.to_lowercase().contains("already exists") => {
                let existing = self
                    .client
                    .decks()
                    .id_of(&params.name)
                    .await
                    .map_err(anki_error)?;
                let Some(deck_id) = existing else {
                    return Err(anki_error(AnkiError::Api(msg)));
                };

                debug!(deck_id, name = %params.name, "Deck already exists");
                Ok(text_result(format!(
                    "Deck '{}' already exists with ID: {}",
                    params.name, deck_id
                )))
            }
            Err(err) => Err(anki_error(err)),
        }
    }

    pub(super) async fn delete_deck(
        &self,
        params: DeleteDeckParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(name = %params.name, cards_too = params.cards_too, "Deleting deck");

        self.client
            .decks()
            .delete(&[params.name.as_str()], params.cards_too)
            .await
            .map_err(anki_error)?;

        let action = if params.cards_too {
            "and its cards"
        } else {
            "(cards kept)"
        };

        info!(name = %params.name, "Deck deleted");
        Ok(text_result(format!(
            "Deleted deck '{}' {}",
            params.name, action
        )))
    }
}
