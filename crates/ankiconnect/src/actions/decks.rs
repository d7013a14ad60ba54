//! Deck actions.
//!
//! ```no_run
//! use ankiconnect::AnkiClient;
//!
//! # async fn example() -> ankiconnect::Result<()> {
//! let client = AnkiClient::new();
//!
//! let id = client.decks().create("Spanish::Verbs").await?;
//! assert_eq!(client.decks().id_of("Spanish::Verbs").await?, Some(id));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::client::AnkiClient;
use crate::error::Result;

/// Deck operations, obtained via [`AnkiClient::decks()`].
#[derive(Debug)]
pub struct DeckActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

#[derive(Serialize)]
struct DeckParam<'a> {
    deck: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteParams<'a> {
    decks: &'a [&'a str],
    cards_too: bool,
}

impl<'a> DeckActions<'a> {
    /// Names of all decks, nested decks spelled `Parent::Child`.
    pub async fn names(&self) -> Result<Vec<String>> {
        self.client.invoke_without_params("deckNames").await
    }

    /// Map of deck name to deck ID.
    pub async fn names_and_ids(&self) -> Result<HashMap<String, i64>> {
        self.client.invoke_without_params("deckNamesAndIds").await
    }

    /// ID of the deck called `name`, if it exists.
    pub async fn id_of(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.names_and_ids().await?.get(name).copied())
    }

    /// Create a deck and return its ID.
    ///
    /// Missing parent decks are created too. Creating a deck that already
    /// exists returns the existing ID on current AnkiConnect versions.
    pub async fn create(&self, name: &str) -> Result<i64> {
        self.client
            .invoke("createDeck", DeckParam { deck: name })
            .await
    }

    /// Delete decks by name.
    ///
    /// Recent AnkiConnect versions refuse the call unless `cards_too` is
    /// true, in which case the decks' cards are deleted as well.
    pub async fn delete(&self, decks: &[&str], cards_too: bool) -> Result<()> {
        self.client
            .invoke_void("deleteDecks", DeleteParams { decks, cards_too })
            .await
    }
}
