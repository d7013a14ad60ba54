//! Read-only views of what Anki's window is showing.

use serde::{Deserialize, Serialize};

use crate::client::AnkiClient;
use crate::error::Result;

/// GUI operations, obtained via [`AnkiClient::gui()`].
#[derive(Debug)]
pub struct GuiActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

/// The card on screen in the reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCard {
    pub card_id: i64,
    pub deck_name: String,
    pub model_name: String,
    #[serde(default)]
    pub template_name: String,
    /// Rendered question HTML.
    pub question: String,
    /// Rendered answer HTML.
    pub answer: String,
    /// The note's fields as `{name: {value, order}}`.
    #[serde(default)]
    pub fields: serde_json::Value,
    /// Ease values of the answer buttons shown.
    #[serde(default)]
    pub buttons: Vec<i32>,
    /// Interval each button would schedule, e.g. `"<10m"`.
    #[serde(default)]
    pub next_reviews: Vec<String>,
}

impl<'a> GuiActions<'a> {
    /// IDs of the notes selected in the card browser; empty when the
    /// browser is closed.
    pub async fn selected_notes(&self) -> Result<Vec<i64>> {
        self.client.invoke_without_params("guiSelectedNotes").await
    }

    /// The card under review, or `None` outside the reviewer.
    ///
    /// ```no_run
    /// # use ankiconnect::AnkiClient;
    /// # async fn example() -> ankiconnect::Result<()> {
    /// let client = AnkiClient::new();
    /// match client.gui().current_card().await? {
    ///     Some(card) => println!("Reviewing card {} in {}", card.card_id, card.deck_name),
    ///     None => println!("Not reviewing"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn current_card(&self) -> Result<Option<CurrentCard>> {
        self.client.invoke_without_params("guiCurrentCard").await
    }
}
