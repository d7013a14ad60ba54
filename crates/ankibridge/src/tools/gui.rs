//! GUI introspection tools.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use tracing::debug;

use super::{ToolHandler, json_result, text_result};
use crate::error::anki_error;

impl ToolHandler {
    pub(super) async fn gui_current_card(&self) -> Result<CallToolResult, McpError> {
        match self.client.gui().current_card().await.map_err(anki_error)? {
            Some(card) => {
                debug!(card_id = card.card_id, "Current card");
                json_result(&card)
            }
            None => Ok(text_result("No card is currently being reviewed.")),
        }
    }

    pub(super) async fn gui_selected_notes(&self) -> Result<CallToolResult, McpError> {
        let note_ids = self.client.gui().selected_notes().await.map_err(anki_error)?;

        debug!(count = note_ids.len(), "Selected notes");
        json_result(&note_ids)
    }
}
