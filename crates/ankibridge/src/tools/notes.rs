//! Note tools: single and batch creation, search, inspection, update, delete.

use std::collections::BTreeMap;

use ankiconnect::{Error as AnkiError, FieldError, Note, NoteBuilder, NoteFields};
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ToolHandler, Validate, json_result, require, text_result};
use crate::error::{anki_error, describe, invalid_params};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNoteParams {
    /// Deck to add the note to
    pub deck: String,
    /// Note type (model) name
    pub model: String,
    /// Field values (field_name -> value); names must match the note type
    pub fields: BTreeMap<String, String>,
    /// Optional tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Add the note even if it duplicates an existing one
    #[serde(default)]
    pub allow_duplicate: bool,
}

impl Validate for CreateNoteParams {
    fn validate(&self) -> Result<(), String> {
        require("deck", &self.deck)?;
        require("model", &self.model)?;
        if self.fields.is_empty() {
            return Err("'fields' must contain at least one field".to_string());
        }
        Ok(())
    }
}

/// One note of a batch. Items are decoded one by one so a malformed item
/// fails alone.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BatchNoteSpec {
    /// Deck to add the note to
    pub deck: String,
    /// Note type (model) name
    pub model: String,
    /// Field values (field_name -> value)
    pub fields: BTreeMap<String, String>,
    /// Optional tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Add the note even if it duplicates an existing one
    #[serde(default)]
    pub allow_duplicate: bool,
    /// Caller-chosen identifier echoed back in the report
    #[serde(default)]
    pub external_id: Option<String>,
}

impl Validate for BatchNoteSpec {
    fn validate(&self) -> Result<(), String> {
        require("deck", &self.deck)?;
        require("model", &self.model)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BatchCreateNotesParams {
    /// Notes to add, each with deck, model, fields and optional tags,
    /// allow_duplicate and external_id
    #[schemars(with = "Vec<BatchNoteSpec>")]
    pub notes: Vec<serde_json::Value>,
    /// Stop at the first failing note instead of continuing
    #[serde(default)]
    pub stop_on_error: bool,
}

impl Validate for BatchCreateNotesParams {
    fn validate(&self) -> Result<(), String> {
        if self.notes.is_empty() {
            return Err("'notes' must contain at least one note".to_string());
        }
        Ok(())
    }
}

/// Outcome of a batch, one entry per attempted note in input order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub created: usize,
    pub failed: usize,
    /// Notes not attempted because `stop_on_error` ended the batch.
    pub skipped: usize,
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchNotesParams {
    /// Anki search query (e.g. "deck:Japanese tag:verb")
    pub query: String,
    /// Maximum number of note IDs to return
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Validate for SearchNotesParams {
    fn validate(&self) -> Result<(), String> {
        require("query", &self.query)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteIdParams {
    /// Note ID
    pub note_id: i64,
}

impl Validate for NoteIdParams {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateNoteParams {
    /// Note ID to update
    pub note_id: i64,
    /// Field values to change (field_name -> value); other fields are kept
    #[serde(default)]
    pub fields: Option<BTreeMap<String, String>>,
    /// Replacement tag list
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Validate for UpdateNoteParams {
    fn validate(&self) -> Result<(), String> {
        if self.fields.is_none() && self.tags.is_none() {
            return Err("at least one of 'fields' or 'tags' is required".to_string());
        }
        if self.fields.as_ref().is_some_and(BTreeMap::is_empty) {
            return Err("'fields' must not be empty when given".to_string());
        }
        Ok(())
    }
}

impl ToolHandler {
    pub(super) async fn create_note(
        &self,
        params: CreateNoteParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(deck = %params.deck, model = %params.model, "Adding note");

        let fields: NoteFields = params.fields.into_iter().collect();
        let note = self
            .checked_note(
                &params.deck,
                &params.model,
                fields,
                params.tags,
                params.allow_duplicate,
            )
            .await
            .map_err(anki_error)?
            .map_err(invalid_params)?;

        let note_id = self.client.notes().add(&note).await.map_err(anki_error)?;

        info!(note_id, "Note created");
        Ok(text_result(format!("Created note with ID: {}", note_id)))
    }

    pub(super) async fn batch_create_notes(
        &self,
        params: BatchCreateNotesParams,
    ) -> Result<CallToolResult, McpError> {
        let total = params.notes.len();
        debug!(count = total, stop_on_error = params.stop_on_error, "Adding notes");

        let mut report = BatchReport::default();

        for (index, raw) in params.notes.into_iter().enumerate() {
            let external_id = raw
                .get("external_id")
                .and_then(|id| id.as_str())
                .map(str::to_string);

            let outcome = match self.add_batch_item(raw).await? {
                Ok(note_id) => {
                    report.created += 1;
                    BatchItem {
                        index,
                        external_id,
                        note_id: Some(note_id),
                        error: None,
                    }
                }
                Err(error) => {
                    warn!(index, error = %error, "Batch note failed");
                    report.failed += 1;
                    BatchItem {
                        index,
                        external_id,
                        note_id: None,
                        error: Some(error),
                    }
                }
            };

            let failed = outcome.error.is_some();
            report.results.push(outcome);
            if failed && params.stop_on_error {
                report.skipped = total - index - 1;
                break;
            }
        }

        info!(
            created = report.created,
            failed = report.failed,
            skipped = report.skipped,
            "Batch finished"
        );
        json_result(&report)
    }

    /// Add one batch item. The inner error describes why this item failed;
    /// the outer error aborts the batch and is reserved for failures that
    /// would hit every remaining item.
    async fn add_batch_item(
        &self,
        raw: serde_json::Value,
    ) -> Result<Result<i64, String>, McpError> {
        let spec: BatchNoteSpec = match serde_json::from_value(raw) {
            Ok(spec) => spec,
            Err(e) => return Ok(Err(format!("invalid note: {}", e))),
        };
        if let Err(msg) = spec.validate() {
            return Ok(Err(format!("invalid note: {}", msg)));
        }

        let fields: NoteFields = spec.fields.into_iter().collect();
        let checked = self
            .checked_note(&spec.deck, &spec.model, fields, spec.tags, spec.allow_duplicate)
            .await;
        let note = match checked {
            Ok(Ok(note)) => note,
            Ok(Err(msg)) => return Ok(Err(msg)),
            Err(err) => return item_failure(err),
        };

        match self.client.notes().add(&note).await {
            Ok(note_id) => Ok(Ok(note_id)),
            Err(err) => item_failure(err),
        }
    }

    /// Build a note after checking its fields against the note type.
    ///
    /// The inner error is a message about the note itself (unknown note
    /// type, unknown or empty fields).
    async fn checked_note(
        &self,
        deck: &str,
        model: &str,
        fields: NoteFields,
        tags: Vec<String>,
        allow_duplicate: bool,
    ) -> ankiconnect::Result<Result<Note, String>> {
        let Some(schema) = self.resources.lookup_schema(model).await? else {
            return Ok(Err(format!("Note type '{}' not found", model)));
        };

        if let Err(err) = fields.check_against(model, &schema.fields) {
            return Ok(Err(err.to_string()));
        }

        Ok(Ok(NoteBuilder::new(deck, model)
            .fields(fields)
            .tags(tags)
            .allow_duplicate(allow_duplicate)
            .build()))
    }

    pub(super) async fn search_notes(
        &self,
        params: SearchNotesParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(query = %params.query, "Finding notes");

        let mut note_ids = self
            .client
            .notes()
            .find(&params.query)
            .await
            .map_err(anki_error)?;

        let total = note_ids.len();
        if let Some(limit) = params.limit {
            note_ids.truncate(limit);
        }

        debug!(total, returned = note_ids.len(), "Found notes");
        json_result(&serde_json::json!({
            "total": total,
            "note_ids": note_ids,
        }))
    }

    pub(super) async fn get_note_info(
        &self,
        params: NoteIdParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(note_id = params.note_id, "Getting note info");

        self.ensure_note_exists(params.note_id).await?;
        let notes = self
            .client
            .notes()
            .info(&[params.note_id])
            .await
            .map_err(anki_error)?;

        match notes.first() {
            Some(note) => json_result(note),
            None => Err(invalid_params(format!("Note {} not found", params.note_id))),
        }
    }

    pub(super) async fn update_note(
        &self,
        params: UpdateNoteParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(note_id = params.note_id, "Updating note");

        self.ensure_note_exists(params.note_id).await?;

        let fields: Option<NoteFields> = params.fields.map(|f| f.into_iter().collect());
        if let Some(fields) = &fields {
            let info = self
                .client
                .notes()
                .info(&[params.note_id])
                .await
                .map_err(anki_error)?;
            if let Some(note) = info.first() {
                let declared = self
                    .resources
                    .find_schema(&note.model_name)
                    .await?
                    .map(|schema| schema.fields.clone())
                    .unwrap_or_default();
                // Clearing fields is a valid update, so only unknown names fail.
                if let Err(err @ FieldError::Unknown { .. }) =
                    fields.check_against(&note.model_name, &declared)
                {
                    return Err(invalid_params(err.to_string()));
                }
            }
        }

        self.client
            .notes()
            .update(params.note_id, fields.as_ref(), params.tags.as_deref())
            .await
            .map_err(anki_error)?;

        info!(note_id = params.note_id, "Note updated");
        Ok(text_result(format!("Updated note {}", params.note_id)))
    }

    pub(super) async fn delete_note(
        &self,
        params: NoteIdParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(note_id = params.note_id, "Deleting note");

        self.client
            .notes()
            .delete(&[params.note_id])
            .await
            .map_err(anki_error)?;

        info!(note_id = params.note_id, "Note deleted");
        Ok(text_result(format!("Deleted note {}", params.note_id)))
    }

    async fn ensure_note_exists(&self, note_id: i64) -> Result<(), McpError> {
        let exists = self
            .client
            .notes()
            .exists(note_id)
            .await
            .map_err(anki_error)?;

        if exists {
            Ok(())
        } else {
            Err(invalid_params(format!("Note {} not found", note_id)))
        }
    }
}

/// Transient client errors abort the batch; any other error fails one item.
fn item_failure(err: AnkiError) -> Result<Result<i64, String>, McpError> {
    if err.is_transient() {
        Err(anki_error(err))
    } else {
        Ok(Err(describe(&err)))
    }
}
