//! Tool definitions for the Anki MCP server.
//!
//! Handling a tool call has two phases. [`ToolRequest::parse`] is purely
//! local: it resolves the tool name and decodes and checks the arguments, so
//! bad input is rejected with `invalid_params` before Anki is contacted.
//! [`ToolHandler::execute`] then performs the call through the client.
//!
//! Each submodule holds the parameter types and execution of one domain.

mod decks;
mod gui;
mod models;
mod notes;

use std::sync::Arc;

use ankiconnect::AnkiClient;
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::SchemaCache;
use crate::error::invalid_params;
use crate::resources::ResourceHandler;

pub use decks::{CreateDeckParams, DeleteDeckParams};
pub use models::{CreateNoteTypeParams, GetNoteTypeInfoParams, TemplateParams};
pub use notes::{
    BatchCreateNotesParams, BatchItem, BatchNoteSpec, BatchReport, CreateNoteParams,
    NoteIdParams, SearchNotesParams, UpdateNoteParams,
};

/// Argument checks beyond what deserialization enforces.
trait Validate {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Parameter type of tools that take no arguments.
#[derive(Debug, serde::Deserialize, JsonSchema)]
pub struct NoParams {}

/// A tool call whose name and arguments have been checked.
#[derive(Debug)]
pub enum ToolRequest {
    ListDecks,
    CreateDeck(CreateDeckParams),
    DeleteDeck(DeleteDeckParams),
    ListNoteTypes,
    GetNoteTypeInfo(GetNoteTypeInfoParams),
    CreateNoteType(CreateNoteTypeParams),
    CreateNote(CreateNoteParams),
    BatchCreateNotes(BatchCreateNotesParams),
    SearchNotes(SearchNotesParams),
    GetNoteInfo(NoteIdParams),
    UpdateNote(UpdateNoteParams),
    DeleteNote(NoteIdParams),
    GuiCurrentCard,
    GuiSelectedNotes,
}

impl ToolRequest {
    /// Resolve a tool call without touching the network.
    ///
    /// Unknown tools and arguments that are missing, mistyped or blank fail
    /// with `invalid_params`.
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, McpError> {
        let args = arguments.unwrap_or_default();
        let request = match name {
            "list_decks" => Self::ListDecks,
            "create_deck" => Self::CreateDeck(decode(name, args)?),
            "delete_deck" => Self::DeleteDeck(decode(name, args)?),
            "list_note_types" => Self::ListNoteTypes,
            "get_note_type_info" => Self::GetNoteTypeInfo(decode(name, args)?),
            "create_note_type" => Self::CreateNoteType(decode(name, args)?),
            "create_note" => Self::CreateNote(decode(name, args)?),
            "batch_create_notes" => Self::BatchCreateNotes(decode(name, args)?),
            "search_notes" => Self::SearchNotes(decode(name, args)?),
            "get_note_info" => Self::GetNoteInfo(decode(name, args)?),
            "update_note" => Self::UpdateNote(decode(name, args)?),
            "delete_note" => Self::DeleteNote(decode(name, args)?),
            "gui_current_card" => Self::GuiCurrentCard,
            "gui_selected_notes" => Self::GuiSelectedNotes,
            _ => return Err(invalid_params(format!("Unknown tool: {}", name))),
        };
        Ok(request)
    }

    /// The tool name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListDecks => "list_decks",
            Self::CreateDeck(_) => "create_deck",
            Self::DeleteDeck(_) => "delete_deck",
            Self::ListNoteTypes => "list_note_types",
            Self::GetNoteTypeInfo(_) => "get_note_type_info",
            Self::CreateNoteType(_) => "create_note_type",
            Self::CreateNote(_) => "create_note",
            Self::BatchCreateNotes(_) => "batch_create_notes",
            Self::SearchNotes(_) => "search_notes",
            Self::GetNoteInfo(_) => "get_note_info",
            Self::UpdateNote(_) => "update_note",
            Self::DeleteNote(_) => "delete_note",
            Self::GuiCurrentCard => "gui_current_card",
            Self::GuiSelectedNotes => "gui_selected_notes",
        }
    }
}

fn decode<T>(tool: &str, args: JsonObject) -> Result<T, McpError>
where
    T: DeserializeOwned + Validate,
{
    let params: T = serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| invalid_params(format!("Invalid arguments for '{}': {}", tool, e)))?;
    params
        .validate()
        .map_err(|msg| invalid_params(format!("Invalid arguments for '{}': {}", tool, msg)))?;
    Ok(params)
}

/// Fail when a required string argument is blank.
fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' must not be empty", field))
    } else {
        Ok(())
    }
}

/// Descriptions of every tool. Built locally; listing tools never needs Anki.
pub fn definitions() -> Vec<Tool> {
    vec![
        tool::<NoParams>("list_decks", "List all deck names in Anki."),
        tool::<CreateDeckParams>(
            "create_deck",
            "Create a deck. Use '::' for nested decks (e.g. 'Japanese::Vocabulary'). \
             Succeeds with the existing ID if the deck already exists.",
        ),
        tool::<DeleteDeckParams>(
            "delete_deck",
            "Delete a deck. By default the deck's cards are deleted with it.",
        ),
        tool::<NoParams>("list_note_types", "List all note type (model) names."),
        tool::<GetNoteTypeInfoParams>(
            "get_note_type_info",
            "Get the fields in order, card templates and CSS of a note type.",
        ),
        tool::<CreateNoteTypeParams>(
            "create_note_type",
            "Create a note type with the given fields and card templates.",
        ),
        tool::<CreateNoteParams>(
            "create_note",
            "Add a single note. Field names must match the note type exactly. \
             Returns the new note ID.",
        ),
        tool::<BatchCreateNotesParams>(
            "batch_create_notes",
            "Add several notes. Every note is reported separately; a bad note \
             does not abort the batch unless stop_on_error is set.",
        ),
        tool::<SearchNotesParams>(
            "search_notes",
            "Search for notes using Anki query syntax (e.g. 'deck:Japanese tag:verb'). \
             Returns note IDs.",
        ),
        tool::<NoteIdParams>(
            "get_note_info",
            "Get the fields, tags, note type and cards of a note.",
        ),
        tool::<UpdateNoteParams>(
            "update_note",
            "Update some fields of a note and/or replace its tags.",
        ),
        tool::<NoteIdParams>("delete_note", "Delete a note and all of its cards."),
        tool::<NoParams>(
            "gui_current_card",
            "Get the card currently shown in Anki's reviewer, if any.",
        ),
        tool::<NoParams>(
            "gui_selected_notes",
            "Get the IDs of the notes selected in Anki's card browser.",
        ),
    ]
}

fn tool<T: JsonSchema>(name: &'static str, description: &'static str) -> Tool {
    Tool::new(name, description, input_schema::<T>())
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    let mut object = match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => object,
        _ => JsonObject::new(),
    };
    object.insert("type".to_string(), serde_json::Value::from("object"));
    Arc::new(object)
}

/// Executes parsed tool requests against AnkiConnect.
#[derive(Debug, Clone)]
pub struct ToolHandler {
    client: AnkiClient,
    resources: ResourceHandler,
}

impl ToolHandler {
    pub fn new(client: AnkiClient, cache: Arc<SchemaCache>) -> Self {
        let resources = ResourceHandler::new(client.clone(), cache);
        Self { client, resources }
    }

    /// Run a tool. Client failures become `internal_error`.
    pub async fn execute(&self, request: ToolRequest) -> Result<CallToolResult, McpError> {
        match request {
            ToolRequest::ListDecks => self.list_decks().await,
            ToolRequest::CreateDeck(params) => self.create_deck(params).await,
            ToolRequest::DeleteDeck(params) => self.delete_deck(params).await,
            ToolRequest::ListNoteTypes => self.list_note_types().await,
            ToolRequest::GetNoteTypeInfo(params) => self.get_note_type_info(params).await,
            ToolRequest::CreateNoteType(params) => self.create_note_type(params).await,
            ToolRequest::CreateNote(params) => self.create_note(params).await,
            ToolRequest::BatchCreateNotes(params) => self.batch_create_notes(params).await,
            ToolRequest::SearchNotes(params) => self.search_notes(params).await,
            ToolRequest::GetNoteInfo(params) => self.get_note_info(params).await,
            ToolRequest::UpdateNote(params) => self.update_note(params).await,
            ToolRequest::DeleteNote(params) => self.delete_note(params).await,
            ToolRequest::GuiCurrentCard => self.gui_current_card().await,
            ToolRequest::GuiSelectedNotes => self.gui_selected_notes().await,
        }
    }
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to encode result: {}", e), None))?;
    Ok(text_result(text))
}
