//! MCP resources backed by AnkiConnect.
//!
//! | URI | Content |
//! |-----|---------|
//! | `anki://decks/all` | every deck name |
//! | `anki://note-types/all` | every note-type name |
//! | `anki://note-types/all-with-schemas` | every note type with fields, templates and CSS |
//! | `anki://note-types/{modelName}` | one note type's schema |
//!
//! Schema reads go through the [`SchemaCache`]; name listings are always
//! fetched fresh.
//!
//! The fixed URIs win over the template, so a note type literally named
//! `all` or `all-with-schemas` is only reachable with an escaped name such
//! as `anki://note-types/%61ll`.

use std::sync::Arc;

use ankiconnect::{AnkiClient, NoteTypeSchema};
use rmcp::ErrorData as McpError;
use rmcp::model::{
    AnnotateAble, RawResource, RawResourceTemplate, ReadResourceResult, Resource,
    ResourceContents, ResourceTemplate,
};
use serde::Serialize;
use tracing::debug;

use crate::cache::SchemaCache;
use crate::error::anki_error;

/// All deck names.
pub const DECKS_URI: &str = "anki://decks/all";
/// All note-type names.
pub const NOTE_TYPES_URI: &str = "anki://note-types/all";
/// All note types with their schemas.
pub const NOTE_TYPES_WITH_SCHEMAS_URI: &str = "anki://note-types/all-with-schemas";
/// URI template of a single note-type schema.
pub const NOTE_TYPE_TEMPLATE: &str = "anki://note-types/{modelName}";

const NOTE_TYPE_PREFIX: &str = "anki://note-types/";
const JSON_MIME: &str = "application/json";

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Decks,
    NoteTypes,
    NoteTypesWithSchemas,
    /// A single note type, with its name percent-decoded.
    NoteType(String),
}

impl ResourceUri {
    /// Parse a resource URI. Returns `None` for URIs this server does not
    /// serve.
    pub fn parse(uri: &str) -> Option<Self> {
        match uri {
            DECKS_URI => Some(Self::Decks),
            NOTE_TYPES_URI => Some(Self::NoteTypes),
            NOTE_TYPES_WITH_SCHEMAS_URI => Some(Self::NoteTypesWithSchemas),
            _ => {
                let raw = uri.strip_prefix(NOTE_TYPE_PREFIX)?;
                if raw.is_empty() {
                    return None;
                }
                let name = urlencoding::decode(raw).ok()?;
                Some(Self::NoteType(name.into_owned()))
            }
        }
    }
}

/// The fixed resources.
pub fn list() -> Vec<Resource> {
    [
        (DECKS_URI, "decks", "Names of all decks"),
        (NOTE_TYPES_URI, "note-types", "Names of all note types"),
        (
            NOTE_TYPES_WITH_SCHEMAS_URI,
            "note-types-with-schemas",
            "All note types with their fields, card templates and CSS",
        ),
    ]
    .into_iter()
    .map(|(uri, name, description)| {
        let mut resource = RawResource::new(uri, name);
        resource.description = Some(description.to_string());
        resource.mime_type = Some(JSON_MIME.to_string());
        resource.no_annotation()
    })
    .collect()
}

/// The resource templates.
pub fn templates() -> Result<Vec<ResourceTemplate>, McpError> {
    let template: RawResourceTemplate = serde_json::from_value(serde_json::json!({
        "uriTemplate": NOTE_TYPE_TEMPLATE,
        "name": "note-type",
        "description": "Fields, card templates and CSS of one note type",
        "mimeType": JSON_MIME,
    }))
    .map_err(|e| McpError::internal_error(format!("Invalid resource template: {}", e), None))?;

    Ok(vec![template.no_annotation()])
}

/// Resolves resource URIs against AnkiConnect and the schema cache.
#[derive(Debug, Clone)]
pub struct ResourceHandler {
    client: AnkiClient,
    cache: Arc<SchemaCache>,
}

impl ResourceHandler {
    pub fn new(client: AnkiClient, cache: Arc<SchemaCache>) -> Self {
        Self { client, cache }
    }

    /// Read a resource.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let Some(parsed) = ResourceUri::parse(uri) else {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                None,
            ));
        };
        debug!(uri, "Reading resource");

        let text = match parsed {
            ResourceUri::Decks => {
                let decks = self.client.decks().names().await.map_err(anki_error)?;
                to_json(&decks)?
            }
            ResourceUri::NoteTypes => {
                let models = self.client.models().names().await.map_err(anki_error)?;
                to_json(&models)?
            }
            ResourceUri::NoteTypesWithSchemas => {
                let schemas = self.all_schemas().await?;
                to_json(schemas.as_ref())?
            }
            ResourceUri::NoteType(name) => {
                let schema = self.schema(&name).await?;
                to_json(schema.as_ref())?
            }
        };

        let mut contents = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(JSON_MIME.to_string());
        }

        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }

    /// Every note type with its schema, from the cache when fresh.
    pub async fn all_schemas(&self) -> Result<Arc<Vec<NoteTypeSchema>>, McpError> {
        if let Some(schemas) = self.cache.all() {
            debug!(count = schemas.len(), "Schema listing served from cache");
            return Ok(schemas);
        }

        let names = self.client.models().names().await.map_err(anki_error)?;
        let mut schemas = Vec::with_capacity(names.len());
        for name in &names {
            schemas.push(self.client.models().schema(name).await.map_err(anki_error)?);
        }

        debug!(count = schemas.len(), "Fetched all note-type schemas");
        Ok(self.cache.put_all(schemas))
    }

    /// One note type's schema. Unknown note types are reported as
    /// `resource_not_found`.
    pub async fn schema(&self, name: &str) -> Result<Arc<NoteTypeSchema>, McpError> {
        self.find_schema(name).await?.ok_or_else(|| {
            McpError::resource_not_found(format!("Note type '{}' not found", name), None)
        })
    }

    /// One note type's schema, from the cache when fresh. `None` if Anki
    /// has no note type of that name.
    pub async fn find_schema(&self, name: &str) -> Result<Option<Arc<NoteTypeSchema>>, McpError> {
        self.lookup_schema(name).await.map_err(anki_error)
    }

    /// [`find_schema`](Self::find_schema) with the client error left intact.
    pub async fn lookup_schema(
        &self,
        name: &str,
    ) -> ankiconnect::Result<Option<Arc<NoteTypeSchema>>> {
        if let Some(schema) = self.cache.model(name) {
            debug!(model = name, "Schema served from cache");
            return Ok(Some(schema));
        }

        let names = self.client.models().names().await?;
        if !names.iter().any(|n| n == name) {
            return Ok(None);
        }

        let schema = self.client.models().schema(name).await?;
        debug!(model = name, fields = schema.fields.len(), "Fetched note-type schema");
        Ok(Some(self.cache.put_model(schema)))
    }

    /// The schema cache shared with the tools.
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to encode resource: {}", e), None))
}
