//! Note actions.
//!
//! # Example
//!
//! ```no_run
//! use ankiconnect::{AnkiClient, NoteBuilder};
//!
//! # async fn example() -> ankiconnect::Result<()> {
//! let client = AnkiClient::new();
//!
//! let note = NoteBuilder::new("Spanish", "Basic")
//!     .field("Front", "hola")
//!     .field("Back", "hello")
//!     .tag("greeting")
//!     .build();
//! let id = client.notes().add(&note).await?;
//!
//! let found = client.notes().find("deck:Spanish tag:greeting").await?;
//! assert!(found.contains(&id));
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::client::AnkiClient;
use crate::error::Result;
use crate::types::{Note, NoteFields, NoteInfo};

/// Note operations, obtained via [`AnkiClient::notes()`].
#[derive(Debug)]
pub struct NoteActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

#[derive(Serialize)]
struct NoteParam<T> {
    note: T,
}

#[derive(Serialize)]
struct QueryParam<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct IdsParam<'a> {
    notes: &'a [i64],
}

/// Body of `updateNote`. Absent parts are left unchanged by Anki.
#[derive(Serialize)]
struct NoteUpdate<'a> {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a NoteFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

impl<'a> NoteActions<'a> {
    /// Add a note and return its ID.
    ///
    /// AnkiConnect answers with an error for duplicates unless the note
    /// allows them (see [`NoteBuilder::allow_duplicate`](crate::NoteBuilder::allow_duplicate)).
    pub async fn add(&self, note: &Note) -> Result<i64> {
        self.client.invoke("addNote", NoteParam { note }).await
    }

    /// IDs of the notes matching an Anki search query.
    pub async fn find(&self, query: &str) -> Result<Vec<i64>> {
        self.client.invoke("findNotes", QueryParam { query }).await
    }

    /// Whether a note with this ID exists.
    pub async fn exists(&self, note_id: i64) -> Result<bool> {
        let query = format!("nid:{}", note_id);
        Ok(self.find(&query).await?.contains(&note_id))
    }

    /// Fields, tags, note type and cards of each note.
    pub async fn info(&self, note_ids: &[i64]) -> Result<Vec<NoteInfo>> {
        self.client
            .invoke("notesInfo", IdsParam { notes: note_ids })
            .await
    }

    /// Change some fields of a note and/or replace its tags, in one call.
    ///
    /// Fields not in `fields` keep their value.
    pub async fn update(
        &self,
        note_id: i64,
        fields: Option<&NoteFields>,
        tags: Option<&[String]>,
    ) -> Result<()> {
        let note = NoteUpdate {
            id: note_id,
            fields,
            tags,
        };
        self.client
            .invoke_void("updateNote", NoteParam { note })
            .await
    }

    /// Delete notes together with their cards.
    pub async fn delete(&self, note_ids: &[i64]) -> Result<()> {
        self.client
            .invoke_void("deleteNotes", IdsParam { notes: note_ids })
            .await
    }
}
