//! Note-related types.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field values of a note, keyed by field name.
///
/// Field values are HTML. Field names are case-sensitive and must match the
/// note type's field names exactly; use [`NoteFields::check_against`] to
/// verify that before sending a note to Anki.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteFields(BTreeMap<String, String>);

impl NoteFields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check the mapping against the ordered field list of a note type.
    ///
    /// Every field name must be declared by the note type, and at least one
    /// value must be non-blank (Anki refuses empty notes).
    pub fn check_against(&self, model: &str, declared: &[String]) -> Result<(), FieldError> {
        let unknown: Vec<String> = self
            .0
            .keys()
            .filter(|name| !declared.contains(name))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            return Err(FieldError::Unknown {
                model: model.to_string(),
                unknown,
                declared: declared.to_vec(),
            });
        }

        if self.0.values().all(|value| value.trim().is_empty()) {
            return Err(FieldError::Empty {
                model: model.to_string(),
            });
        }

        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NoteFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A note's fields do not fit its note type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field names not declared by the note type.
    #[error("unknown field(s) {unknown:?} for note type '{model}' (expected {declared:?})")]
    Unknown {
        /// Note type name.
        model: String,
        /// Offending field names.
        unknown: Vec<String>,
        /// Fields the note type declares, in order.
        declared: Vec<String>,
    },

    /// No field carries content.
    #[error("note for note type '{model}' has no non-empty field")]
    Empty {
        /// Note type name.
        model: String,
    },
}

/// Body of an `addNote` request. Build one with [`NoteBuilder`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<NoteOptions>,
}

/// `addNote` options.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    /// Skip AnkiConnect's first-field duplicate check.
    pub allow_duplicate: bool,
}

/// A stored note as returned by `notesInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub note_id: i64,
    pub model_name: String,
    pub tags: Vec<String>,
    pub fields: HashMap<String, NoteField>,
    #[serde(default)]
    pub cards: Vec<i64>,
}

impl NoteInfo {
    /// Value of one field, if the note type has it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.value.as_str())
    }
}

/// One field of a stored note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteField {
    /// HTML content.
    pub value: String,
    /// Zero-based position in the note type's field list.
    pub order: i32,
}

/// Fluent construction of a [`Note`].
///
/// ```
/// use ankiconnect::NoteBuilder;
///
/// let note = NoteBuilder::new("Geography", "Basic")
///     .field("Front", "Capital of Peru?")
///     .field("Back", "Lima")
///     .tags(["south-america", "capitals"])
///     .build();
///
/// assert_eq!(note.fields.get("Back"), Some("Lima"));
/// assert_eq!(note.tags.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoteBuilder {
    deck: String,
    model: String,
    fields: NoteFields,
    tags: Vec<String>,
    allow_duplicate: bool,
}

impl NoteBuilder {
    /// Start a note for `model` in `deck`.
    pub fn new(deck: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name, value);
        self
    }

    /// Replace every field value set so far.
    pub fn fields(mut self, fields: NoteFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Let Anki store the note even if its first field repeats an existing note.
    pub fn allow_duplicate(mut self, allow: bool) -> Self {
        self.allow_duplicate = allow;
        self
    }

    pub fn build(self) -> Note {
        Note {
            deck_name: self.deck,
            model_name: self.model,
            fields: self.fields,
            tags: self.tags,
            options: self
                .allow_duplicate
                .then_some(NoteOptions { allow_duplicate: true }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> Vec<String> {
        vec!["Front".to_string(), "Back".to_string()]
    }

    #[test]
    fn declared_fields_pass() {
        let fields: NoteFields = [("Front", "hola"), ("Back", "hello")].into_iter().collect();
        assert_eq!(fields.check_against("Basic", &basic()), Ok(()));
    }

    #[test]
    fn partial_fields_pass() {
        let fields: NoteFields = [("Front", "hola")].into_iter().collect();
        assert!(fields.check_against("Basic", &basic()).is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let fields: NoteFields = [("Front", "hola"), ("Extra", "x")].into_iter().collect();
        let err = fields.check_against("Basic", &basic()).unwrap_err();
        assert_eq!(
            err,
            FieldError::Unknown {
                model: "Basic".into(),
                unknown: vec!["Extra".into()],
                declared: basic(),
            }
        );
    }

    #[test]
    fn blank_notes_are_rejected() {
        let fields: NoteFields = [("Front", "  "), ("Back", "")].into_iter().collect();
        assert!(matches!(
            fields.check_against("Basic", &basic()),
            Err(FieldError::Empty { .. })
        ));
        assert!(matches!(
            NoteFields::new().check_against("Basic", &basic()),
            Err(FieldError::Empty { .. })
        ));
    }

    #[test]
    fn note_serializes_for_add_note() {
        let note = NoteBuilder::new("Default", "Basic")
            .field("Front", "Q")
            .allow_duplicate(true)
            .build();
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(json["deckName"], "Default");
        assert_eq!(json["modelName"], "Basic");
        assert_eq!(json["fields"]["Front"], "Q");
        assert_eq!(json["options"]["allowDuplicate"], true);
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn options_omitted_unless_duplicates_allowed() {
        let note = NoteBuilder::new("Default", "Basic")
            .field("Front", "Q")
            .allow_duplicate(false)
            .build();
        let json = serde_json::to_value(&note).unwrap();

        assert!(json.get("options").is_none());
    }

    #[test]
    fn note_info_field_lookup() {
        let info: NoteInfo = serde_json::from_value(serde_json::json!({
            "noteId": 1,
            "modelName": "Basic",
            "tags": [],
            "fields": {
                "Front": {"value": "hola", "order": 0},
                "Back": {"value": "hello", "order": 1}
            }
        }))
        .unwrap();

        assert_eq!(info.field("Back"), Some("hello"));
        assert_eq!(info.field("Extra"), None);
        assert!(info.cards.is_empty());
    }
}
