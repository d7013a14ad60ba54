//! Typed request and answer bodies.

mod model;
mod note;

pub use model::{CardTemplate, CreateModelParams, ModelStyling, NamedTemplate, NoteTypeSchema};
pub use note::{FieldError, Note, NoteBuilder, NoteField, NoteFields, NoteInfo, NoteOptions};
