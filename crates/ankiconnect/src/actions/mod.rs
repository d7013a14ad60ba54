//! Action modules for AnkiConnect operations.
//!
//! Each module provides a set of related operations grouped by domain. The
//! wrappers only shape parameters and results; error handling lives in
//! [`AnkiClient::invoke`](crate::AnkiClient::invoke).

mod decks;
mod graphical;
mod models;
mod notes;

pub use decks::DeckActions;
pub use graphical::{CurrentCard, GuiActions};
pub use models::ModelActions;
pub use notes::NoteActions;
