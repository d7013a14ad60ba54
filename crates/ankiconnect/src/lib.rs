//! An async AnkiConnect client built to sit behind other protocols.
//!
//! The client is the only channel to AnkiConnect. It narrows every failure
//! into a closed three-way [`Error`], retries transient failures with
//! exponential backoff, and offers a cheap connectivity probe.
//!
//! # Quick Start
//!
//! ```no_run
//! use ankiconnect::AnkiClient;
//!
//! # async fn example() -> ankiconnect::Result<()> {
//! // Create a client with default settings (localhost:8765)
//! let client = AnkiClient::new();
//!
//! // Check that AnkiConnect is running
//! client.check_connection().await?;
//!
//! let models = client.models().names().await?;
//! println!("Note types: {:?}", models);
//! # Ok(())
//! # }
//! ```
//!
//! # Client Configuration
//!
//! ```no_run
//! use std::time::Duration;
//! use ankiconnect::{AnkiClient, RetryPolicy};
//!
//! let client = AnkiClient::builder()
//!     .url("http://localhost:8765")
//!     .api_key("your-api-key")
//!     .timeout(Duration::from_secs(60))
//!     .probe_timeout(Duration::from_secs(2))
//!     .retry_policy(RetryPolicy::new(3, Duration::from_millis(200), Duration::from_secs(2)))
//!     .build();
//! ```
//!
//! # Action Groups
//!
//! - [`AnkiClient::decks()`] - List, create and delete decks
//! - [`AnkiClient::notes()`] - Add, find, update, and delete notes
//! - [`AnkiClient::models()`] - Inspect and create note types
//! - [`AnkiClient::gui()`] - Inspect Anki's graphical interface
//!
//! Any other AnkiConnect action is reachable through [`AnkiClient::invoke`].

pub mod actions;
pub mod client;
pub mod error;
mod request;
pub mod retry;
pub mod types;

pub use actions::CurrentCard;
pub use client::{AnkiClient, ClientBuilder, DEFAULT_URL};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use types::{
    CardTemplate, CreateModelParams, FieldError, ModelStyling, NamedTemplate, Note, NoteBuilder,
    NoteField, NoteFields, NoteInfo, NoteOptions, NoteTypeSchema,
};
