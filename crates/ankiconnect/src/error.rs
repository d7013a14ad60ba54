//! Error types for the ankiconnect crate.
//!
//! Every failure talking to AnkiConnect is narrowed to one of three kinds
//! inside the client.
//!
//! - [`Error::Connection`]: Anki is not running, AnkiConnect is not installed,
//!   or the transport failed
//! - [`Error::Timeout`]: AnkiConnect did not answer within the deadline
//! - [`Error::Api`]: AnkiConnect answered with an error message
//!
//! # Example
//!
//! ```no_run
//! use ankiconnect::{AnkiClient, Error};
//!
//! # async fn example() {
//! let client = AnkiClient::new();
//!
//! match client.decks().names().await {
//!     Ok(decks) => println!("Found {} decks", decks.len()),
//!     Err(Error::Connection(_)) => eprintln!("Please start Anki with AnkiConnect installed"),
//!     Err(Error::Timeout(after)) => eprintln!("Anki did not answer within {:?}", after),
//!     Err(Error::Api(msg)) => eprintln!("AnkiConnect refused the request: {}", msg),
//! }
//! # }
//! ```

use std::time::Duration;

use thiserror::Error;

/// The error type for AnkiConnect operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The AnkiConnect endpoint could not be reached.
    ///
    /// This error occurs when:
    /// - Anki is not running
    /// - The AnkiConnect add-on is not installed
    /// - AnkiConnect is configured on a different port
    /// - The endpoint answered with a server error status
    #[error("Could not connect to Anki ({0}). Is Anki running with AnkiConnect installed?")]
    Connection(String),

    /// AnkiConnect did not respond within the deadline.
    #[error("AnkiConnect did not respond within {0:?}")]
    Timeout(Duration),

    /// AnkiConnect returned an error message.
    ///
    /// Common messages include:
    /// - "cannot create note because it is a duplicate"
    /// - "deck was not found"
    /// - "model was not found"
    ///
    /// A response whose result cannot be decoded is reported here as well.
    #[error("{0}")]
    Api(String),
}

impl Error {
    /// Connection failures and timeouts. API errors are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Timeout(_))
    }

    /// Short label for the error kind, used in log fields and messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Connection(_) => "connection",
            Error::Timeout(_) => "timeout",
            Error::Api(_) => "api",
        }
    }
}

/// A specialized Result type for AnkiConnect operations.
pub type Result<T> = std::result::Result<T, Error>;
