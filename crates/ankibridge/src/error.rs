//! Mapping of AnkiConnect failures onto MCP errors.
//!
//! Every client error leaves the server as an MCP internal error. The kind is
//! kept in the message text only.

use ankiconnect::Error as AnkiError;
use rmcp::ErrorData as McpError;

/// Convert a client error from a tool or resource call.
pub fn anki_error(err: AnkiError) -> McpError {
    McpError::internal_error(describe(&err), None)
}

/// Human-readable message naming the error kind.
pub fn describe(err: &AnkiError) -> String {
    match err {
        AnkiError::Connection(msg) => format!("Anki connection error: {}", msg),
        AnkiError::Timeout(after) => format!("Anki request timed out: no answer within {:?}", after),
        AnkiError::Api(msg) => format!("AnkiConnect error: {}", msg),
    }
}

/// Convert a failed connectivity check.
pub fn preflight_error(err: AnkiError) -> McpError {
    let message = match &err {
        AnkiError::Timeout(after) => format!(
            "Anki request timed out: AnkiConnect did not answer the connectivity check within {:?}",
            after
        ),
        AnkiError::Connection(msg) | AnkiError::Api(msg) => format!(
            "Anki connection error: Anki is not reachable ({}). \
             Start Anki and make sure the AnkiConnect add-on is installed.",
            msg
        ),
    };
    McpError::internal_error(message, None)
}

/// Arguments that do not fit a tool's input schema.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}
