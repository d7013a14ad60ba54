//! MCP server exposing AnkiConnect to LLM agents.
//!
//! The server offers tools for deck, note and note-type management and
//! read-only resources for note-type schemas:
//!
//! - [`tools`]: argument checking and execution of every tool
//! - [`resources`]: `anki://` resources, backed by a [`SchemaCache`]
//! - [`server`]: the [`rmcp::ServerHandler`] tying both to a connectivity
//!   check that runs before every request except tool listing
//!
//! # Example
//!
//! ```no_run
//! use ankibridge::{AnkiServer, BridgeConfig};
//! use rmcp::ServiceExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BridgeConfig::new("127.0.0.1", 8765).with_api_key(Some("secret"));
//! let server = AnkiServer::new(&config);
//!
//! let running = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
//! running.waiting().await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod resources;
pub mod server;
pub mod tools;

pub use cache::{Clock, DEFAULT_TTL, SchemaCache, SchemaKey, SystemClock, TtlCache};
pub use config::{BridgeConfig, normalize_api_key};
pub use resources::{ResourceHandler, ResourceUri};
pub use server::AnkiServer;
pub use tools::{ToolHandler, ToolRequest};
