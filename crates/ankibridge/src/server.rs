//! The MCP server.
//!
//! Listing tools works offline. Every other request first probes
//! AnkiConnect, and the outcome of a probe is never reused.

use std::sync::Arc;

use ankiconnect::AnkiClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use tracing::{debug, warn};

use crate::cache::{SchemaCache, SystemClock};
use crate::config::BridgeConfig;
use crate::error::preflight_error;
use crate::resources::{self, ResourceHandler};
use crate::tools::{self, ToolHandler, ToolRequest};

/// MCP server bridging to AnkiConnect.
#[derive(Debug, Clone)]
pub struct AnkiServer {
    client: AnkiClient,
    tools: ToolHandler,
    resources: ResourceHandler,
    definitions: Arc<Vec<Tool>>,
}

impl AnkiServer {
    /// Create a server from configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        let cache = SchemaCache::with_clock(config.schema_ttl, Arc::new(SystemClock));
        Self::from_client(config.client(), Arc::new(cache))
    }

    /// Create a server around an existing client and schema cache.
    pub fn from_client(client: AnkiClient, cache: Arc<SchemaCache>) -> Self {
        Self {
            tools: ToolHandler::new(client.clone(), cache.clone()),
            resources: ResourceHandler::new(client.clone(), cache),
            definitions: Arc::new(tools::definitions()),
            client,
        }
    }

    /// The tools this server offers. Never contacts Anki.
    pub fn tool_definitions(&self) -> Vec<Tool> {
        self.definitions.as_ref().clone()
    }

    /// Probe AnkiConnect before serving a request.
    pub async fn preflight(&self) -> Result<(), McpError> {
        self.client.check_connection().await.map_err(|err| {
            warn!(url = %self.client.url(), error = %err, "AnkiConnect unreachable");
            preflight_error(err)
        })
    }

    /// Handle a tool call: arguments are checked first, then connectivity,
    /// then the tool runs.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let request = ToolRequest::parse(name, arguments)?;
        self.preflight().await?;

        debug!(tool = request.name(), "Calling tool");
        self.tools.execute(request).await
    }

    /// The fixed resources, after a connectivity check.
    pub async fn resources(&self) -> Result<Vec<Resource>, McpError> {
        self.preflight().await?;
        Ok(resources::list())
    }

    /// The resource templates, after a connectivity check.
    pub async fn resource_templates(&self) -> Result<Vec<ResourceTemplate>, McpError> {
        self.preflight().await?;
        resources::templates()
    }

    /// Read a resource, after a connectivity check.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        self.preflight().await?;
        self.resources.read(uri).await
    }
}

impl ServerHandler for AnkiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Anki decks, notes and note types via AnkiConnect. \
                 Requires Anki to be running with the AnkiConnect add-on installed. \
                 Read anki://note-types/{modelName} before create_note to learn the exact \
                 field names; use batch_create_notes for several notes at once."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: self.tool_definitions(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.call(&request.name, request.arguments).await }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            Ok(ListResourcesResult {
                resources: self.resources().await?,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        async move {
            Ok(ListResourceTemplatesResult {
                resource_templates: self.resource_templates().await?,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { self.read(&request.uri).await }
    }
}
