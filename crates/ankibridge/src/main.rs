//! `ankibridge`: serve a running Anki to MCP clients.

use std::sync::Arc;
use std::time::Duration;

use ankibridge::{AnkiServer, BridgeConfig};
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

/// Expose Anki decks, notes and note types over the Model Context Protocol.
///
/// Anki must be running with the AnkiConnect add-on installed.
#[derive(Parser, Debug)]
#[command(name = "ankibridge", version, about)]
struct Args {
    /// AnkiConnect host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// AnkiConnect port
    #[arg(long, default_value_t = 8765)]
    port: u16,

    /// AnkiConnect API key; quotes and surrounding whitespace are ignored
    #[arg(long)]
    api_key: Option<String>,

    /// Seconds to wait for each AnkiConnect answer
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Seconds a fetched note type schema stays cached
    #[arg(long, default_value_t = 300)]
    schema_ttl_secs: u64,

    /// How MCP clients connect
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Bind address for `--transport http`
    #[arg(long, default_value = "127.0.0.1")]
    http_host: String,

    /// Bind port for `--transport http`
    #[arg(long, default_value_t = 3000)]
    http_port: u16,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins if set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout, for clients that spawn the server
    Stdio,
    /// Streamable HTTP on `/mcp`
    Http,
}

impl Args {
    fn config(&self) -> BridgeConfig {
        let mut config = BridgeConfig::new(self.host.clone(), self.port)
            .with_api_key(self.api_key.as_deref());
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.schema_ttl = Duration::from_secs(self.schema_ttl_secs);
        config
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    // stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = args.config();
    info!(
        anki_url = %config.anki_url(),
        api_key = config.api_key.is_some(),
        transport = ?args.transport,
        "Starting ankibridge"
    );
    let server = AnkiServer::new(&config);

    match args.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, &args.http_host, args.http_port).await,
    }
}

async fn serve_stdio(server: AnkiServer) -> Result<(), BoxError> {
    let running = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
    running.waiting().await?;
    Ok(())
}

async fn serve_http(server: AnkiServer, host: &str, port: u16) -> Result<(), BoxError> {
    let service: StreamableHttpService<AnkiServer, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(server.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );
    let router = axum::Router::new().nest_service("/mcp", service);

    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind_addr = %bind_addr, "Listening for MCP over HTTP at /mcp");

    axum::serve(listener, router).await?;
    Ok(())
}
