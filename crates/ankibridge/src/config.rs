//! Runtime configuration of the bridge.

use std::time::Duration;

use ankiconnect::{AnkiClient, RetryPolicy};

use crate::cache::DEFAULT_TTL;

/// Settings the bridge needs to reach AnkiConnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// AnkiConnect host address.
    pub host: String,
    /// AnkiConnect port.
    pub port: u16,
    /// API key, when AnkiConnect is configured to require one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Timeout of the connectivity probe run before each request.
    pub probe_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry_policy: RetryPolicy,
    /// Time-to-live of cached note-type schemas.
    pub schema_ttl: Duration,
}

impl BridgeConfig {
    /// Create a configuration for the given AnkiConnect address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the API key from raw user input.
    ///
    /// See [`normalize_api_key`].
    pub fn with_api_key(mut self, raw: Option<&str>) -> Self {
        self.api_key = normalize_api_key(raw);
        self
    }

    /// The AnkiConnect URL.
    pub fn anki_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Build the AnkiConnect client for this configuration.
    pub fn client(&self) -> AnkiClient {
        let mut builder = AnkiClient::builder()
            .url(self.anki_url())
            .timeout(self.timeout)
            .probe_timeout(self.probe_timeout)
            .retry_policy(self.retry_policy.clone());

        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }

        builder.build()
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
            api_key: None,
            timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            retry_policy: RetryPolicy::default(),
            schema_ttl: DEFAULT_TTL,
        }
    }
}

/// Normalize an API key given on the command line.
///
/// Surrounding whitespace and one pair of matching surrounding quotes are
/// removed. A key that is empty afterwards counts as no key.
pub fn normalize_api_key(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|&quote| {
            trimmed
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(trimmed)
        .trim();

    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}
