//! The AnkiConnect client and builder.
//!
//! All traffic to AnkiConnect goes through [`AnkiClient::invoke`]. That is the
//! one place where transport failures and API error strings are narrowed to
//! [`Error`], and where transient failures are retried.

use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, trace};

use crate::actions::{DeckActions, GuiActions, ModelActions, NoteActions};
use crate::error::{Error, Result};
use crate::request::{AnkiRequest, AnkiResponse};
use crate::retry::RetryPolicy;

/// Where AnkiConnect listens out of the box.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheapest action AnkiConnect offers; used as the connectivity probe.
const PROBE_ACTION: &str = "version";

/// Handle on one AnkiConnect endpoint. Cheap to clone.
///
/// ```no_run
/// use ankiconnect::AnkiClient;
///
/// # async fn example() -> ankiconnect::Result<()> {
/// let client = AnkiClient::new();
/// client.check_connection().await?;
///
/// for deck in client.decks().names().await? {
///     println!("{}", deck);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
    probe_timeout: Duration,
    retry_policy: RetryPolicy,
}

impl AnkiClient {
    /// Client for a local Anki on [`DEFAULT_URL`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Policy applied to every action except the connectivity probe.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn decks(&self) -> DeckActions<'_> {
        DeckActions { client: self }
    }

    pub fn notes(&self) -> NoteActions<'_> {
        NoteActions { client: self }
    }

    /// Note type operations. AnkiConnect calls note types "models".
    pub fn models(&self) -> ModelActions<'_> {
        ModelActions { client: self }
    }

    pub fn gui(&self) -> GuiActions<'_> {
        GuiActions { client: self }
    }

    /// Probe AnkiConnect with a lightweight request.
    ///
    /// Uses the probe timeout and is never retried. An API error in answer
    /// to the probe (a wrong API key, for one) is reported as
    /// [`Error::Connection`].
    pub async fn check_connection(&self) -> Result<()> {
        let request = AnkiRequest::<()>::without_params(PROBE_ACTION, self.api_key.as_deref());
        let body = encode(PROBE_ACTION, &request)?;

        match self.post(&body, self.probe_timeout).await {
            Ok(_) => {
                trace!(url = %self.url, "AnkiConnect reachable");
                Ok(())
            }
            Err(Error::Api(msg)) => Err(Error::Connection(format!(
                "AnkiConnect rejected the connectivity probe: {}",
                msg
            ))),
            Err(err) => Err(err),
        }
    }

    /// Run `action` with `params` and decode its result.
    ///
    /// Transient failures are retried according to the client's
    /// [`RetryPolicy`]; an error answered by AnkiConnect is returned at once
    /// as [`Error::Api`]. A `null` result decodes into `()` or `Option<T>`.
    pub async fn invoke<P, R>(&self, action: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = AnkiRequest::new(action, params, self.api_key.as_deref());
        self.dispatch(action, &request).await
    }

    /// Run a parameterless action.
    pub async fn invoke_without_params<R>(&self, action: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request = AnkiRequest::<()>::without_params(action, self.api_key.as_deref());
        self.dispatch(action, &request).await
    }

    /// Run an action whose result is ignored.
    pub(crate) async fn invoke_void<P>(&self, action: &str, params: P) -> Result<()>
    where
        P: Serialize,
    {
        let _: serde_json::Value = self.invoke(action, params).await?;
        Ok(())
    }

    async fn dispatch<T, R>(&self, action: &str, request: &AnkiRequest<'_, T>) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let body = encode(action, request)?;
        debug!(action, "Calling AnkiConnect");

        let result = self
            .retry_policy
            .execute(action, || self.post(&body, self.timeout))
            .await?;

        serde_json::from_value(result)
            .map_err(|e| Error::Api(format!("Unexpected result for '{}': {}", action, e)))
    }

    /// Send one request and interpret the response envelope.
    async fn post(&self, body: &serde_json::Value, timeout: Duration) -> Result<serde_json::Value> {
        let response = self
            .http_client
            .post(&self.url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Error::Connection(format!(
                "AnkiConnect answered with HTTP {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(Error::Api(format!(
                "AnkiConnect answered with HTTP {}",
                status
            )));
        }

        let anki_response: AnkiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::Api(format!("Malformed AnkiConnect response: {}", e))
            }
        })?;

        match anki_response.error {
            Some(err) => Err(Error::Api(err)),
            None => Ok(anki_response.result),
        }
    }
}

impl Default for AnkiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(action: &str, request: &AnkiRequest<'_, T>) -> Result<serde_json::Value> {
    serde_json::to_value(request)
        .map_err(|e| Error::Api(format!("Could not encode parameters for '{}': {}", action, e)))
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout(timeout)
    } else {
        Error::Connection(err.to_string())
    }
}

/// Configures an [`AnkiClient`].
///
/// ```no_run
/// use std::time::Duration;
/// use ankiconnect::{AnkiClient, RetryPolicy};
///
/// let client = AnkiClient::builder()
///     .url("http://192.168.1.20:8765")
///     .api_key("hunter2")
///     .probe_timeout(Duration::from_secs(2))
///     .retry_policy(RetryPolicy::none())
///     .build();
/// assert_eq!(client.url(), "http://192.168.1.20:8765");
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
    probe_timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// AnkiConnect endpoint, [`DEFAULT_URL`] unless set.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Key sent with every request, for AnkiConnect setups with `apiKey` configured.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Per-attempt deadline of ordinary actions (30s unless set).
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Deadline of [`AnkiClient::check_connection`] (5s unless set).
    pub fn probe_timeout(mut self, duration: Duration) -> Self {
        self.probe_timeout = duration;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn build(self) -> AnkiClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("Failed to build HTTP client");

        AnkiClient {
            http_client,
            url: self.url,
            api_key: self.api_key,
            timeout: self.timeout,
            probe_timeout: self.probe_timeout,
            retry_policy: self.retry_policy,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
