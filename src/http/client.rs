//! GETTR API client with retry and backoff
//!
//! Provides the request executor that:
//! - Issues GET requests against the configured base URL
//! - Unwraps a single top-level field from the JSON response
//! - Retries failed attempts with exponential backoff
//! - Drives offset pagination (see [`crate::pagination`])

use super::backoff::{BackoffPolicy, Sleeper, TokioSleeper};
use super::request::RequestSpec;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{PageStream, PaginationConfig};
use crate::types::{JsonValue, QueryParams};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why one attempt did not produce a result.
///
/// Never returned to callers; the last one is folded into
/// [`Error::RequestExhausted`].
#[derive(Debug)]
enum AttemptFailure {
    /// Non-success HTTP status
    Status { status: u16, body: String },
    /// Success status, but the body is not JSON or lacks the result key
    MissingKey { status: u16, body: String },
    /// The request never produced a response
    Transport(String),
}

impl AttemptFailure {
    fn into_parts(self) -> (Option<u16>, Option<String>) {
        match self {
            Self::Status { status, body } | Self::MissingKey { status, body } => {
                (Some(status), Some(body))
            }
            Self::Transport(message) => (None, Some(message)),
        }
    }
}

/// HTTP client for the GETTR API
///
/// Cloning is cheap; clones share the connection pool and the sleeper.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
    backoff: BackoffPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiClient {
    /// Create a client against the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client against another base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::builder().base_url(base_url).build())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            backoff: BackoffPolicy::from_config(&config.backoff),
            config: Arc::new(config),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace how the client waits between attempts
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The backoff schedule in use
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// GET `path` with default retries and result key
    pub async fn get(&self, path: &str, params: QueryParams) -> Result<JsonValue> {
        let mut spec = RequestSpec::new(path);
        spec.params = params;
        self.execute(&spec).await
    }

    /// Execute a request, retrying until it succeeds or the budget is spent.
    ///
    /// An attempt fails when the status is not 2xx, when the body is not a
    /// JSON object holding `result_key`, or when no response arrives at all.
    /// After the k-th failure the client waits `unit * base^k` before the
    /// next attempt; the final failure is not followed by a wait.
    ///
    /// Each failure logs a `WARN` event with `path`, `attempt` and `retries`,
    /// plus `wait` when another attempt follows. A success logs a `DEBUG`
    /// event with `path`, `params` and the raw `body`.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<JsonValue> {
        spec.validate()?;

        let url = self.build_url(&spec.path);
        let mut last_failure = None;

        for attempt in 1..=spec.retries {
            match self.attempt(&url, spec).await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if attempt < spec.retries {
                        let wait = self.backoff.delay_for(attempt);
                        warn!(
                            path = %spec.path,
                            ?wait,
                            attempt,
                            retries = spec.retries,
                            "Unable to pull from API; waiting before retrying"
                        );
                        self.sleeper.sleep(wait).await;
                    } else {
                        warn!(
                            path = %spec.path,
                            attempt,
                            retries = spec.retries,
                            "Unable to pull from API; no attempts left"
                        );
                    }
                    last_failure = Some(failure);
                }
            }
        }

        let (last_status, last_body) = last_failure
            .map(AttemptFailure::into_parts)
            .unwrap_or_default();
        Err(Error::exhausted(
            spec.path.clone(),
            spec.retries,
            last_status,
            last_body,
        ))
    }

    /// Execute a request and deserialize the unwrapped value
    pub async fn execute_as<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T> {
        let value = self.execute(spec).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Page through `spec` by advancing an offset parameter.
    ///
    /// The returned stream never ends on its own; see [`PageStream`].
    pub fn paginate(&self, spec: RequestSpec, pagination: PaginationConfig) -> Result<PageStream> {
        spec.validate()?;
        pagination.validate()?;
        Ok(PageStream::new(self.clone(), spec, pagination))
    }

    /// One GET, classified
    async fn attempt(
        &self,
        url: &str,
        spec: &RequestSpec,
    ) -> std::result::Result<JsonValue, AttemptFailure> {
        let response = self
            .client
            .get(url)
            .query(&spec.params)
            .send()
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AttemptFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let extracted = match serde_json::from_str::<JsonValue>(&body) {
            Ok(JsonValue::Object(mut map)) => map.remove(&spec.result_key),
            _ => None,
        };

        match extracted {
            Some(value) => {
                debug!(path = %spec.path, params = ?spec.params, %body, "GET succeeded");
                Ok(value)
            }
            None => Err(AttemptFailure::MissingKey {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
