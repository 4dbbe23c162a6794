//! Client configuration
//!
//! [`ClientConfig`] is resolved once, from lowest to highest precedence:
//! built-in defaults, an optional YAML file, the environment, then explicit
//! overrides from the builder or the CLI. The client owns it afterwards and
//! never mutates it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default GETTR API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.gettr.com";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "GETTR_API_BASE_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (None = transport default), `timeout_ms` in YAML
    #[serde(rename = "timeout_ms", default, with = "millis::option")]
    pub timeout: Option<Duration>,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
            user_agent: default_user_agent(),
            backoff: BackoffConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("gettr-client/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML text. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validate the config and return the parsed base URL
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        self.backoff.validate()?;
        Ok(url)
    }

    /// Render the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ============================================================================
// Backoff Config
// ============================================================================

/// Retry backoff configuration
///
/// The delay after the k-th failed attempt is `unit * base^k`. With the
/// defaults that is 4s, 16s, 64s, ... with no jitter and no ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Exponent base
    #[serde(default = "default_base")]
    pub base: u32,

    /// Length of one time unit, `unit_ms` in YAML
    #[serde(rename = "unit_ms", default = "default_unit", with = "millis")]
    pub unit: Duration,

    /// Optional ceiling on a single delay (None = uncapped), `max_delay_ms` in YAML
    #[serde(rename = "max_delay_ms", default, with = "millis::option")]
    pub max_delay: Option<Duration>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            unit: default_unit(),
            max_delay: None,
        }
    }
}

fn default_base() -> u32 {
    4
}

fn default_unit() -> Duration {
    Duration::from_secs(1)
}

impl BackoffConfig {
    /// Length of one time unit
    pub fn unit(&self) -> Duration {
        self.unit
    }

    /// Ceiling on a single delay, if any
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    fn validate(&self) -> Result<()> {
        if self.base == 0 {
            return Err(Error::config("backoff.base must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Duration fields
// ============================================================================

/// Durations are written to YAML as whole milliseconds. In memory they keep
/// full precision, so a builder value below 1ms is used exactly as given.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    fn to_millis(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(to_millis(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use super::to_millis;
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match duration {
                Some(duration) => serializer.serialize_some(&to_millis(*duration)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Start from an existing config
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the backoff base and time unit
    pub fn backoff(mut self, base: u32, unit: Duration) -> Self {
        self.config.backoff.base = base;
        self.config.backoff.unit = unit;
        self
    }

    /// Cap a single backoff delay
    pub fn max_delay(mut self, max: Duration) -> Self {
        self.config.backoff.max_delay = Some(max);
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
