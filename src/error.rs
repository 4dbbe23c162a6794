//! Error types for the GETTR client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Failed attempts inside the retry loop never surface on their own; only
//! [`Error::RequestExhausted`] crosses the request boundary.

use thiserror::Error;

/// Name of the remote service, used in exhaustion messages
pub const SERVICE_NAME: &str = "Gettr";

/// The main error type for the GETTR client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("unable to pull from {service} ({path}) after {attempts} attempt(s){}", describe_last(.last_status, .last_body))]
    RequestExhausted {
        service: String,
        path: String,
        attempts: u32,
        last_status: Option<u16>,
        last_body: Option<String>,
    },

    #[error("Invalid request '{field}': {message}")]
    InvalidRequest { field: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport / I/O Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an exhaustion error for the GETTR service
    pub fn exhausted(
        path: impl Into<String>,
        attempts: u32,
        last_status: Option<u16>,
        last_body: Option<String>,
    ) -> Self {
        Self::RequestExhausted {
            service: SERVICE_NAME.to_string(),
            path: path.into(),
            attempts,
            last_status,
            last_body,
        }
    }

    /// Check if this error means every retry was spent
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RequestExhausted { .. })
    }
}

fn describe_last(status: &Option<u16>, body: &Option<String>) -> String {
    match (*status, body.as_deref()) {
        (Some(status), Some(body)) if !body.is_empty() => {
            format!("; last response HTTP {status}: {}", truncate(body, 200))
        }
        (Some(status), _) => format!("; last response HTTP {status}"),
        (None, Some(body)) if !body.is_empty() => format!("; last error: {body}"),
        _ => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Result type alias for the GETTR client
pub type Result<T> = std::result::Result<T, Error>;
