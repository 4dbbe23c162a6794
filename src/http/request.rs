//! Per-call request description

use crate::error::{Error, Result};
use crate::types::QueryParams;
use std::fmt::Display;

/// Default number of attempts per call
pub const DEFAULT_RETRIES: u32 = 3;

/// Default JSON field unwrapped from a response
pub const DEFAULT_RESULT_KEY: &str = "results";

/// A single GET call: path, query, retry budget and the field to unwrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Path appended to the base URL
    pub path: String,
    /// Query parameters
    pub params: QueryParams,
    /// Maximum number of attempts (at least 1)
    pub retries: u32,
    /// Top-level JSON field holding the result (non-empty)
    pub result_key: String,
}

impl RequestSpec {
    /// Create a request for `path` with default retries and result key
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
            retries: DEFAULT_RETRIES,
            result_key: DEFAULT_RESULT_KEY.to_string(),
        }
    }

    /// Add or replace a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Add or replace several query parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Set the attempt budget
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the JSON field to unwrap
    #[must_use]
    pub fn result_key(mut self, key: impl Into<String>) -> Self {
        self.result_key = key.into();
        self
    }

    /// Reject specs that can never succeed
    pub fn validate(&self) -> Result<()> {
        if self.retries == 0 {
            return Err(Error::invalid_request("retries", "must be at least 1"));
        }
        if self.result_key.is_empty() {
            return Err(Error::invalid_request("result_key", "must not be empty"));
        }
        Ok(())
    }
}
