//! Common types used throughout the GETTR client
//!
//! This module contains shared type aliases and small helpers used by
//! the request, pagination and CLI layers.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters for a request.
///
/// Keys are unique. Ordering carries no meaning on the wire; a sorted map
/// keeps log output and URLs stable.
pub type QueryParams = BTreeMap<String, String>;

// ============================================================================
// Parameter Parsing
// ============================================================================

/// Parse a `key=value` pair into a query parameter.
///
/// The value may be empty (`key=`), the key may not.
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::invalid_request("params", format!("expected key=value, got '{raw}'")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_request(
            "params",
            format!("empty parameter name in '{raw}'"),
        ));
    }

    Ok((key.to_string(), value.to_string()))
}
