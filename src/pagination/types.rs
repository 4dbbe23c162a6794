//! Pagination types
//!
//! Defines the offset cursor and the settings that drive it.

use crate::error::{Error, Result};
use crate::http::RequestSpec;

/// Default query parameter carrying the offset
pub const DEFAULT_OFFSET_PARAM: &str = "offset";

/// Default page step
pub const DEFAULT_OFFSET_STEP: i64 = 20;

/// Configuration for offset pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Offset of the first page
    pub offset_start: i64,
    /// Amount added to the offset after each page (non-zero, may be negative)
    pub offset_step: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            offset_param: DEFAULT_OFFSET_PARAM.to_string(),
            offset_start: 0,
            offset_step: DEFAULT_OFFSET_STEP,
        }
    }
}

impl PaginationConfig {
    /// Create the default configuration (`offset`, from 0, by 20)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset parameter name
    #[must_use]
    pub fn offset_param(mut self, param: impl Into<String>) -> Self {
        self.offset_param = param.into();
        self
    }

    /// Set the first offset
    #[must_use]
    pub fn offset_start(mut self, start: i64) -> Self {
        self.offset_start = start;
        self
    }

    /// Set the step between pages
    #[must_use]
    pub fn offset_step(mut self, step: i64) -> Self {
        self.offset_step = step;
        self
    }

    /// Reject settings that would never move or never be sent
    pub fn validate(&self) -> Result<()> {
        if self.offset_param.is_empty() {
            return Err(Error::invalid_request("offset_param", "must not be empty"));
        }
        if self.offset_step == 0 {
            return Err(Error::invalid_request("offset_step", "must not be zero"));
        }
        Ok(())
    }

    /// A fresh cursor positioned at `offset_start`
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.offset_start, self.offset_step)
    }

    /// The request for one page: caller params plus the offset, which wins
    /// over any caller param of the same name.
    pub fn page_request(&self, base: &RequestSpec, offset: i64) -> RequestSpec {
        base.clone().param(self.offset_param.clone(), offset)
    }
}

/// Tracks the offset the next page will be requested at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: i64,
    step: i64,
}

impl PageCursor {
    /// Create a cursor
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            offset: start,
            step,
        }
    }

    /// Offset for the next page
    pub fn current(&self) -> i64 {
        self.offset
    }

    /// Step between pages
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Move to the next page
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.step);
    }
}
