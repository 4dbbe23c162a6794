//! Pagination module
//!
//! # Overview
//!
//! The GETTR API pages by offset: the client keeps asking with a larger
//! offset until the caller decides to stop. There is no continuation token
//! and no total count, so [`PageStream`] is intentionally infinite and all
//! termination logic (empty page, page limit, sentinel) lives with the
//! consumer.

mod stream;
mod types;

pub use stream::PageStream;
pub use types::{PageCursor, PaginationConfig, DEFAULT_OFFSET_PARAM, DEFAULT_OFFSET_STEP};
