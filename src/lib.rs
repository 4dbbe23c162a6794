//! # GETTR API Client
//!
//! A minimal client for the GETTR public API: GET a path, unwrap one field
//! of the JSON response, retry transient failures with exponential backoff,
//! and walk offset-paginated endpoints lazily.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use gettr_client::{ApiClient, PaginationConfig, RequestSpec, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ApiClient::new()?;
//!
//!     // One call, up to 3 attempts, returns body["results"]
//!     let profile = client.execute(&RequestSpec::new("/s/uinf/jack")).await?;
//!     println!("{profile}");
//!
//!     // Pages at offset 0, 20, 40, ... until we stop asking
//!     let mut pages = client
//!         .paginate(RequestSpec::new("/u/user/jack/posts"), PaginationConfig::default())?
//!         .take(3);
//!     while let Some(page) = pages.next().await {
//!         println!("{}", page?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  paginate(spec, cfg) → PageStream (infinite)  │
//! └───────────────────────┬───────────────────────┘
//!                         │ one execute() per poll
//! ┌───────────────────────┴───────────────────────┐
//! │  execute(spec) → JSON value at result_key     │
//! │  retry: wait unit·base^k after k-th failure   │
//! └──────────┬──────────────────────┬─────────────┘
//!        reqwest GET          Sleeper (tokio / test)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client with retry and backoff
pub mod http;

/// Offset pagination
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ApiClient, RequestSpec};
pub use pagination::{PageStream, PaginationConfig};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
