//! HTTP module
//!
//! Provides the GETTR API client with retry and backoff.
//!
//! # Features
//!
//! - **Field Unwrapping**: Each call returns one named field of the JSON body
//! - **Automatic Retries**: Bounded attempts per call, configurable per request
//! - **Backoff**: Unjittered exponential delays through an injectable [`Sleeper`]

mod backoff;
mod client;
mod request;

pub use backoff::{BackoffPolicy, RecordingSleeper, Sleeper, TokioSleeper};
pub use client::ApiClient;
pub use request::{RequestSpec, DEFAULT_RESULT_KEY, DEFAULT_RETRIES};
