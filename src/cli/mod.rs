//! CLI module
//!
//! Command-line interface for the GETTR client.
//!
//! # Commands
//!
//! - `get` - Fetch one path and print the extracted field
//! - `paginate` - Page through a path by offset
//! - `config` - Print the resolved configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RequestArgs};
pub use runner::{is_empty_page, Runner};
