//! CLI commands and argument parsing

use crate::http::{RequestSpec, DEFAULT_RESULT_KEY, DEFAULT_RETRIES};
use crate::pagination::{PaginationConfig, DEFAULT_OFFSET_PARAM, DEFAULT_OFFSET_STEP};
use crate::types::parse_param;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// GETTR API command-line client
#[derive(Parser, Debug)]
#[command(name = "gettr-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL (overrides config file and GETTR_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one path and print the extracted field
    Get {
        /// API path, e.g. /u/user/jack/posts
        path: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Page through a path by offset, one JSON line per page
    Paginate {
        /// API path, e.g. /u/user/jack/posts
        path: String,

        #[command(flatten)]
        request: RequestArgs,

        /// Query parameter carrying the offset
        #[arg(long, default_value = DEFAULT_OFFSET_PARAM)]
        offset_param: String,

        /// First offset
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset_start: i64,

        /// Offset increment per page
        #[arg(long, default_value_t = DEFAULT_OFFSET_STEP, allow_hyphen_values = true)]
        offset_step: i64,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Stop at the first empty page
        #[arg(long)]
        stop_on_empty: bool,
    },

    /// Print the resolved configuration
    Config,
}

/// Arguments shared by every request-issuing command
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Query parameter (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param_arg)]
    pub params: Vec<(String, String)>,

    /// Attempts per request
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// JSON field to extract from each response
    #[arg(long, default_value = DEFAULT_RESULT_KEY)]
    pub key: String,
}

impl RequestArgs {
    /// Build the request for `path`
    pub fn to_spec(&self, path: &str) -> RequestSpec {
        RequestSpec::new(path)
            .params(self.params.iter().map(|(k, v)| (k.clone(), v)))
            .retries(self.retries)
            .result_key(self.key.clone())
    }
}

/// Build pagination settings from CLI values
pub fn pagination_config(offset_param: &str, offset_start: i64, offset_step: i64) -> PaginationConfig {
    PaginationConfig::new()
        .offset_param(offset_param)
        .offset_start(offset_start)
        .offset_step(offset_step)
}

fn parse_param_arg(raw: &str) -> std::result::Result<(String, String), String> {
    parse_param(raw).map_err(|e| e.to_string())
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "gettr-client",
            "get",
            "/u/user/jack/posts",
            "-p",
            "max=20",
            "--param",
            "incl=posts",
            "--retries",
            "5",
        ])
        .unwrap();

        let Commands::Get { path, request } = cli.command else {
            panic!("Expected Get");
        };
        let spec = request.to_spec(&path);
        assert_eq!(spec.path, "/u/user/jack/posts");
        assert_eq!(spec.params.get("max"), Some(&"20".to_string()));
        assert_eq!(spec.params.get("incl"), Some(&"posts".to_string()));
        assert_eq!(spec.retries, 5);
        assert_eq!(spec.result_key, "results");
    }

    #[test]
    fn test_parse_paginate_defaults() {
        let cli = Cli::try_parse_from(["gettr-client", "paginate", "/x"]).unwrap();
        let Commands::Paginate {
            offset_param,
            offset_start,
            offset_step,
            max_pages,
            stop_on_empty,
            ..
        } = cli.command
        else {
            panic!("Expected Paginate");
        };
        assert_eq!(offset_param, "offset");
        assert_eq!(offset_start, 0);
        assert_eq!(offset_step, 20);
        assert_eq!(max_pages, None);
        assert!(!stop_on_empty);
    }

    #[test]
    fn test_parse_negative_step() {
        let cli = Cli::try_parse_from([
            "gettr-client",
            "paginate",
            "/x",
            "--offset-start",
            "100",
            "--offset-step",
            "-20",
        ])
        .unwrap();
        let Commands::Paginate {
            offset_param,
            offset_start,
            offset_step,
            ..
        } = cli.command
        else {
            panic!("Expected Paginate");
        };
        let config = pagination_config(&offset_param, offset_start, offset_step);
        assert_eq!(config.offset_start, 100);
        assert_eq!(config.offset_step, -20);
    }

    #[test]
    fn test_bad_param_rejected() {
        let result = Cli::try_parse_from(["gettr-client", "get", "/x", "-p", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "gettr-client",
            "config",
            "--base-url",
            "http://localhost:1234",
            "-v",
            "-f",
            "pretty",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:1234"));
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Pretty);
    }
}
