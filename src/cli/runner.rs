//! CLI runner - executes commands

use crate::cli::commands::{pagination_config, Cli, Commands, OutputFormat, RequestArgs};
use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::Result;
use crate::http::ApiClient;
use crate::pagination::PaginationConfig;
use crate::types::JsonValue;
use futures::StreamExt;
use std::io::Write;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing results to stdout
    pub async fn run(&self) -> Result<()> {
        self.run_to(&mut std::io::stdout()).await
    }

    /// Run the CLI command, writing results to `out`
    pub async fn run_to<W: Write + Send>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::Get { path, request } => self.get(out, path, request).await,
            Commands::Paginate {
                path,
                request,
                offset_param,
                offset_start,
                offset_step,
                max_pages,
                stop_on_empty,
            } => {
                let pagination = pagination_config(offset_param, *offset_start, *offset_step);
                let stop = StopConditions {
                    max_pages: *max_pages,
                    stop_on_empty: *stop_on_empty,
                };
                self.paginate(out, path, request, pagination, stop)
                    .await
                    .map(|_| ())
            }
            Commands::Config => self.show_config(out),
        }
    }

    /// Resolve configuration: defaults, file, environment, then flags
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .with_env();

        Ok(self.apply_flags(config))
    }

    fn apply_flags(&self, config: ClientConfig) -> ClientConfig {
        match &self.cli.base_url {
            Some(url) => ClientConfigBuilder::from_config(config)
                .base_url(url.clone())
                .build(),
            None => config,
        }
    }

    fn client(&self) -> Result<ApiClient> {
        ApiClient::with_config(self.resolve_config()?)
    }

    /// Fetch one path
    async fn get<W: Write + Send>(
        &self,
        out: &mut W,
        path: &str,
        request: &RequestArgs,
    ) -> Result<()> {
        let client = self.client()?;
        let value = client.execute(&request.to_spec(path)).await?;
        self.output(out, &value)
    }

    /// Page through a path until a caller-side stop condition holds.
    /// Returns the number of pages written.
    async fn paginate<W: Write + Send>(
        &self,
        out: &mut W,
        path: &str,
        request: &RequestArgs,
        pagination: PaginationConfig,
        stop: StopConditions,
    ) -> Result<usize> {
        if stop.max_pages.is_none() && !stop.stop_on_empty {
            warn!("No --max-pages or --stop-on-empty given; paging until interrupted");
        }
        if stop.max_pages == Some(0) {
            return Ok(0);
        }

        let client = self.client()?;
        let mut pages = client.paginate(request.to_spec(path), pagination)?;
        let mut fetched = 0usize;

        loop {
            let offset = pages.cursor();
            let Some(page) = pages.next().await else {
                break;
            };
            let page = page?;
            if stop.stop_on_empty && is_empty_page(&page) {
                info!(offset, "Empty page, stopping");
                break;
            }

            self.output(out, &page)?;
            fetched += 1;

            if stop.max_pages.is_some_and(|max| fetched >= max) {
                break;
            }
        }

        info!(pages = fetched, next_offset = pages.cursor(), "Pagination finished");
        Ok(fetched)
    }

    /// Print the resolved configuration
    fn show_config<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.resolve_config()?;
        write!(out, "{}", config.to_yaml()?)?;
        Ok(())
    }

    /// Output a value, one per line in JSON mode
    fn output<W: Write>(&self, out: &mut W, value: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}

/// When `paginate` stops asking for pages
#[derive(Debug, Clone, Copy)]
struct StopConditions {
    max_pages: Option<usize>,
    stop_on_empty: bool,
}

/// A page with nothing in it: null, `[]`, `{}`, or an object whose only
/// payload is an empty `data.list`
pub fn is_empty_page(page: &JsonValue) -> bool {
    match page {
        JsonValue::Null => true,
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => {
            map.is_empty()
                || page
                    .pointer("/data/list")
                    .and_then(JsonValue::as_array)
                    .is_some_and(Vec::is_empty)
        }
        _ => false,
    }
}
