//! Command-line argument parsing for rangeview.

use crate::config::Config;
use crate::connection::FailurePolicy;
use crate::db::Value;
use clap::Parser;
use std::path::PathBuf;

/// Query a read-only SQLite database served over HTTP range requests.
#[derive(Parser, Debug)]
#[command(name = "rangeview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database URL (absolute, or a path resolved against the configured base URL)
    #[arg(value_name = "URL", env = "RANGEVIEW_DB_URL")]
    pub url: Option<String>,

    /// Byte length of each HTTP range request
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<u64>,

    /// Directory the fetched database is stored in
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run a single query without the terminal UI and print the result
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Positional query parameter (repeatable; `null`, numbers, or text)
    #[arg(long = "param", value_name = "VALUE", requires = "query")]
    pub params: Vec<String>,

    /// Use the in-memory mock engine instead of fetching the database
    #[arg(long)]
    pub mock_db: bool,

    /// Start a new connection attempt after a failed one instead of reusing the error
    #[arg(long)]
    pub retry_failed_connection: bool,

    /// Skip the startup sanity query
    #[arg(long)]
    pub no_sanity_check: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns true if a single query should run without the terminal UI.
    pub fn is_headless(&self) -> bool {
        self.query.is_some()
    }

    /// Parses the `--param` values in order.
    pub fn query_params(&self) -> Vec<Value> {
        self.params.iter().map(|raw| Value::parse_param(raw)).collect()
    }

    /// Applies CLI overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.database.url = url.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.database.request_chunk_size = chunk_size;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.database.cache_dir = Some(cache_dir.clone());
        }
        if self.retry_failed_connection {
            config.connection.on_failure = FailurePolicy::Retry;
        }
        if self.no_sanity_check {
            config.page.sanity_check = false;
        }
    }
}
