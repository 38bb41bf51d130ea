//! Query engine abstraction for rangeview.
//!
//! The engine is reached through two narrow contracts: [`EngineBootstrap`]
//! produces a ready [`QueryEngine`] handle, and the handle executes SQL and
//! returns row objects. The default bootstrap fetches the database file with
//! HTTP range requests and opens it read-only with SQLite.

mod bootstrap;
mod mock;
mod range;
mod sqlite;
mod types;

pub use bootstrap::HttpSqliteBootstrap;
pub use mock::{MockBootstrap, MockEngine};
pub use range::{parse_content_range, ContentRange, RangeFetcher};
pub use sqlite::SqliteEngine;
pub use types::{Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Default byte length of each range request.
pub const DEFAULT_CHUNK_SIZE: u64 = 4096;

/// Layout of the remote database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// A single database file accessed via HTTP range requests.
    #[default]
    Full,
    /// A database split into numbered chunk files. Not supported.
    Chunked,
}

impl ServerMode {
    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Chunked => "chunked",
        }
    }

    /// Parses a mode from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "chunked" => Some(Self::Chunked),
            _ => None,
        }
    }
}

/// Everything the engine bootstrap needs to open the remote database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Location of the database file.
    pub url: Url,
    /// Layout of the remote database.
    pub server_mode: ServerMode,
    /// Byte length of each range request.
    pub request_chunk_size: u64,
    /// Local directory the fetched database is stored in.
    pub cache_dir: PathBuf,
}

impl EngineConfig {
    /// Creates a config for a full-file database with the default chunk size.
    pub fn new(url: Url, cache_dir: PathBuf) -> Self {
        Self {
            url,
            server_mode: ServerMode::Full,
            request_chunk_size: DEFAULT_CHUNK_SIZE,
            cache_dir,
        }
    }

    /// File name for the local copy, taken from the last URL path segment.
    pub fn local_file_name(&self) -> String {
        self.url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(String::from)
            .unwrap_or_else(|| "database.sqlite".to_string())
    }
}

/// A live handle to the query engine.
pub type Handle = Arc<dyn QueryEngine>;

/// Executes SQL against an opened database.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Executes `sql` with `params` bound in order and returns every row.
    ///
    /// Neither the SQL nor the parameters are inspected or rewritten.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;
}

/// Creates query engine handles.
#[async_trait]
pub trait EngineBootstrap: Send + Sync {
    async fn create(&self, config: &EngineConfig) -> Result<Handle>;
}
