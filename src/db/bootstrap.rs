//! Default engine bootstrap: HTTP range download, then read-only SQLite.

use super::{EngineBootstrap, EngineConfig, Handle, RangeFetcher, ServerMode, SqliteEngine};
use crate::error::{RangeviewError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Fetches the database file over HTTP range requests and opens it with SQLite.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpSqliteBootstrap;

impl HttpSqliteBootstrap {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EngineBootstrap for HttpSqliteBootstrap {
    async fn create(&self, config: &EngineConfig) -> Result<Handle> {
        if config.server_mode != ServerMode::Full {
            return Err(RangeviewError::connection(format!(
                "Server mode '{}' is not supported",
                config.server_mode.as_str()
            )));
        }

        tokio::fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| {
                RangeviewError::connection(format!(
                    "Could not create cache directory {}: {e}",
                    config.cache_dir.display()
                ))
            })?;

        let local_path = config.cache_dir.join(config.local_file_name());
        info!(
            "Fetching {} in {}-byte ranges into {}",
            config.url,
            config.request_chunk_size,
            local_path.display()
        );

        let fetcher = RangeFetcher::new(config.url.clone(), config.request_chunk_size)?;
        fetcher.download_to(&local_path).await?;

        let engine = SqliteEngine::open_read_only(&local_path).await?;
        Ok(Arc::new(engine))
    }
}
