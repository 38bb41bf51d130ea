//! Configuration management for rangeview.
//!
//! Built-in defaults can be overridden from a TOML file; the CLI applies its
//! own overrides on top (see `cli.rs`).

use crate::connection::FailurePolicy;
use crate::db::{EngineConfig, ServerMode, DEFAULT_CHUNK_SIZE};
use crate::error::{RangeviewError, Result};
use crate::page::DEFAULT_SANITY_QUERY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Origin the database is served from when no absolute URL is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Path of the database file on the server.
pub const DEFAULT_DB_PATH: &str = "/games.db";

/// Main configuration structure for rangeview.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Remote database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Connection lifecycle settings.
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Page behaviour.
    #[serde(default)]
    pub page: PageConfig,
}

/// Remote database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Absolute URL, or a path resolved against `base_url`.
    #[serde(default = "default_db_path")]
    pub url: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub server_mode: ServerMode,

    /// Byte length of each range request.
    #[serde(default = "default_chunk_size")]
    pub request_chunk_size: u64,

    /// Where the fetched database is stored. Defaults to the user cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_path(),
            base_url: default_base_url(),
            server_mode: ServerMode::default(),
            request_chunk_size: default_chunk_size(),
            cache_dir: None,
        }
    }
}

impl DatabaseConfig {
    /// Resolves `url` to an absolute http(s) URL.
    pub fn resolve_url(&self) -> Result<Url> {
        let url = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&self.base_url).map_err(|e| {
                    RangeviewError::config(format!("Invalid base_url '{}': {e}", self.base_url))
                })?;
                base.join(&self.url).map_err(|e| {
                    RangeviewError::config(format!("Invalid database url '{}': {e}", self.url))
                })?
            }
            Err(e) => {
                return Err(RangeviewError::config(format!(
                    "Invalid database url '{}': {e}",
                    self.url
                )))
            }
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RangeviewError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Returns the configured cache directory or the platform default.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("rangeview")
        })
    }

    /// Validates the settings and builds the engine configuration.
    pub fn to_engine_config(&self) -> Result<EngineConfig> {
        if self.request_chunk_size == 0 {
            return Err(RangeviewError::config(
                "request_chunk_size must be greater than zero",
            ));
        }
        if self.server_mode != ServerMode::Full {
            return Err(RangeviewError::config(format!(
                "server_mode '{}' is not supported; use 'full'",
                self.server_mode.as_str()
            )));
        }

        Ok(EngineConfig {
            url: self.resolve_url()?,
            server_mode: self.server_mode,
            request_chunk_size: self.request_chunk_size,
            cache_dir: self.cache_dir(),
        })
    }
}

/// Connection lifecycle settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Behaviour after a failed initialization attempt.
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

/// Page behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageConfig {
    /// Query logged once at startup.
    #[serde(default = "default_sanity_query")]
    pub sanity_query: String,

    #[serde(default = "default_true")]
    pub sanity_check: bool,
}

fn default_sanity_query() -> String {
    DEFAULT_SANITY_QUERY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sanity_query: default_sanity_query(),
            sanity_check: true,
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rangeview")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the built-in defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RangeviewError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            RangeviewError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
