//! Error types for rangeview.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for rangeview operations.
///
/// Every variant carries a plain message so the error is `Clone`: a failed
/// connection attempt is handed to every caller that awaited it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeviewError {
    /// Engine failed to initialize or the database file could not be fetched.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, missing tables, remote I/O, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, bad URL, zero chunk size, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal failures, panicked tasks, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RangeviewError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(msg) | Self::Query(msg) | Self::Config(msg) | Self::Internal(msg) => {
                msg
            }
        }
    }
}

/// Result type alias using RangeviewError.
pub type Result<T> = std::result::Result<T, RangeviewError>;
