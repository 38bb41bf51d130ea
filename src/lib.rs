//! rangeview - a minimal query page for read-only SQLite databases served
//! over HTTP range requests.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod headless;
pub mod logging;
pub mod page;
pub mod query;
pub mod status;
pub mod tui;
