//! Connection management for rangeview.
//!
//! Owns the single lazily created query engine handle.

pub mod manager;

pub use manager::{ConnectionManager, ConnectionManagerBuilder, ConnectionPhase, FailurePolicy};
