//! Query façade: "run SQL, get rows".
//!
//! Waits for the shared engine handle, then forwards SQL and parameters
//! verbatim. No parsing, validation, or sanitization happens here.

use std::time::Instant;

use tracing::debug;

use crate::connection::ConnectionManager;
use crate::db::{Row, Value};
use crate::error::Result;

/// Runs queries against the managed engine handle.
#[derive(Clone)]
pub struct QueryFacade {
    connections: ConnectionManager,
}

impl QueryFacade {
    /// Creates a new façade over `connections`.
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }

    /// Executes `sql` with `params` and returns the rows unmodified.
    ///
    /// Fails with the connection error when the handle cannot be obtained, or
    /// with the engine's query error.
    pub async fn run_query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let engine = self.connections.get_connection().await?;

        let start = Instant::now();
        let rows = engine.query(sql, params).await?;
        debug!(
            "Query returned {} row(s) in {:?}: {}",
            rows.len(),
            start.elapsed(),
            sql
        );

        Ok(rows)
    }

    /// Executes `sql` without parameters.
    pub async fn run_query_unbound(&self, sql: &str) -> Result<Vec<Row>> {
        self.run_query(sql, &[]).await
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }
}
