//! Mock engine and bootstrap for testing.
//!
//! Provides in-memory implementations for headless runs and unit tests.

use super::{EngineBootstrap, EngineConfig, Handle, QueryEngine, Row, Value};
use crate::error::{RangeviewError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A mock engine that returns predefined results keyed by the exact SQL text.
///
/// SQL without a registered response yields zero rows.
#[derive(Default)]
pub struct MockEngine {
    responses: HashMap<String, Result<Vec<Row>>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockEngine {
    /// Creates a mock engine with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A small `games` fixture: the row-count query reports three games.
    pub fn games_fixture() -> Self {
        Self::new()
            .with_rows(
                "SELECT COUNT(*) AS n FROM games;",
                vec![Row::new().with("n", 3)],
            )
            .with_rows(
                "SELECT id, title FROM games ORDER BY id;",
                vec![
                    Row::new().with("id", 1).with("title", "Zork"),
                    Row::new().with("id", 2).with("title", "Tetris"),
                    Row::new().with("id", 3).with("title", "Myst"),
                ],
            )
    }

    /// Registers rows returned for `sql`.
    pub fn with_rows(mut self, sql: impl Into<String>, rows: Vec<Row>) -> Self {
        self.responses.insert(sql.into(), Ok(rows));
        self
    }

    /// Registers a query error returned for `sql`.
    pub fn with_error(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), Err(RangeviewError::query(message)));
        self
    }

    /// Number of queries executed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Every `(sql, params)` pair received, in order.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((sql.to_string(), params.to_vec()));
        }
        match self.responses.get(sql) {
            Some(response) => response.clone(),
            None => Ok(Vec::new()),
        }
    }
}

/// A mock bootstrap that counts invocations and hands out a fixed outcome.
pub struct MockBootstrap {
    outcome: Result<Handle>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockBootstrap {
    /// Bootstrap that succeeds with `engine`.
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            outcome: Ok(engine),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Bootstrap that always fails with a connection error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(RangeviewError::connection(message)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Waits `delay` before resolving, to keep attempts pending in tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times `create` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineBootstrap for MockBootstrap {
    async fn create(&self, _config: &EngineConfig) -> Result<Handle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
