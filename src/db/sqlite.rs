//! SQLite query engine implementation.
//!
//! Provides the `SqliteEngine` struct that implements the `QueryEngine` trait
//! over a read-only SQLite file using sqlx.

use crate::db::{QueryEngine, Row, Value};
use crate::error::{RangeviewError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::query::Query;
use sqlx::{Column as SqlxColumn, Row as SqlxRow, Sqlite, TypeInfo, ValueRef};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum pooled connections to the local database file.
const MAX_CONNECTIONS: u32 = 4;

/// SQLite query engine.
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    pool: SqlitePool,
}

impl SqliteEngine {
    /// Opens the database file at `path` read-only and immutable.
    ///
    /// Immutable mode skips locking and never looks for `-wal` or `-shm`
    /// siblings, which are not fetched.
    pub async fn open_read_only(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .immutable(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                RangeviewError::connection(format!(
                    "Failed to open database {}: {e}",
                    path.display()
                ))
            })?;

        debug!("Opened {} read-only", path.display());
        Ok(Self { pool })
    }

    /// Creates a SqliteEngine from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryEngine for SqliteEngine {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let start = Instant::now();

        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param));

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RangeviewError::query(format_query_error(e)))?;

        debug!(
            "SQLite returned {} row(s) in {:?}",
            rows.len(),
            start.elapsed()
        );

        rows.iter().map(convert_row).collect()
    }
}

/// Binds one parameter according to its SQLite storage class.
fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(i) => query.bind(*i),
        Value::Real(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
        Value::Blob(b) => query.bind(b.clone()),
    }
}

/// Converts a SQLite row into a row object keyed by the declared column names.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.insert(column.name(), convert_value(row, index)?);
    }
    Ok(out)
}

/// Reads one cell using its runtime storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| RangeviewError::query(format!("Failed to read column {index}: {e}")))?;

    if raw.is_null() {
        return Ok(Value::Null);
    }

    let storage_class = raw.type_info().name().to_uppercase();
    let decoded = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => row.try_get_unchecked::<i64, _>(index).map(Value::Integer),
        "REAL" | "NUMERIC" => row.try_get_unchecked::<f64, _>(index).map(Value::Real),
        "BLOB" => row.try_get_unchecked::<Vec<u8>, _>(index).map(Value::Blob),
        _ => row.try_get_unchecked::<String, _>(index).map(Value::Text),
    };

    decoded.map_err(|e| RangeviewError::query(format!("Failed to decode column {index}: {e}")))
}

/// Strips sqlx's wrapper text so the engine's own message reaches the user.
fn format_query_error(error: sqlx::Error) -> String {
    match error {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
