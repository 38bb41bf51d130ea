//! Best-effort diagnostic query run once at startup.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::db::Row;
use crate::query::QueryFacade;

/// Row-count query against the `games` table.
pub const DEFAULT_SANITY_QUERY: &str = "SELECT COUNT(*) AS n FROM games;";

/// Spawns the sanity check and returns immediately.
///
/// The first column of the first row is logged; failures are logged too.
/// Page state is never touched.
pub fn spawn_sanity_check(facade: QueryFacade, sql: impl Into<String>) -> JoinHandle<()> {
    let sql = sql.into();
    tokio::spawn(async move {
        match facade.run_query_unbound(&sql).await {
            Ok(rows) => info!("{}", row_count_message(&rows)),
            Err(e) => error!("Sanity check query failed: {}", e),
        }
    })
}

/// Log line for the first column of the first row.
fn row_count_message(rows: &[Row]) -> String {
    let value = rows
        .first()
        .and_then(|row| row.iter().next())
        .map(|(_, value)| value.to_display_string())
        .unwrap_or_else(|| "none".to_string());
    format!("games table row count: {value}")
}
