//! Headless mode: run one query through the page and print the result.
//!
//! Goes through the same run command as the terminal page, so the printed
//! output is exactly what the output area would show.

use std::io::Write;

use crate::db::Value;
use crate::error::{RangeviewError, Result};
use crate::page::Page;
use crate::query::QueryFacade;
use crate::status::Status;

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessOutcome {
    pub output: String,
    pub status: Status,
}

impl HeadlessOutcome {
    /// Process exit code: 1 when the page ended in an error phase.
    pub fn exit_code(&self) -> i32 {
        if self.status.is_error() {
            1
        } else {
            0
        }
    }
}

/// Fills the input with `sql`, runs it, and returns what the page shows.
pub async fn run_query(
    page: &Page,
    facade: &QueryFacade,
    sql: &str,
    params: &[Value],
) -> HeadlessOutcome {
    page.set_input(sql);
    page.run_with_params(facade, params).await;
    HeadlessOutcome {
        output: page.output(),
        status: page.status(),
    }
}

/// Writes the output area to `out` and the status line to `err`.
pub fn write_outcome(
    outcome: &HeadlessOutcome,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", outcome.output)
        .and_then(|_| writeln!(err, "{}", outcome.status))
        .map_err(|e| RangeviewError::internal(format!("Failed to write output: {e}")))
}
