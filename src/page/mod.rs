//! The query page: input, run control, status line, and output area.
//!
//! UI callbacks are modelled as explicit command handlers on [`Page`] that
//! take the [`QueryFacade`] as a dependency, so the whole flow is testable
//! without a terminal.

mod input;
mod sanity;

pub use input::TextInput;
pub use sanity::{spawn_sanity_check, DEFAULT_SANITY_QUERY};

use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::error;

use crate::db::{Row, Value};
use crate::error::{RangeviewError, Result};
use crate::query::QueryFacade;
use crate::status::{Status, StatusSink};

/// Identifier of the SQL input control.
pub const SQL_INPUT_ID: &str = "sql";
/// Identifier of the run control.
pub const RUN_BUTTON_ID: &str = "runBtn";
/// Identifier of the status line.
pub const STATUS_ID: &str = "status";
/// Identifier of the output area.
pub const OUTPUT_ID: &str = "out";

/// Shown when the run command is triggered with blank input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a SQL query.";
/// Shown when a query succeeds without rows.
pub const NO_ROWS_MESSAGE: &str = "No rows.";

/// Which control receives typed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    Output,
}

impl Focus {
    /// Returns the element identifier of the focused control.
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Input => SQL_INPUT_ID,
            Self::Output => OUTPUT_ID,
        }
    }

    fn toggle(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Result of handling a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Trigger the run command. The key's default effect was suppressed.
    Run,
    /// Leave the page.
    Quit,
    /// The key changed page state.
    Handled,
    /// The key has no meaning here.
    Ignored,
}

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub input: TextInput,
    pub run_enabled: bool,
    pub status: Status,
    pub output: String,
    pub output_scroll: u16,
    pub focus: Focus,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            run_enabled: true,
            status: Status::default(),
            output: String::new(),
            output_scroll: 0,
            focus: Focus::default(),
        }
    }
}

/// Shared handle to the page state.
///
/// Clones refer to the same page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a copy of the current state for rendering.
    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    pub fn set_input(&self, sql: impl Into<String>) {
        self.lock().input.set(sql);
    }

    pub fn input_text(&self) -> String {
        self.lock().input.text().to_string()
    }

    pub fn output(&self) -> String {
        self.lock().output.clone()
    }

    pub fn status(&self) -> Status {
        self.lock().status
    }

    pub fn is_run_enabled(&self) -> bool {
        self.lock().run_enabled
    }

    pub fn clear_output(&self) {
        let mut state = self.lock();
        state.output.clear();
        state.output_scroll = 0;
    }

    /// Run command without parameters (the run control and keyboard shortcut).
    pub async fn run(&self, facade: &QueryFacade) {
        self.run_with_params(facade, &[]).await;
    }

    /// Run command: executes the input's SQL and renders the outcome.
    ///
    /// Overlapping runs are not serialized: each one writes the page when it
    /// completes, so the last to finish wins. The disabled run control only
    /// gates presses of the control itself.
    pub async fn run_with_params(&self, facade: &QueryFacade, params: &[Value]) {
        let sql = {
            let mut state = self.lock();
            let sql = state.input.text().trim().to_string();
            if sql.is_empty() {
                state.output = EMPTY_INPUT_MESSAGE.to_string();
                return;
            }
            state.run_enabled = false;
            state.output.clear();
            state.output_scroll = 0;
            state.status = Status::Running;
            sql
        };

        let rendered = match facade.run_query(&sql, params).await {
            Ok(rows) => format_rows(&rows).map(|text| (text, rows.len())),
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        match rendered {
            Ok((text, count)) => {
                state.output = text;
                state.status = Status::Done(count);
            }
            Err(e) => {
                error!("Query error: {}", e);
                state.output = format!("Error: {}", e.message());
                state.status = Status::QueryFailed;
            }
        }
        state.run_enabled = true;
    }

    /// Applies a key press to the page.
    ///
    /// Control/Command + Enter in the input runs the query instead of inserting
    /// a newline. F5 presses the run control from anywhere.
    pub fn handle_key(&self, key: KeyEvent) -> KeyAction {
        if key.kind == KeyEventKind::Release {
            return KeyAction::Ignored;
        }

        let platform_modifier = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        let mut state = self.lock();

        match key.code {
            KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return KeyAction::Quit;
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.output.clear();
                state.output_scroll = 0;
                return KeyAction::Handled;
            }
            KeyCode::F(5) => return KeyAction::Run,
            KeyCode::Tab => {
                state.focus = state.focus.toggle();
                return KeyAction::Handled;
            }
            _ => {}
        }

        match state.focus {
            Focus::Input => match key.code {
                KeyCode::Enter if platform_modifier => KeyAction::Run,
                KeyCode::Enter => {
                    state.input.insert_newline();
                    KeyAction::Handled
                }
                KeyCode::Char(c) if !platform_modifier => {
                    state.input.insert_char(c);
                    KeyAction::Handled
                }
                KeyCode::Backspace => {
                    state.input.backspace();
                    KeyAction::Handled
                }
                KeyCode::Left => {
                    state.input.move_left();
                    KeyAction::Handled
                }
                KeyCode::Right => {
                    state.input.move_right();
                    KeyAction::Handled
                }
                _ => KeyAction::Ignored,
            },
            Focus::Output => match key.code {
                KeyCode::Up => {
                    state.output_scroll = state.output_scroll.saturating_sub(1);
                    KeyAction::Handled
                }
                KeyCode::Down => {
                    state.output_scroll = state.output_scroll.saturating_add(1);
                    KeyAction::Handled
                }
                KeyCode::PageUp => {
                    state.output_scroll = state.output_scroll.saturating_sub(10);
                    KeyAction::Handled
                }
                KeyCode::PageDown => {
                    state.output_scroll = state.output_scroll.saturating_add(10);
                    KeyAction::Handled
                }
                _ => KeyAction::Ignored,
            },
        }
    }
}

impl StatusSink for Page {
    fn set_status(&self, status: Status) {
        self.lock().status = status;
    }
}

/// Formats a result set for the output area.
///
/// Empty results become [`NO_ROWS_MESSAGE`]; anything else is pretty-printed
/// JSON with two-space indentation.
pub fn format_rows(rows: &[Row]) -> Result<String> {
    if rows.is_empty() {
        return Ok(NO_ROWS_MESSAGE.to_string());
    }
    serde_json::to_string_pretty(rows)
        .map_err(|e| RangeviewError::internal(format!("Failed to format rows: {e}")))
}
