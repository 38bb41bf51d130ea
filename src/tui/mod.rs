//! Terminal User Interface for rangeview.
//!
//! Draws the query page with ratatui and feeds crossterm key events to the
//! page's command handlers.

mod events;
mod ui;
pub mod widgets;

pub use events::{Event, EventHandler};

use crate::error::{RangeviewError, Result};
use crate::page::{KeyAction, Page};
use crate::query::QueryFacade;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info};
use ui::View;
use widgets::spinner::Spinner;

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
    /// Whether modifier+Enter can be told apart from Enter.
    keyboard_enhanced: bool,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let (terminal, keyboard_enhanced) = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
            keyboard_enhanced,
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, bool)> {
        enable_raw_mode()
            .map_err(|e| RangeviewError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            RangeviewError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        // Without this most terminals report Ctrl+Enter as a plain Enter.
        let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )
            .map_err(|e| {
                RangeviewError::internal(format!("Failed to enable keyboard enhancement: {e}"))
            })?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| RangeviewError::internal(format!("Failed to create terminal: {e}")))?;

        Ok((terminal, keyboard_enhanced))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        if self.keyboard_enhanced {
            let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }

        disable_raw_mode()
            .map_err(|e| RangeviewError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            RangeviewError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| RangeviewError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the page until the user quits.
    ///
    /// Queries run as spawned tasks; the frame is redrawn from the shared page
    /// state every tick, so the interface never waits on the engine.
    pub async fn run(&mut self, page: Page, facade: QueryFacade) -> Result<()> {
        // Restore the terminal before the default panic output is printed
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        if !self.keyboard_enhanced {
            info!("Terminal lacks keyboard enhancement; use F5 to run queries");
        }

        let result = self.run_event_loop(&page, &facade).await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(&mut self, page: &Page, facade: &QueryFacade) -> Result<()> {
        let database = facade.connections().config().url.to_string();
        let spinner = Spinner::new();

        loop {
            let state = page.snapshot();
            let view = View {
                page: &state,
                database: &database,
                is_connected: facade.connections().is_connected(),
                spinner: &spinner,
            };
            self.terminal
                .draw(|frame| ui::render(frame, &view))
                .map_err(|e| RangeviewError::internal(format!("Failed to draw: {e}")))?;

            let handler = self.event_handler;
            let event = tokio::task::spawn_blocking(move || handler.next())
                .await
                .map_err(|e| RangeviewError::internal(format!("Event task failed: {e}")))??;

            if let Event::Key(key) = event {
                match page.handle_key(key) {
                    KeyAction::Run => self.trigger_run(page, facade),
                    KeyAction::Quit => break,
                    KeyAction::Handled | KeyAction::Ignored => {}
                }
            }
        }

        Ok(())
    }

    /// Presses the run control. A disabled control ignores the press.
    fn trigger_run(&self, page: &Page, facade: &QueryFacade) {
        if !page.is_run_enabled() {
            debug!("Run ignored while a query is in flight");
            return;
        }
        let page = page.clone();
        let facade = facade.clone();
        tokio::spawn(async move {
            page.run(&facade).await;
        });
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive page.
pub async fn run(page: Page, facade: QueryFacade) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(page, facade).await
}
