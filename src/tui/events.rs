//! Terminal input for the query page.
//!
//! Crossterm events are narrowed to what the page reacts to: key presses
//! (and repeats) plus resizes. Everything else, including key releases that
//! enhanced keyboards report, collapses into a redraw tick.

use crate::error::{RangeviewError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Redraw interval; also drives the spinner while connecting or running.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Input the page loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press or auto-repeat.
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing arrived within one tick.
    Tick,
}

impl Event {
    /// Narrows a raw terminal event, dropping what the page ignores.
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Self::Key(key)),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
            _ => None,
        }
    }
}

/// Polls the terminal once per tick.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: TICK_RATE,
        }
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Blocks for at most one tick and returns the next page event.
    pub fn next(&self) -> Result<Event> {
        let ready = event::poll(self.tick_rate)
            .map_err(|e| RangeviewError::internal(format!("Failed to poll events: {e}")))?;
        if !ready {
            return Ok(Event::Tick);
        }

        let raw = event::read()
            .map_err(|e| RangeviewError::internal(format!("Failed to read event: {e}")))?;
        Ok(Event::from_terminal(raw).unwrap_or(Event::Tick))
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
