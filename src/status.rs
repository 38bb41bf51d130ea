//! Lifecycle status shown in the page's status line.

use std::fmt;

/// Current lifecycle phase, rendered as a short human-readable message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    /// No connection attempt has been made yet.
    #[default]
    Disconnected,
    /// The engine is being bootstrapped.
    Connecting,
    /// The engine is ready.
    Connected,
    /// Bootstrapping the engine failed.
    ConnectionFailed,
    /// A query is in flight.
    Running,
    /// A query finished with the given number of rows.
    Done(usize),
    /// A query failed.
    QueryFailed,
}

impl Status {
    /// Returns true for the phases that report a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed | Self::QueryFailed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Not connected."),
            Self::Connecting => write!(f, "Connecting to DB…"),
            Self::Connected => write!(f, "Connected."),
            Self::ConnectionFailed => write!(f, "Error initializing DB."),
            Self::Running => write!(f, "Running…"),
            Self::Done(rows) => write!(f, "Done. {rows} row(s)."),
            Self::QueryFailed => write!(f, "Error."),
        }
    }
}

/// Receives status updates from the connection and query layers.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, status: Status);
}

/// A sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardStatus;

impl StatusSink for DiscardStatus {
    fn set_status(&self, _status: Status) {}
}
