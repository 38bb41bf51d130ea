//! TUI widgets for rangeview.
//!
//! Contains reusable UI components.

pub mod header;
pub mod input;
pub mod output;
pub mod spinner;
