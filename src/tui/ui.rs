//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::widgets::{header::Header, input::SqlInput, output::ControlRow, output::OutputPane};
use super::widgets::spinner::Spinner;
use crate::page::{Focus, PageState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Everything needed to draw one frame.
pub struct View<'a> {
    pub page: &'a PageState,
    pub database: &'a str,
    pub is_connected: bool,
    pub spinner: &'a Spinner,
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Header
            Constraint::Percentage(30), // SQL input
            Constraint::Length(1),      // Run control + status
            Constraint::Min(3),         // Output
        ])
        .split(area);

    render_header(frame, layout[0], view);
    render_input(frame, layout[1], view);
    render_controls(frame, layout[2], view);
    render_output(frame, layout[3], view);
}

fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    frame.render_widget(Header::new(view.database, view.is_connected), area);
}

fn render_input(frame: &mut Frame, area: Rect, view: &View) {
    let focused = view.page.focus == Focus::Input;
    let widget = SqlInput::new(
        view.page.input.text(),
        view.page.input.cursor_position(),
        focused,
    );
    let cursor = widget.cursor_screen_position(area);
    frame.render_widget(widget, area);

    if focused {
        frame.set_cursor_position(cursor);
    }
}

fn render_controls(frame: &mut Frame, area: Rect, view: &View) {
    let widget = ControlRow::new(view.page.run_enabled, view.page.status, view.spinner);
    frame.render_widget(widget, area);
}

fn render_output(frame: &mut Frame, area: Rect, view: &View) {
    let focused = view.page.focus == Focus::Output;
    let widget = OutputPane::new(&view.page.output, view.page.output_scroll, focused);
    frame.render_widget(widget, area);
}
