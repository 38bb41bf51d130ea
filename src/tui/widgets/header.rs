//! Header widget for the TUI.
//!
//! Displays the application name, version, and the database URL.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    database: &'a str,
    is_connected: bool,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(database: &'a str, is_connected: bool) -> Self {
        Self {
            database,
            is_connected,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" rangeview v{}", env!("CARGO_PKG_VERSION"));
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        let status_dot = if self.is_connected { "●" } else { "○" };
        let status_color = if self.is_connected {
            Color::Green
        } else {
            Color::Gray
        };
        let status_style = Style::default().bg(Color::Blue).fg(status_color);

        let db_text = format!(" [db: {}] ", self.database);
        let right_width = db_text.chars().count() as u16 + 2;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, " ", style);
            buf.set_string(right_x + 1, area.y, status_dot, status_style);
            buf.set_string(right_x + 2, area.y, &db_text, style);
        }
    }
}
