//! SQL input widget for the TUI.
//!
//! A bordered multi-line text area that scrolls to keep the cursor line
//! visible.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Calculates the scroll offset needed to keep the cursor visible.
///
/// Returns the number of lines (or columns) to skip from the start.
pub fn calculate_scroll_offset(cursor: usize, available: usize) -> usize {
    if available == 0 {
        return cursor;
    }
    if cursor < available {
        0
    } else {
        cursor + 1 - available
    }
}

/// SQL input widget.
pub struct SqlInput<'a> {
    text: &'a str,
    cursor: (usize, usize),
    focused: bool,
}

impl<'a> SqlInput<'a> {
    /// Creates a new input widget; `cursor` is `(line, column)`.
    pub fn new(text: &'a str, cursor: (usize, usize), focused: bool) -> Self {
        Self {
            text,
            cursor,
            focused,
        }
    }

    /// Screen position of the cursor inside `area`, accounting for the border.
    pub fn cursor_screen_position(&self, area: Rect) -> (u16, u16) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let (line, column) = self.cursor;
        let row = line - calculate_scroll_offset(line, inner_height);
        let col = column - calculate_scroll_offset(column, inner_width);
        (area.x + 1 + col as u16, area.y + 1 + row as u16)
    }
}

impl Widget for SqlInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" SQL (Ctrl+Enter or F5 to run) ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let (line, column) = self.cursor;
        let vertical = calculate_scroll_offset(line, inner_height) as u16;
        let horizontal = calculate_scroll_offset(column, inner_width) as u16;

        let lines: Vec<Line> = self.text.split('\n').map(Line::raw).collect();
        Paragraph::new(lines)
            .block(block)
            .scroll((vertical, horizontal))
            .render(area, buf);
    }
}
