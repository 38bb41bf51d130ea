//! Output pane and control row widgets.

use super::spinner::Spinner;
use crate::status::Status;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Scrollable output area.
pub struct OutputPane<'a> {
    text: &'a str,
    scroll: u16,
    focused: bool,
}

impl<'a> OutputPane<'a> {
    pub fn new(text: &'a str, scroll: u16, focused: bool) -> Self {
        Self {
            text,
            scroll,
            focused,
        }
    }
}

impl Widget for OutputPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if self.text.starts_with("Error:") {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Output ");

        let lines: Vec<Line> = self
            .text
            .lines()
            .map(|line| Line::styled(line, text_style))
            .collect();

        Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

/// Run control followed by the status message.
pub struct ControlRow<'a> {
    run_enabled: bool,
    status: Status,
    spinner: &'a Spinner,
}

impl<'a> ControlRow<'a> {
    pub fn new(run_enabled: bool, status: Status, spinner: &'a Spinner) -> Self {
        Self {
            run_enabled,
            status,
            spinner,
        }
    }
}

impl Widget for ControlRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let button_style = if self.run_enabled {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Black)
        };
        let status_style = if self.status.is_error() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = vec![
            Span::styled(" Run ", button_style),
            Span::raw("  "),
        ];
        if matches!(self.status, Status::Connecting | Status::Running) {
            spans.push(Span::styled(
                format!("{} ", self.spinner.frame()),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(self.status.to_string(), status_style));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
