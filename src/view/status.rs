//! Status line: run identity, stream status, line count, follow flag.

use crate::model::RunId;
use crate::stream::StreamStatus;
use crate::view::AppState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// One-row status summary at the bottom of the screen.
pub struct StatusLine<'a> {
    state: &'a AppState,
    run: &'a RunId,
}

impl<'a> StatusLine<'a> {
    /// Create the widget over the current app state.
    pub fn new(state: &'a AppState, run: &'a RunId) -> Self {
        Self { state, run }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status = self.state.coordinator().status();
        let status_style = match status {
            StreamStatus::Errored => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            StreamStatus::Stopped => Style::default().fg(Color::DarkGray),
            _ => Style::default().fg(Color::Green),
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.run),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("[{}] ", self.state.phase().label())),
            Span::styled(format!("stream: {} ", status.label()), status_style),
            Span::raw(format!("{} lines ", self.state.lines().len())),
        ];
        if self.state.coordinator().is_loading() {
            spans.push(Span::styled("fetching ", Style::default().fg(Color::Cyan)));
        }
        if self.state.scroll().follow() {
            spans.push(Span::styled("follow ", Style::default().fg(Color::Green)));
        }
        if self.state.degraded() {
            spans.push(Span::styled(
                "wrap unavailable ",
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(error) = self.state.coordinator().error() {
            spans.push(Span::styled(
                format!("error: {} ", error),
                Style::default().fg(Color::Red),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
