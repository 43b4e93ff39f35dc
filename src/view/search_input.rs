//! Search bar widget.

use crate::view::{AppState, SearchMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Search bar rendered below the log pane while a search is being typed or
/// is active.
pub struct SearchBar<'a> {
    state: &'a AppState,
}

impl<'a> SearchBar<'a> {
    /// Create the widget over the current app state.
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state.search_mode() {
            SearchMode::Typing { query } => {
                let cursor = Span::styled(
                    " ",
                    Style::default()
                        .bg(Color::White)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                );
                let line = Line::from(vec![Span::raw(query.clone()), cursor]);
                Paragraph::new(line)
                    .block(Block::default().borders(Borders::ALL).title("Search"))
                    .render(area, buf);
            }
            SearchMode::Active => {
                let search = self.state.search();
                let summary = if search.is_empty() {
                    "no matches".to_string()
                } else {
                    format!("{}/{}", search.cursor_index() + 1, search.len())
                };
                let line = Line::from(vec![
                    Span::raw(search.query().to_string()),
                    Span::styled(
                        format!("  [{}]  n/N to navigate", summary),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                Paragraph::new(line)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Search (active)"),
                    )
                    .render(area, buf);
            }
            SearchMode::Inactive => {}
        }
    }
}
