//! Log pane: renders the virtualized window of wrapped lines.

use crate::view_state::content_height;
use crate::view::AppState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};

/// Virtualized log pane.
///
/// Only the rows inside the scroll model's visible range are materialized;
/// the scrollbar carries the full content height so its proportions match
/// the whole document, not the materialized slice.
pub struct LogPane<'a> {
    state: &'a AppState,
}

impl<'a> LogPane<'a> {
    /// Create the widget over the current app state.
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for LogPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.state.degraded() {
            "Logs (wrap unavailable)"
        } else {
            "Logs"
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.state.lines();
        let scroll = self.state.scroll();
        let range = scroll.visible_rows(lines.len());
        let current_match = self.state.search().current().copied();
        let query_chars = self.state.search().query().chars().count();

        let mut rendered: Vec<Line> = Vec::with_capacity(range.len());
        for index in range.start..range.end {
            let raw = lines[index].as_str();
            let is_match_line = current_match.is_some_and(|m| m.line_index == index);
            if let (true, Some(found)) = (is_match_line, current_match) {
                rendered.push(highlight_match(raw, found.char_offset, query_chars));
            } else {
                rendered.push(Line::from(raw));
            }
        }

        // The slice starts `overscan` rows above the scroll offset; skip the
        // difference so the top visible row lands on the first pane row.
        let skip = scroll.viewport().scroll_offset.saturating_sub(range.start);
        Paragraph::new(rendered)
            .scroll((skip as u16, 0))
            .render(inner, buf);

        let total = content_height(lines.len(), scroll.viewport().row_height);
        if total > inner.height as usize {
            let mut bar_state = ScrollbarState::new(total.saturating_sub(inner.height as usize))
                .position(scroll.viewport().scroll_offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight).render(area, buf, &mut bar_state);
        }
    }
}

/// Style the first query occurrence on the current match line.
fn highlight_match(line: &str, char_offset: usize, query_chars: usize) -> Line<'_> {
    let mut chars = line.char_indices();
    let start = chars
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(line.len());
    let end = if query_chars == 0 {
        start
    } else {
        line[start..]
            .char_indices()
            .nth(query_chars)
            .map(|(byte, _)| start + byte)
            .unwrap_or(line.len())
    };

    let highlight = Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::raw(&line[..start]),
        Span::styled(&line[start..end], highlight),
        Span::raw(&line[end..]),
    ])
}
