//! Search over wrapped log lines.
//!
//! A read-only consumer of the wrapped line set: builds at most one match
//! per line and keeps a navigable cursor over them. Rebuilt whenever the
//! query or the line set changes; no state survives a rebuild.

/// Location of a query hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Index of the wrapped line containing the hit.
    pub line_index: usize,
    /// Character offset (not bytes) of the first occurrence in that line.
    pub char_offset: usize,
}

/// Match set and cursor for one query over one wrapped line set.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    query: String,
    matches: Vec<SearchMatch>,
    cursor_index: usize,
}

impl SearchIndex {
    /// Empty index (no query, no matches).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the match set for `query` over `lines`.
    ///
    /// Linear scan, first occurrence per line, plain substring comparison.
    /// An empty query yields no matches. The cursor starts at 0.
    pub fn build(query: &str, lines: &[String]) -> Self {
        let mut matches = Vec::new();
        if !query.is_empty() {
            for (line_index, line) in lines.iter().enumerate() {
                if let Some(byte_offset) = line.find(query) {
                    let char_offset = line[..byte_offset].chars().count();
                    matches.push(SearchMatch {
                        line_index,
                        char_offset,
                    });
                }
            }
        }
        Self {
            query: query.to_string(),
            matches,
            cursor_index: 0,
        }
    }

    /// The query this index was built for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All matches in line order.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether there are no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Position of the cursor within the match set.
    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    /// Match under the cursor.
    pub fn current(&self) -> Option<&SearchMatch> {
        self.matches.get(self.cursor_index)
    }

    /// Advance the cursor with wraparound; no-op when empty.
    /// Returns the newly selected match so the caller can center it.
    pub fn next(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor_index = (self.cursor_index + 1) % self.matches.len();
        self.current()
    }

    /// Step the cursor back with wraparound; no-op when empty.
    /// Returns the newly selected match so the caller can center it.
    pub fn previous(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor_index = (self.cursor_index + self.matches.len() - 1) % self.matches.len();
        self.current()
    }

    /// Clear the query, matches and cursor.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor_index = 0;
    }
}
