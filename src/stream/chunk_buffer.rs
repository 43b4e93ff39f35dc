//! Append-only buffer of fetched log chunks.

use crate::model::{Cursor, LogChunk};
use std::sync::Arc;

/// Ordered, append-only store of the chunks fetched for one run.
///
/// Single writer (the stream coordinator); readers take [`Arc<str>`]
/// snapshots of the concatenated text, so the reflow worker never shares
/// mutable state with the buffer.
///
/// # Invariants
/// - Chunks are kept in arrival order and never removed or edited.
/// - The buffer cursor is the cursor of the most recently appended chunk.
/// - A chunk whose cursor equals the buffer's current cursor is a no-op.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<LogChunk>,
    cursor: Option<Cursor>,
    /// Memoized concatenation; cleared by a successful append.
    concatenated: Option<Arc<str>>,
}

impl ChunkBuffer {
    /// Empty buffer with no cursor ("no fetch yet").
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk if it carries anything new.
    ///
    /// Returns whether the buffer changed. A chunk whose cursor equals the
    /// current cursor is a duplicate ("no new data yet") and is dropped.
    /// A cursor-less chunk is an end-of-stream response: its payload is kept
    /// when non-empty, but it never moves the cursor, so the cursor stays
    /// monotonic.
    pub fn append(&mut self, chunk: LogChunk) -> bool {
        let no_op = match (chunk.cursor(), self.cursor.as_ref()) {
            (Some(new), Some(current)) => new == current,
            (Some(_), None) => false,
            (None, _) => chunk.payload().is_empty(),
        };
        if no_op {
            return false;
        }
        if let Some(cursor) = chunk.cursor() {
            self.cursor = Some(cursor.clone());
        }
        self.chunks.push(chunk);
        self.concatenated = None;
        true
    }

    /// Current continuation cursor (`None` before the first append).
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenation of all payloads in order, memoized until the next
    /// successful append. The `Arc` makes snapshots cheap to hand to the
    /// reflow worker.
    pub fn concatenated(&mut self) -> Arc<str> {
        if let Some(text) = &self.concatenated {
            return Arc::clone(text);
        }
        let mut text = String::new();
        for chunk in &self.chunks {
            text.push_str(chunk.payload());
        }
        let text: Arc<str> = text.into();
        self.concatenated = Some(Arc::clone(&text));
        text
    }
}
