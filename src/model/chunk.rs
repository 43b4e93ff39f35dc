//! Log chunk value type.

use crate::model::Cursor;
use chrono::{DateTime, Utc};

/// One fetched fragment of a run's log stream.
///
/// Immutable once created: fields are private and only exposed through
/// accessors. The cursor is the continuation token the server returned
/// alongside this payload (`None` on a true end-of-stream response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogChunk {
    payload: String,
    cursor: Option<Cursor>,
    received_at: DateTime<Utc>,
}

impl LogChunk {
    /// Create a chunk from a fetched fragment.
    pub fn new(payload: String, cursor: Option<Cursor>, received_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            cursor,
            received_at,
        }
    }

    /// Raw log text carried by this chunk.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Continuation cursor the server returned with this chunk.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Local receive time.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}
