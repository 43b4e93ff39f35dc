//! Core identifier newtypes with smart constructors.
//!
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;

/// Identifier of one task run (one execution instance of a task).
///
/// Every log stream is scoped to exactly one run; a change of run identity
/// invalidates all in-flight work tagged with the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Smart constructor: validates non-empty run ID.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRunId> {
        let s = raw.into();
        if s.trim().is_empty() {
            Err(InvalidRunId::Empty)
        } else {
            Ok(Self(s))
        }
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token marking a read position in a log stream.
///
/// Echoed back to the server to fetch only newer data. The token contents
/// are never interpreted locally; only equality matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a server-issued token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

/// Rejected `RunId` construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidRunId {
    /// Run IDs must contain at least one non-whitespace character.
    #[error("Run ID cannot be empty")]
    Empty,
}

// ===== Tests =====
