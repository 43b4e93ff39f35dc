//! Run lifecycle phase.

use serde::Deserialize;

/// Lifecycle phase of a task run as reported by the backend.
///
/// The stream coordinator only consumes the derived boolean
/// [`RunPhase::is_terminal`]; the full enum exists so the status line can
/// name the phase and so unknown future phases deserialize without failing
/// the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    /// Accepted but not yet scheduled onto a node.
    Queued,
    /// Container is executing.
    Running,
    /// Finished with a zero exit status.
    Succeeded,
    /// Finished with a non-zero exit status or was killed.
    Failed,
    /// Cancelled by an operator before completion.
    Aborted,
    /// Phase string this client does not know. Treated as non-terminal so
    /// polling keeps running rather than silently dropping the tail.
    #[serde(other)]
    Unknown,
}

impl RunPhase {
    /// Whether the run can produce no further log output.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Aborted)
    }

    /// Short display label for the status line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
            Self::Unknown => "unknown",
        }
    }
}
