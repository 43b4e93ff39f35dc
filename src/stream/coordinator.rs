//! Polling state machine for one run's log stream.
//!
//! ```text
//! Idle -> Polling -> {Polling, Exhausting} -> Stopped
//!                 \-> Errored
//! ```
//!
//! Pure core: every operation either mutates local state or returns the
//! [`LogsRequest`] the shell should hand to the fetch worker. The poll timer
//! is a deadline owned by the coordinator (`next_poll`); clearing it is the
//! cancellation of the recurring schedule, and it is cleared on every exit
//! path (stop, transport error, terminal settle).

use crate::model::{FetchError, LogChunk, RunId, TransportError};
use crate::source::{LogsReply, LogsRequest};
use crate::stream::ChunkBuffer;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Stream lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// No stream started yet.
    Idle,
    /// Interval polling is active.
    Polling,
    /// Run is terminal and the coordinator is draining remaining data with
    /// back-to-back fetches.
    Exhausting,
    /// Terminal: the stream is fully drained or was stopped. No further
    /// fetches occur.
    Stopped,
    /// Terminal: a transport failure stopped the stream. Requires an
    /// external restart to resume.
    Errored,
}

impl StreamStatus {
    /// Short display label for the status line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Exhausting => "exhausting",
            Self::Stopped => "stopped",
            Self::Errored => "error",
        }
    }

    /// Whether no further fetches can be issued from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Errored)
    }
}

/// Polling state machine driving one run's log fetches.
///
/// Owns the cursor (via its [`ChunkBuffer`]) and the poll deadline. One
/// instance is scoped to one run-view; switching the displayed run goes
/// through [`StreamCoordinator::start`], which bumps the epoch so replies
/// still in flight for the previous run are dropped on arrival.
#[derive(Debug)]
pub struct StreamCoordinator {
    run: Option<RunId>,
    /// Stream identity tag; replies carrying an older epoch are ignored.
    epoch: u64,
    buffer: ChunkBuffer,
    status: StreamStatus,
    in_flight: bool,
    error: Option<TransportError>,
    poll_interval: Duration,
    /// Deadline of the next scheduled poll; `None` = no schedule.
    next_poll: Option<Instant>,
}

impl StreamCoordinator {
    /// New coordinator in `Idle` with the given fixed polling cadence.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            run: None,
            epoch: 0,
            buffer: ChunkBuffer::new(),
            status: StreamStatus::Idle,
            in_flight: false,
            error: None,
            poll_interval,
            next_poll: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> StreamStatus {
        self.status
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Transport error that stopped the stream, if any.
    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    /// The run this stream is scoped to.
    pub fn run(&self) -> Option<&RunId> {
        self.run.as_ref()
    }

    /// Current stream identity tag.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Read access to the chunk buffer.
    pub fn buffer(&self) -> &ChunkBuffer {
        &self.buffer
    }

    /// Mutable access, used by the shell to take concatenation snapshots.
    pub fn buffer_mut(&mut self) -> &mut ChunkBuffer {
        &mut self.buffer
    }

    /// Begin streaming `run`, discarding all previous state.
    ///
    /// Returns the immediate first fetch (cursor `None`). The recurring poll
    /// is scheduled only when the run is not already terminal; an already
    /// finished run is drained purely by the exhaustion sequence that the
    /// first reply triggers.
    pub fn start(&mut self, run: RunId, terminal: bool, now: Instant) -> LogsRequest {
        self.epoch += 1;
        self.buffer = ChunkBuffer::new();
        self.error = None;
        self.status = StreamStatus::Polling;
        self.in_flight = true;
        self.next_poll = if terminal {
            None
        } else {
            Some(now + self.poll_interval)
        };
        self.run = Some(run.clone());
        info!(%run, terminal, epoch = self.epoch, "starting log stream");
        LogsRequest {
            epoch: self.epoch,
            run,
            cursor: None,
        }
    }

    /// Advance the poll timer.
    ///
    /// Fires at most once per elapsed deadline and re-arms the deadline
    /// relative to `now`. A tick that lands while a fetch is in flight is
    /// skipped, not queued.
    pub fn on_tick(&mut self, now: Instant) -> Option<LogsRequest> {
        let deadline = self.next_poll?;
        if now < deadline {
            return None;
        }
        self.next_poll = Some(now + self.poll_interval);
        if self.in_flight {
            debug!("poll tick skipped: fetch already in flight");
            return None;
        }
        if self.status != StreamStatus::Polling {
            return None;
        }
        let request = self.next_request()?;
        self.in_flight = true;
        Some(request)
    }

    /// Consume a fetch reply from the worker.
    ///
    /// `terminal` is the run lifecycle's current "no more output possible"
    /// bit. Returns the immediate exhaustion refetch to issue, if any.
    pub fn on_reply(&mut self, reply: LogsReply, terminal: bool) -> Option<LogsRequest> {
        if reply.epoch != self.epoch {
            debug!(
                reply_epoch = reply.epoch,
                epoch = self.epoch,
                run = %reply.run,
                "dropping reply from a previous stream identity"
            );
            return None;
        }
        if self.status.is_terminal() || self.status == StreamStatus::Idle {
            return None;
        }
        self.in_flight = false;

        let fragment = match reply.outcome {
            Ok(fragment) => fragment,
            Err(FetchError::Transport(err)) => {
                warn!(%err, "log fetch failed, stopping stream");
                self.next_poll = None;
                self.status = StreamStatus::Errored;
                self.error = Some(err);
                return None;
            }
            Err(FetchError::Protocol(err)) => {
                // Malformed response = "no new data". During exhaustion that
                // is exactly the termination condition.
                warn!(%err, "malformed log response, treating as empty poll");
                if terminal {
                    self.settle();
                }
                return None;
            }
        };

        // The exhaustion check compares against the cursor as it was before
        // this reply. On the very first reply there is no previous cursor,
        // so a terminal run's first reply always triggers one extra fetch.
        let previous_cursor = self.buffer.cursor().cloned();
        let advanced = fragment.last_seen.as_ref() != previous_cursor.as_ref();

        let chunk = LogChunk::new(fragment.log, fragment.last_seen.clone(), reply.received_at);
        if self.buffer.append(chunk) {
            debug!(
                chunks = self.buffer.len(),
                cursor = ?self.buffer.cursor(),
                "appended log chunk"
            );
        }

        if !terminal {
            return None;
        }
        match fragment.last_seen {
            // True end-of-stream: nothing further exists server-side.
            None => {
                self.settle();
                None
            }
            Some(cursor) if advanced => {
                let request = self.next_request()?;
                self.status = StreamStatus::Exhausting;
                self.in_flight = true;
                debug!(%cursor, "cursor advanced on terminal run, refetching immediately");
                Some(request)
            }
            // Cursor repeated: the stream is drained.
            Some(_) => {
                self.settle();
                None
            }
        }
    }

    /// Cancel the schedule and stop the stream.
    pub fn stop(&mut self) {
        self.next_poll = None;
        self.in_flight = false;
        if !self.status.is_terminal() {
            self.status = StreamStatus::Stopped;
        }
    }

    fn settle(&mut self) {
        self.next_poll = None;
        self.status = StreamStatus::Stopped;
        info!(chunks = self.buffer.len(), "log stream exhausted");
    }

    fn next_request(&self) -> Option<LogsRequest> {
        let run = self.run.clone()?;
        Some(LogsRequest {
            epoch: self.epoch,
            run,
            cursor: self.buffer.cursor().cloned(),
        })
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
