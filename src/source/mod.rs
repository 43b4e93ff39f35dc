//! Log source boundary (impure shell).
//!
//! [`LogSource`] is the request/response seam between the stream coordinator
//! and the dashboard backend. The coordinator never calls it directly: the
//! [`FetchWorker`](fetcher::FetchWorker) owns the source on a background
//! thread and the event loop shuttles [`LogsRequest`]/[`LogsReply`] values
//! between the two, so the interactive thread never blocks on the network.

pub mod fetcher;
pub mod http;

pub use fetcher::FetchWorker;
pub use http::HttpLogSource;

use crate::model::{Cursor, FetchError, RunId, RunPhase};
use chrono::{DateTime, Utc};

/// One log fragment as returned by the backend.
///
/// An absent `last_seen` signals true end-of-stream. A `last_seen` equal to
/// the request's cursor signals "no new data yet."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFragment {
    /// Raw log text appended since the request's cursor.
    pub log: String,
    /// Continuation token for the next request.
    pub last_seen: Option<Cursor>,
}

/// Boundary to the backend serving run logs and run lifecycle status.
///
/// Implementations run on the fetch worker thread and may block.
pub trait LogSource: Send {
    /// Fetch the log fragment written after `cursor` (`None` = from the start).
    fn fetch_logs(
        &mut self,
        run: &RunId,
        cursor: Option<&Cursor>,
    ) -> Result<LogFragment, FetchError>;

    /// Fetch the run's current lifecycle phase.
    fn fetch_phase(&mut self, run: &RunId) -> Result<RunPhase, FetchError>;
}

/// A log fetch the coordinator wants issued.
///
/// The epoch tags the stream identity that issued the request; replies whose
/// epoch no longer matches are dropped on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsRequest {
    /// Stream identity tag (bumped on every `start`).
    pub epoch: u64,
    /// Run whose logs are being fetched.
    pub run: RunId,
    /// Continuation cursor (`None` on the first fetch of a stream).
    pub cursor: Option<Cursor>,
}

/// Outcome of a [`LogsRequest`], stamped by the worker on completion.
#[derive(Debug)]
pub struct LogsReply {
    /// Epoch copied from the originating request.
    pub epoch: u64,
    /// Run copied from the originating request.
    pub run: RunId,
    /// Fetched fragment or the failure that replaced it.
    pub outcome: Result<LogFragment, FetchError>,
    /// When the worker finished the fetch.
    pub received_at: DateTime<Utc>,
}

/// Outcome of a lifecycle probe.
#[derive(Debug)]
pub struct PhaseReply {
    /// Epoch copied from the originating request.
    pub epoch: u64,
    /// Run copied from the originating request.
    pub run: RunId,
    /// Reported phase or the failure that replaced it.
    pub outcome: Result<RunPhase, FetchError>,
}

/// Requests accepted by the fetch worker.
#[derive(Debug)]
pub enum WorkerRequest {
    /// Fetch a log fragment.
    Logs(LogsRequest),
    /// Probe the run's lifecycle phase.
    Phase {
        /// Stream identity tag.
        epoch: u64,
        /// Run to probe.
        run: RunId,
    },
}

/// Replies produced by the fetch worker.
#[derive(Debug)]
pub enum WorkerReply {
    /// Answer to [`WorkerRequest::Logs`].
    Logs(LogsReply),
    /// Answer to [`WorkerRequest::Phase`].
    Phase(PhaseReply),
}
