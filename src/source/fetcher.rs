//! Background fetch worker.
//!
//! Owns the [`LogSource`] on a dedicated thread so blocking HTTP never
//! touches the interactive thread. Communication is message passing only:
//! requests in over one mpsc channel, replies out over another. The worker
//! performs requests strictly in order, which is what makes exhaustion
//! fetches sequential; concurrency limits (one log fetch in flight) are
//! enforced upstream by the coordinator.

use crate::source::{LogSource, LogsReply, PhaseReply, WorkerReply, WorkerRequest};
use chrono::Utc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::debug;

/// Handle to the fetch worker thread.
///
/// Dropping the handle closes the request channel; the thread drains any
/// request already in progress and exits on its own. It is never joined so
/// shutdown cannot stall behind a slow request.
pub struct FetchWorker {
    requests: Sender<WorkerRequest>,
    replies: Receiver<WorkerReply>,
}

impl FetchWorker {
    /// Spawn the worker thread around a log source.
    pub fn spawn(mut source: Box<dyn LogSource>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<WorkerReply>();

        thread::spawn(move || {
            for request in request_rx {
                let reply = match request {
                    WorkerRequest::Logs(req) => {
                        let outcome = source.fetch_logs(&req.run, req.cursor.as_ref());
                        WorkerReply::Logs(LogsReply {
                            epoch: req.epoch,
                            run: req.run,
                            outcome,
                            received_at: Utc::now(),
                        })
                    }
                    WorkerRequest::Phase { epoch, run } => {
                        let outcome = source.fetch_phase(&run);
                        WorkerReply::Phase(PhaseReply {
                            epoch,
                            run,
                            outcome,
                        })
                    }
                };
                if reply_tx.send(reply).is_err() {
                    // Receiver side is gone; nothing left to serve.
                    break;
                }
            }
            debug!("fetch worker exiting");
        });

        Self {
            requests: request_tx,
            replies: reply_rx,
        }
    }

    /// Enqueue a request. A worker that already exited swallows the request;
    /// the stream then simply sees no reply, which only happens at shutdown.
    pub fn submit(&self, request: WorkerRequest) {
        if self.requests.send(request).is_err() {
            debug!("fetch worker unavailable, request dropped");
        }
    }

    /// Non-blocking: next completed reply, if any.
    pub fn try_recv(&self) -> Option<WorkerReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
