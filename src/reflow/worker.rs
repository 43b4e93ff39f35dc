//! Off-thread reflow worker.
//!
//! Wrapping a multi-megabyte log would stall the interactive thread, so the
//! computation runs on a dedicated worker connected by message passing only:
//! `Arc<str>` snapshots in, wrapped line sets out, no shared mutable state.
//!
//! Every request carries a monotonically increasing generation token. The
//! worker coalesces queued requests (only the newest matters) and the
//! receiving side discards any reply older than the highest generation it
//! has seen, so the UI never regresses to stale output even if deliveries
//! are reordered. Generations are never reset; a run-identity switch simply
//! submits a new snapshot under a higher generation.

use crate::reflow::wrap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Inputs over which one wrap pass is computed.
#[derive(Debug)]
struct ReflowRequest {
    generation: u64,
    text: Arc<str>,
    max_width: usize,
}

/// One completed wrap pass.
#[derive(Debug)]
pub struct ReflowReply {
    /// Generation token copied from the originating request.
    pub generation: u64,
    /// Wrapped lines, or the newline-only split when degraded.
    pub lines: Vec<String>,
    /// True when the input exceeded [`ReflowWorker::DEGRADE_BYTE_LIMIT`] and
    /// was split on newlines only.
    pub degraded: bool,
}

/// Handle to the reflow worker thread.
pub struct ReflowWorker {
    requests: Sender<ReflowRequest>,
    replies: Receiver<ReflowReply>,
    next_generation: u64,
    highest_seen: u64,
}

impl ReflowWorker {
    /// Inputs above this size degrade to a newline-only split instead of a
    /// full wrap, keeping the worker responsive on pathological logs.
    pub const DEGRADE_BYTE_LIMIT: usize = 8 * 1024 * 1024;

    /// Spawn the worker thread.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ReflowRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<ReflowReply>();

        thread::spawn(move || {
            while let Ok(mut request) = request_rx.recv() {
                // Coalesce: wrap only the newest queued snapshot.
                while let Ok(newer) = request_rx.try_recv() {
                    request = newer;
                }
                let reply = compute(request);
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            debug!("reflow worker exiting");
        });

        Self {
            requests: request_tx,
            replies: reply_rx,
            next_generation: 0,
            highest_seen: 0,
        }
    }

    /// Submit a snapshot for wrapping; returns its generation token.
    pub fn submit(&mut self, text: Arc<str>, max_width: usize) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        let request = ReflowRequest {
            generation,
            text,
            max_width,
        };
        if self.requests.send(request).is_err() {
            warn!("reflow worker unavailable, request dropped");
        }
        generation
    }

    /// Non-blocking: the freshest completed reply, if any.
    ///
    /// Drains everything pending and returns only the newest generation;
    /// anything older than the highest generation already seen is discarded.
    pub fn try_recv(&mut self) -> Option<ReflowReply> {
        let mut newest: Option<ReflowReply> = None;
        loop {
            match self.replies.try_recv() {
                Ok(reply) => {
                    if reply.generation < self.highest_seen {
                        debug!(
                            generation = reply.generation,
                            highest = self.highest_seen,
                            "discarding stale reflow reply"
                        );
                        continue;
                    }
                    match &newest {
                        Some(best) if best.generation >= reply.generation => {}
                        _ => newest = Some(reply),
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(reply) = &newest {
            self.highest_seen = reply.generation;
        }
        newest
    }
}

fn compute(request: ReflowRequest) -> ReflowReply {
    let degraded = request.text.len() > ReflowWorker::DEGRADE_BYTE_LIMIT;
    let lines = if degraded {
        warn!(
            bytes = request.text.len(),
            "input too large to wrap, degrading to newline split"
        );
        request.text.lines().map(str::to_string).collect()
    } else {
        wrap(&request.text, request.max_width)
    };
    ReflowReply {
        generation: request.generation,
        lines,
        degraded,
    }
}
