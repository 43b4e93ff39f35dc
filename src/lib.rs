//! Run Log Viewer (runlog)
//!
//! TUI application for streaming and inspecting the logs of containerized
//! task runs served by an operator-dashboard backend.
//!
//! The crate follows a Pure Core / Impure Shell architecture: `model`,
//! `stream`, `reflow::wrap` and `view_state` are pure and synchronous; all
//! I/O (HTTP fetches, the reflow worker thread, the terminal) lives in
//! `source`, `reflow::worker` and `view`.

pub mod config;
pub mod logging;
pub mod model;
pub mod reflow;
pub mod source;
pub mod stream;
pub mod view;
pub mod view_state;
