//! Error types for the runlog application.
//!
//! A hierarchical taxonomy using `thiserror`, composing via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`TransportError`] - fetch-level failures (network, HTTP status)
//!   - `std::io::Error` - terminal/TUI failures
//! - [`FetchError`] - result type of the `LogSource` boundary
//!   - [`TransportError`] - **fatal for the stream**: polling is cancelled
//!     and the error surfaces as a terminal stream state. No silent retry;
//!     resuming requires restarting the viewer.
//!   - [`ProtocolError`] - **non-fatal**: a well-formed response missing
//!     expected fields is logged and treated as "no new data"; polling
//!     continues.
//!
//! Reflow overload is deliberately not an error variant: oversized input
//! degrades to newline-only splitting with an indicator, and never affects
//! the availability of already-fetched log data.

use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to load or resolve configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Failed to initialize file logging.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The log stream failed at the transport level.
    #[error("Log stream error: {0}")]
    Transport(#[from] TransportError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Failure at the `LogSource` request/response boundary.
///
/// Split by fatality so callers match on the variant instead of inspecting
/// message strings.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request itself failed. Fail-stop.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response arrived but did not carry the expected shape.
    /// Treated as "no new data"; never stops the stream.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Network-level or HTTP-level fetch failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure from the HTTP client.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status code.
    #[error("Server returned HTTP {status} for {endpoint}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Request path that produced it, for the error banner.
        endpoint: String,
    },
}

/// Well-formed transport, malformed content.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Response body was not valid JSON.
    #[error("Response body is not valid JSON: {0}")]
    InvalidBody(String),

    /// Response JSON was missing a required field.
    #[error("Response missing required field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
}

impl FetchError {
    /// Whether this error must stop the stream (transport) or may be
    /// absorbed as an empty poll (protocol).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
