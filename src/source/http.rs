//! HTTP implementation of the [`LogSource`] boundary.
//!
//! Speaks the dashboard backend's JSON API with a blocking reqwest client.
//! Blocking is deliberate: the client lives on the fetch worker thread, and
//! the event loop only ever talks to that thread through channels.

use crate::model::{Cursor, FetchError, ProtocolError, RunId, RunPhase, TransportError};
use crate::source::{LogFragment, LogSource};
use serde::Deserialize;
use std::time::Duration;

/// Wire shape of `GET /api/v1/runs/{id}/logs`.
///
/// Both fields are optional on the wire so a missing `log` surfaces as a
/// [`ProtocolError`] instead of failing JSON deserialization outright.
#[derive(Debug, Deserialize)]
struct LogsResponse {
    log: Option<String>,
    #[serde(rename = "lastSeen")]
    last_seen: Option<String>,
}

/// Wire shape of `GET /api/v1/runs/{id}`.
#[derive(Debug, Deserialize)]
struct RunResponse {
    phase: Option<RunPhase>,
}

/// Blocking HTTP log source talking to the dashboard backend.
pub struct HttpLogSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpLogSource {
    /// Default per-request timeout. A hung request is surfaced by the
    /// transport as an error; there is no additional timeout layer.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a source for the backend at `base_url` (scheme + authority,
    /// no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: String,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                endpoint,
            }
            .into());
        }

        let body = response
            .text()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let parsed =
            serde_json::from_str(&body).map_err(|e| ProtocolError::InvalidBody(e.to_string()))?;
        Ok(parsed)
    }
}

impl LogSource for HttpLogSource {
    fn fetch_logs(
        &mut self,
        run: &RunId,
        cursor: Option<&Cursor>,
    ) -> Result<LogFragment, FetchError> {
        let endpoint = format!("/api/v1/runs/{}/logs", run);
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("after", cursor.as_str()));
        }
        let response: LogsResponse = self.get_json(endpoint, &query)?;

        let log = response
            .log
            .ok_or(ProtocolError::MissingField { field: "log" })?;
        Ok(LogFragment {
            log,
            last_seen: response.last_seen.map(Cursor::new),
        })
    }

    fn fetch_phase(&mut self, run: &RunId) -> Result<RunPhase, FetchError> {
        let endpoint = format!("/api/v1/runs/{}", run);
        let response: RunResponse = self.get_json(endpoint, &[])?;
        response
            .phase
            .ok_or_else(|| ProtocolError::MissingField { field: "phase" }.into())
    }
}
