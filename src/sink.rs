//! Downstream persistence for winning submissions.
//!
//! The sink is an injected collaborator: the game core never depends on
//! whether a submission lands. Failures come back as a [`SinkError`] for
//! the web layer to report; they never roll back a won round.

use async_trait::async_trait;
use chrono::Utc;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// One winning submission, as persisted downstream.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct WinnerRecord {
    /// Wall-clock submission time, `YYYY-MM-DD HH:MM:SS` UTC.
    timestamp: String,
    /// The winner's social handle (without the leading `@`).
    handle: String,
    /// The secret word that was guessed.
    secret_word: String,
    /// How many guesses the win took.
    guess_count: usize,
    /// Row marker, always `"Winner"`.
    status: String,
}

impl WinnerRecord {
    /// Builds a record stamped with the current wall-clock time.
    pub fn new(
        handle: impl Into<String>,
        secret_word: impl Into<String>,
        guess_count: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            handle: handle.into(),
            secret_word: secret_word.into(),
            guess_count,
            status: "Winner".to_string(),
        }
    }
}

/// Winner sink error.
#[derive(Debug, Clone, Display, Error)]
#[display("Winner sink error: {} at {}:{}", message, file, line)]
pub struct SinkError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SinkError {
    /// Creates a new sink error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Persists winning submissions.
#[async_trait]
pub trait WinnerSink: Send + Sync + std::fmt::Debug {
    /// Persists one winning submission.
    async fn submit(&self, record: &WinnerRecord) -> Result<(), SinkError>;
}

/// Sink that POSTs the record as JSON to a configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    /// Creates a sink posting to the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        info!(url = %url, "Creating webhook winner sink");
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WinnerSink for WebhookSink {
    #[instrument(skip(self, record), fields(handle = %record.handle()))]
    async fn submit(&self, record: &WinnerRecord) -> Result<(), SinkError> {
        debug!("Posting winner record");
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Winner sink request failed");
                SinkError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Winner sink rejected record");
            return Err(SinkError::new(format!(
                "Sink responded with {}: {}",
                status, body
            )));
        }

        info!(handle = %record.handle(), "Winner record submitted");
        Ok(())
    }
}

/// Sink used when no webhook is configured; every submission fails with a
/// "not configured" report, leaving the round outcome untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSink;

#[async_trait]
impl WinnerSink for DisabledSink {
    async fn submit(&self, _record: &WinnerRecord) -> Result<(), SinkError> {
        Err(SinkError::new("winner sink is not configured"))
    }
}
