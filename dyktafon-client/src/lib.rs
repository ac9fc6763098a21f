//! Dyktafon HTTP Client
//!
//! A typed HTTP client for a dyktafon voice-note service, plus the polling
//! loop that waits for asynchronous transcription work to finish.
//!
//! The service processes uploads in the background, so every interesting
//! flow has the same shape: submit, then fetch status until `completed` or
//! `failed` comes back. [`JobPoller`] owns that loop; [`VoiceNotesClient`]
//! supplies the status fetches (and the rest of the API surface).
//!
//! # Example
//!
//! ```no_run
//! use dyktafon_client::{JobPoller, PollOutcome, VoiceNotesClient};
//! use dyktafon_core::dto::note::UploadOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VoiceNotesClient::new("http://localhost:3101");
//!
//!     let audio = std::fs::read("meeting.m4a")?;
//!     let note = client
//!         .upload_note("meeting.m4a", audio, UploadOptions::default())
//!         .await?;
//!     client.process_note(&note.id, None).await?;
//!
//!     let poller = JobPoller::new(client);
//!     match poller.run(&note.id).await? {
//!         PollOutcome::Success { note, .. } => println!("{:?}", note.summary),
//!         PollOutcome::Failure { reason, .. } => eprintln!("failed: {reason}"),
//!         PollOutcome::Timeout { attempts } => eprintln!("no result after {attempts} attempts"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod notes;
pub mod poll;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poll::{InvalidPoll, JobPoller, PollOptions, PollOutcome, StatusSource, TransportError};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Header carrying the anonymous session identifier
const SESSION_HEADER: &str = "x-session-id";

/// HTTP client for the voice-note service API
///
/// Covers the full note lifecycle: multipart upload, triggering processing,
/// status fetches, listing, export, and deletion, plus the service health
/// endpoints. Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct VoiceNotesClient {
    /// Base URL of the service (e.g., "http://localhost:3101")
    base_url: String,
    /// Session identifier sent as `x-session-id` with every request
    session_id: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl VoiceNotesClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: None,
            client: Client::new(),
        }
    }

    /// Create a client with a custom `reqwest::Client`
    ///
    /// Use this to configure timeouts, proxies, or TLS settings.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: None,
            client,
        }
    }

    /// Attach a session identifier
    ///
    /// The service scopes anonymous uploads to this value; listing and
    /// deletion only see notes owned by the same session.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured session identifier, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Attach the session header when one is configured
    fn with_session_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_id {
            Some(session) => request.header(SESSION_HEADER, session),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize a JSON response body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("{e} in body: {body}")))
    }

    /// Check the status code and return the raw response body
    async fn handle_text_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), body));
        }

        Ok(body)
    }

    /// Check the status code of a response with no interesting body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = VoiceNotesClient::new("http://localhost:3101/");
        assert_eq!(client.base_url(), "http://localhost:3101");
    }

    #[test]
    fn client_has_no_session_by_default() {
        let client = VoiceNotesClient::new("http://localhost:3101");
        assert!(client.session_id().is_none());
    }

    #[test]
    fn with_session_stores_identifier() {
        let client = VoiceNotesClient::new("http://localhost:3101").with_session("s-123");
        assert_eq!(client.session_id(), Some("s-123"));
    }

    #[test]
    fn with_client_accepts_configured_reqwest() {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();
        let client = VoiceNotesClient::with_client("http://localhost:3101", http);
        assert_eq!(client.base_url(), "http://localhost:3101");
    }
}
