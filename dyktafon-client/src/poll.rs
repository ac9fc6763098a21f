//! Polling loop for asynchronous note processing
//!
//! Transcription runs server-side and the API only exposes status
//! snapshots, so every flow ends with the same loop: fetch status on an
//! interval until `completed` or `failed` comes back, under a bounded
//! attempt budget. [`JobPoller`] is that loop, written once.
//!
//! The poller is decoupled from the wire protocol: it talks to a
//! [`StatusSource`] and never inspects HTTP details. `VoiceNotesClient`
//! implements the trait; tests drive the poller with scripted sequences.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time;
use tracing::{debug, warn};

use dyktafon_core::domain::note::{NoteStatus, VoiceNote};

/// Consecutive fetch failures tolerated before the service is declared
/// unreachable
const UNREACHABLE_THRESHOLD: u32 = 3;

/// Reason attached to a failure outcome when the service stopped answering
const UNREACHABLE_REASON: &str = "unreachable";

/// Fallback reason when the service reports failure without a message
const UNKNOWN_ERROR_REASON: &str = "unknown error";

/// The status fetch itself could not complete
///
/// Distinct from a note whose processing failed: that is a successful fetch
/// of a terminal snapshot. Transport errors are retried; repeated ones abort
/// the poll.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<crate::ClientError> for TransportError {
    fn from(err: crate::ClientError) -> Self {
        TransportError(err.to_string())
    }
}

/// Source of note status snapshots
#[async_trait]
pub trait StatusSource {
    async fn fetch_status(&self, note_id: &str) -> Result<VoiceNote, TransportError>;
}

#[async_trait]
impl<S> StatusSource for &S
where
    S: StatusSource + Sync,
{
    async fn fetch_status(&self, note_id: &str) -> Result<VoiceNote, TransportError> {
        (**self).fetch_status(note_id).await
    }
}

/// Polling parameters
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between attempts
    pub interval: Duration,
    /// Attempt budget; failed fetches consume attempts too
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Outcome of a full poll cycle
///
/// Expected terminal conditions are values, not errors, so callers can
/// distinguish "the service said no" from "the service never answered".
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The note reached `completed`
    Success { note: VoiceNote, attempts: u32 },
    /// The note reached `failed`, or the service became unreachable
    Failure { reason: String, attempts: u32 },
    /// The attempt budget ran out before any terminal status
    Timeout { attempts: u32 },
}

impl PollOutcome {
    /// Attempts consumed before the poll settled
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Success { attempts, .. }
            | PollOutcome::Failure { attempts, .. }
            | PollOutcome::Timeout { attempts } => *attempts,
        }
    }
}

/// Poll input rejected before any fetch is attempted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPoll {
    #[error("note id must not be empty")]
    EmptyNoteId,
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("interval must be non-zero")]
    ZeroInterval,
}

/// Drives a submitted note to a terminal status
///
/// Each call to [`run`] owns only its local attempt counters, so a single
/// poller (or clones of its source) can be used from any number of
/// concurrent tasks.
///
/// [`run`]: JobPoller::run
pub struct JobPoller<S> {
    source: S,
    options: PollOptions,
}

impl<S: StatusSource> JobPoller<S> {
    /// Create a poller with the default interval (2s) and budget (30)
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: PollOptions::default(),
        }
    }

    /// Create a poller with explicit options
    pub fn with_options(source: S, options: PollOptions) -> Self {
        Self { source, options }
    }

    /// Poll until a terminal status, an unreachable abort, or budget
    /// exhaustion
    ///
    /// One attempt is one status fetch plus interpretation of its result:
    /// - `completed` returns [`PollOutcome::Success`] immediately
    /// - `failed` returns [`PollOutcome::Failure`] with the service's
    ///   message, or "unknown error" when it sent none
    /// - any other status sleeps the interval and retries
    /// - a transport error is logged and retried, but three consecutive
    ///   ones abort with `Failure("unreachable")`
    ///
    /// `Err` is reserved for inputs rejected up front; terminal conditions
    /// always come back as an `Ok` outcome.
    pub async fn run(&self, note_id: &str) -> Result<PollOutcome, InvalidPoll> {
        if note_id.is_empty() {
            return Err(InvalidPoll::EmptyNoteId);
        }
        if self.options.max_attempts == 0 {
            return Err(InvalidPoll::ZeroAttempts);
        }
        if self.options.interval.is_zero() {
            return Err(InvalidPoll::ZeroInterval);
        }

        let mut consecutive_failures = 0u32;

        for attempt in 1..=self.options.max_attempts {
            match self.source.fetch_status(note_id).await {
                Ok(note) => {
                    consecutive_failures = 0;
                    debug!(note_id, attempt, status = %note.status, "fetched note status");

                    match note.status {
                        NoteStatus::Completed => {
                            return Ok(PollOutcome::Success {
                                note,
                                attempts: attempt,
                            });
                        }
                        NoteStatus::Failed => {
                            let reason = note
                                .error_message
                                .unwrap_or_else(|| UNKNOWN_ERROR_REASON.to_string());
                            return Ok(PollOutcome::Failure {
                                reason,
                                attempts: attempt,
                            });
                        }
                        _ => {}
                    }
                }
                Err(err) => {
                    consecutive_failures += 1;
                    warn!(
                        note_id,
                        attempt, consecutive_failures, "status fetch failed: {}", err
                    );

                    if consecutive_failures >= UNREACHABLE_THRESHOLD {
                        return Ok(PollOutcome::Failure {
                            reason: UNREACHABLE_REASON.to_string(),
                            attempts: attempt,
                        });
                    }
                }
            }

            if attempt < self.options.max_attempts {
                time::sleep(self.options.interval).await;
            }
        }

        Ok(PollOutcome::Timeout {
            attempts: self.options.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Status source that replays a scripted sequence of fetch results
    struct Scripted {
        steps: Mutex<VecDeque<Result<VoiceNote, TransportError>>>,
        fetches: AtomicU32,
    }

    impl Scripted {
        fn new(steps: Vec<Result<VoiceNote, TransportError>>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                fetches: AtomicU32::new(0),
            }
        }

        fn fetches(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for Scripted {
        async fn fetch_status(&self, _note_id: &str) -> Result<VoiceNote, TransportError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("poller fetched beyond the scripted sequence")
        }
    }

    fn snapshot(status: NoteStatus) -> VoiceNote {
        VoiceNote {
            id: "note-1".to_string(),
            status,
            title: None,
            language: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
            duration_seconds: None,
            transcription: None,
            summary: None,
            error_message: None,
        }
    }

    fn failed_with(message: Option<&str>) -> VoiceNote {
        VoiceNote {
            error_message: message.map(str::to_string),
            ..snapshot(NoteStatus::Failed)
        }
    }

    fn transport() -> Result<VoiceNote, TransportError> {
        Err(TransportError("connection refused".to_string()))
    }

    fn options(max_attempts: u32) -> PollOptions {
        PollOptions {
            interval: Duration::from_secs(2),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_the_attempt_that_observes_completed() {
        let source = Scripted::new(vec![
            Ok(snapshot(NoteStatus::Pending)),
            Ok(snapshot(NoteStatus::Pending)),
            Ok(snapshot(NoteStatus::Completed)),
        ]);

        let outcome = JobPoller::new(&source).run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Success { note, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(note.status, NoteStatus::Completed);
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_carries_the_remote_message_verbatim() {
        let source = Scripted::new(vec![
            Ok(snapshot(NoteStatus::Pending)),
            Ok(failed_with(Some("decode error"))),
        ]);

        let outcome = JobPoller::new(&source).run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Failure { reason, attempts } => {
                assert_eq!(reason, "decode error");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_without_message_reports_unknown_error() {
        let source = Scripted::new(vec![Ok(failed_with(None))]);

        let outcome = JobPoller::new(&source).run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Failure { reason, attempts } => {
                assert_eq!(reason, "unknown error");
                assert_eq!(attempts, 1);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_exactly_the_attempt_budget() {
        let source = Scripted::new(
            (0..5).map(|_| Ok(snapshot(NoteStatus::Processing))).collect(),
        );

        let poller = JobPoller::with_options(&source, options(5));
        let outcome = poller.run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Timeout { attempts } => assert_eq!(attempts, 5),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(source.fetches(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_status_is_not_terminal() {
        let source = Scripted::new(vec![
            Ok(snapshot(NoteStatus::Unknown)),
            Ok(snapshot(NoteStatus::Completed)),
        ]);

        let outcome = JobPoller::new(&source).run("note-1").await.unwrap();
        assert_eq!(outcome.attempts(), 2);
        assert!(matches!(outcome, PollOutcome::Success { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn three_consecutive_transport_errors_abort_early() {
        let source = Scripted::new(vec![transport(), transport(), transport()]);

        // budget far from exhausted; the abort must come from the
        // consecutive-failure threshold
        let poller = JobPoller::with_options(&source, options(30));
        let outcome = poller.run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Failure { reason, attempts } => {
                assert_eq!(reason, "unreachable");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_fetch_resets_the_consecutive_failure_count() {
        let source = Scripted::new(vec![
            transport(),
            transport(),
            Ok(snapshot(NoteStatus::Processing)),
            transport(),
            transport(),
            Ok(snapshot(NoteStatus::Completed)),
        ]);

        let outcome = JobPoller::new(&source).run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Success { attempts, .. } => assert_eq!(attempts, 6),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_consume_the_attempt_budget() {
        let source = Scripted::new(vec![
            transport(),
            Ok(snapshot(NoteStatus::Processing)),
            transport(),
        ]);

        let poller = JobPoller::with_options(&source, options(3));
        let outcome = poller.run("note-1").await.unwrap();

        match outcome {
            PollOutcome::Timeout { attempts } => assert_eq!(attempts, 3),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_note_id_is_rejected_before_any_fetch() {
        let source = Scripted::new(vec![Ok(snapshot(NoteStatus::Completed))]);

        let result = JobPoller::new(&source).run("").await;

        assert_eq!(result.unwrap_err(), InvalidPoll::EmptyNoteId);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn zero_attempt_budget_is_rejected_before_any_fetch() {
        let source = Scripted::new(vec![Ok(snapshot(NoteStatus::Completed))]);

        let poller = JobPoller::with_options(&source, options(0));
        let result = poller.run("note-1").await;

        assert_eq!(result.unwrap_err(), InvalidPoll::ZeroAttempts);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn zero_interval_is_rejected_before_any_fetch() {
        let source = Scripted::new(vec![Ok(snapshot(NoteStatus::Completed))]);

        let poller = JobPoller::with_options(
            &source,
            PollOptions {
                interval: Duration::ZERO,
                max_attempts: 30,
            },
        );
        let result = poller.run("note-1").await;

        assert_eq!(result.unwrap_err(), InvalidPoll::ZeroInterval);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_polls_run_concurrently() {
        let completed = Scripted::new(vec![
            Ok(snapshot(NoteStatus::Pending)),
            Ok(snapshot(NoteStatus::Completed)),
        ]);
        let failed = Scripted::new(vec![Ok(failed_with(Some("upstream rejected audio")))]);

        let poller_a = JobPoller::new(&completed);
        let poller_b = JobPoller::new(&failed);
        let (a, b) = tokio::join!(
            poller_a.run("note-a"),
            poller_b.run("note-b"),
        );

        assert!(matches!(a.unwrap(), PollOutcome::Success { attempts: 2, .. }));
        assert!(matches!(b.unwrap(), PollOutcome::Failure { attempts: 1, .. }));
    }
}
