//! Watch command handler
//!
//! Polls a note until the service reports a terminal status and reports the
//! outcome with a non-zero exit code on failure or timeout.

use std::time::Duration;

use anyhow::Result;
use colored::*;

use dyktafon_client::{JobPoller, PollOptions, PollOutcome};

use crate::commands::note::print_note_details;
use crate::config::Config;

/// Poll a note to a terminal status and print the result
pub async fn handle_watch(
    config: &Config,
    id: &str,
    interval_secs: u64,
    max_attempts: u32,
) -> Result<()> {
    let poller = JobPoller::with_options(
        config.client(),
        PollOptions {
            interval: Duration::from_secs(interval_secs),
            max_attempts,
        },
    );

    println!(
        "{}",
        format!(
            "Watching note {} (every {}s, up to {} attempts)...",
            id, interval_secs, max_attempts
        )
        .dimmed()
    );

    let outcome = poller.run(id).await?;
    report_outcome(id, &outcome)
}

/// Print a poll outcome; `Err` for anything other than success
pub fn report_outcome(id: &str, outcome: &PollOutcome) -> Result<()> {
    match outcome {
        PollOutcome::Success { note, attempts } => {
            println!(
                "{} Note completed after {} attempt(s)",
                "✓".green(),
                attempts
            );
            println!();
            print_note_details(note);
            Ok(())
        }
        PollOutcome::Failure { reason, attempts } => {
            anyhow::bail!(
                "Note {} failed after {} attempt(s): {}",
                id,
                attempts,
                reason
            )
        }
        PollOutcome::Timeout { attempts } => {
            anyhow::bail!(
                "Note {} did not reach a terminal status within {} attempt(s)",
                id,
                attempts
            )
        }
    }
}
