//! End-to-end flow handler
//!
//! Upload, trigger processing, poll until the transcription settles, then
//! fetch and print the result. The one command that exercises the whole
//! service lifecycle against a live deployment.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use dyktafon_client::{JobPoller, PollOptions, PollOutcome};
use dyktafon_core::dto::note::UploadOptions;

use crate::commands::watch::report_outcome;
use crate::config::Config;

/// Arguments for the `run` flow
#[derive(Args)]
pub struct RunArgs {
    /// Path to the audio file
    pub file: String,

    /// Language hint (e.g. EN, PL, AUTO)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Seconds between poll attempts
    #[arg(long, default_value = "2")]
    pub interval_secs: u64,

    /// Poll attempt budget
    #[arg(long, default_value = "30")]
    pub max_attempts: u32,

    /// Keep the note instead of deleting it afterwards
    #[arg(long)]
    pub keep: bool,
}

/// Run the full upload → process → poll → retrieve flow
pub async fn handle_run(config: &Config, args: RunArgs) -> Result<()> {
    let client = config.client();

    // 1. Upload
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read audio file {}", args.file))?;
    let file_name = std::path::Path::new(&args.file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&args.file);

    println!("{} Uploading {}...", "▸".cyan(), file_name.bold());
    let note = client
        .upload_note(
            file_name,
            bytes,
            UploadOptions {
                title: None,
                language: args.language.clone(),
                tags: args.tags,
            },
        )
        .await
        .context("Upload failed")?;
    println!("  Note {} created", note.id.cyan());

    // 2. Trigger processing
    println!("{} Triggering processing...", "▸".cyan());
    client
        .process_note(&note.id, args.language.as_deref())
        .await
        .context("Failed to start processing")?;

    // 3. Poll to a terminal status
    println!(
        "{} Waiting for transcription (every {}s, up to {} attempts)...",
        "▸".cyan(),
        args.interval_secs,
        args.max_attempts
    );
    let poller = JobPoller::with_options(
        client.clone(),
        PollOptions {
            interval: Duration::from_secs(args.interval_secs),
            max_attempts: args.max_attempts,
        },
    );
    let outcome = poller.run(&note.id).await?;

    // 4. On success, re-fetch with transcription and summary included
    let result = match outcome {
        PollOutcome::Success { attempts, .. } => {
            let full = client
                .get_note(&note.id, true, true)
                .await
                .context("Failed to fetch processed note")?;
            report_outcome(&note.id, &PollOutcome::Success { note: full, attempts })
        }
        other => report_outcome(&note.id, &other),
    };

    // 5. Cleanup
    if !args.keep {
        match client.delete_note(&note.id).await {
            Ok(()) => println!("\n{}", format!("Cleaned up note {}", note.id).dimmed()),
            Err(e) => println!(
                "\n{}",
                format!("Cleanup of note {} failed: {}", note.id, e).yellow()
            ),
        }
    }

    result
}
