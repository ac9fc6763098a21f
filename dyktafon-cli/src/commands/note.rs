//! Note command handlers
//!
//! Handles all note-related CLI commands: upload, retrieval, listing,
//! processing, export, and deletion.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use dyktafon_client::VoiceNotesClient;
use dyktafon_core::domain::note::{NoteStatus, VoiceNote};
use dyktafon_core::dto::note::{ExportFormat, ListQuery, ReprocessRequest, UploadOptions};

use crate::config::Config;

/// Note subcommands
#[derive(Subcommand)]
pub enum NoteCommands {
    /// Upload an audio file
    Upload {
        /// Path to the audio file
        file: String,

        /// Note title
        #[arg(long)]
        title: Option<String>,

        /// Language hint (e.g. EN, PL, AUTO)
        #[arg(short, long)]
        language: Option<String>,

        /// Tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Get note details
    Get {
        /// Note ID
        id: String,

        /// Include transcription text
        #[arg(long)]
        transcription: bool,

        /// Include summary text
        #[arg(long)]
        summary: bool,

        /// Print the raw note as JSON
        #[arg(long)]
        json: bool,
    },
    /// List notes for the current session
    List {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Notes per page
        #[arg(long, default_value = "20")]
        limit: u32,

        /// Filter by status (pending, processing, completed, failed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Trigger transcription for an uploaded note
    Process {
        /// Note ID
        id: String,

        /// Language override
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Re-run processing with different prompts or model
    Reprocess {
        /// Note ID
        id: String,

        /// Language override
        #[arg(short, long)]
        language: Option<String>,

        /// Model override
        #[arg(short, long)]
        model: Option<String>,

        /// Summarization prompt override
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Export a note as a rendered document
    Export {
        /// Note ID
        id: String,

        /// Output format (markdown or json)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
}

/// Handle note commands
///
/// Routes note subcommands to their respective handlers.
pub async fn handle_note_command(command: NoteCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        NoteCommands::Upload {
            file,
            title,
            language,
            tags,
        } => upload_note(&client, &file, title, language, tags).await,
        NoteCommands::Get {
            id,
            transcription,
            summary,
            json,
        } => get_note(&client, &id, transcription, summary, json).await,
        NoteCommands::List {
            page,
            limit,
            status,
        } => list_notes(&client, page, limit, status).await,
        NoteCommands::Process { id, language } => process_note(&client, &id, language).await,
        NoteCommands::Reprocess {
            id,
            language,
            model,
            prompt,
        } => reprocess_note(&client, &id, language, model, prompt).await,
        NoteCommands::Export { id, format, output } => {
            export_note(&client, &id, &format, output).await
        }
        NoteCommands::Delete { id } => delete_note(&client, &id).await,
    }
}

/// Upload a file as a new note
async fn upload_note(
    client: &VoiceNotesClient,
    file: &str,
    title: Option<String>,
    language: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read audio file {}", file))?;
    let file_name = std::path::Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file);

    let note = client
        .upload_note(
            file_name,
            bytes,
            UploadOptions {
                title,
                language,
                tags,
            },
        )
        .await
        .context("Upload failed")?;

    println!("{} Uploaded {}", "✓".green(), file_name.bold());
    print_note_details(&note);

    Ok(())
}

/// Get and display a single note
async fn get_note(
    client: &VoiceNotesClient,
    id: &str,
    transcription: bool,
    summary: bool,
    json: bool,
) -> Result<()> {
    let note = client.get_note(id, transcription, summary).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note_details(&note);
    }

    Ok(())
}

/// List notes for the current session
async fn list_notes(
    client: &VoiceNotesClient,
    page: u32,
    limit: u32,
    status: Option<String>,
) -> Result<()> {
    let status = status
        .map(|s| s.parse::<NoteStatus>())
        .transpose()
        .context("Invalid status filter")?;

    let result = client
        .list_notes(&ListQuery {
            page,
            limit,
            status,
            ..ListQuery::default()
        })
        .await?;

    if result.voice_notes.is_empty() {
        println!("{}", "No notes found.".yellow());
        return Ok(());
    }

    let total = result.total.unwrap_or(result.voice_notes.len() as u64);
    println!("{}", format!("Found {} note(s):", total).bold());
    println!();
    for note in &result.voice_notes {
        print_note_summary(note);
    }

    Ok(())
}

/// Trigger processing for a note
async fn process_note(
    client: &VoiceNotesClient,
    id: &str,
    language: Option<String>,
) -> Result<()> {
    let note = client.process_note(id, language.as_deref()).await?;

    println!("{} Processing started", "✓".green());
    println!("  Status: {}", colorize_status(&note.status));

    Ok(())
}

/// Re-run processing for a note
async fn reprocess_note(
    client: &VoiceNotesClient,
    id: &str,
    language: Option<String>,
    model: Option<String>,
    prompt: Option<String>,
) -> Result<()> {
    let ack = client
        .reprocess_note(
            id,
            ReprocessRequest {
                language,
                model,
                user_prompt: prompt,
                ..ReprocessRequest::default()
            },
        )
        .await?;

    println!("{} Reprocessing started", "✓".green());
    println!("  Note:   {}", ack.id.cyan());
    println!("  Status: {}", colorize_status(&ack.status));
    if let Some(message) = ack.message {
        println!("  {}", message.dimmed());
    }

    Ok(())
}

/// Export a note and print or save the document
async fn export_note(
    client: &VoiceNotesClient,
    id: &str,
    format: &str,
    output: Option<String>,
) -> Result<()> {
    let format: ExportFormat = format.parse().context("Invalid export format")?;
    let document = client.export_note(id, format).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &document)
                .await
                .with_context(|| format!("Failed to write {}", path))?;
            println!("{} Exported note {} to {}", "✓".green(), id.cyan(), path.bold());
        }
        None => println!("{}", document),
    }

    Ok(())
}

/// Delete a note
async fn delete_note(client: &VoiceNotesClient, id: &str) -> Result<()> {
    match client.delete_note(id).await {
        Ok(()) => {
            println!("{} Deleted note {}", "✓".green(), id.cyan());
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            anyhow::bail!("Note {} not found (wrong session?)", id)
        }
        Err(e) => Err(e.into()),
    }
}

/// Print a one-line note summary
pub fn print_note_summary(note: &VoiceNote) {
    println!("  {} Note {}", "▸".cyan(), note.id.dimmed());
    if let Some(title) = &note.title {
        println!("    Title:    {}", title);
    }
    println!("    Status:   {}", colorize_status(&note.status));
    if let Some(created) = note.created_at {
        println!(
            "    Created:  {}",
            created.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!();
}

/// Print detailed note information
pub fn print_note_details(note: &VoiceNote) {
    println!("{}", "Note Details:".bold());
    println!("  ID:       {}", note.id.cyan());
    if let Some(title) = &note.title {
        println!("  Title:    {}", title);
    }
    println!("  Status:   {}", colorize_status(&note.status));
    if let Some(language) = &note.language {
        println!("  Language: {}", language);
    }
    if !note.tags.is_empty() {
        println!("  Tags:     {}", note.tags.join(", "));
    }
    if let Some(duration) = note.duration_seconds {
        println!("  Duration: {:.1}s", duration);
    }
    if let Some(created) = note.created_at {
        println!("  Created:  {}", created.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(transcription) = &note.transcription {
        println!("\n{}", "Transcription:".bold());
        println!("{}", transcription);
    }

    if let Some(summary) = &note.summary {
        println!("\n{}", "Summary:".bold());
        println!("{}", summary);
    }

    if let Some(error) = &note.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

/// Colorize note status for display
pub fn colorize_status(status: &NoteStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        NoteStatus::Pending => status_str.yellow(),
        NoteStatus::Processing => status_str.cyan(),
        NoteStatus::Completed => status_str.green(),
        NoteStatus::Failed => status_str.red(),
        NoteStatus::Unknown => status_str.dimmed(),
    }
}
