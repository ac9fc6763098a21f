//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod flow;
mod health;
mod note;
mod watch;

pub use flow::RunArgs;
pub use note::NoteCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Voice note management
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Poll a note until the service reports a terminal status
    Watch {
        /// Note ID
        id: String,

        /// Seconds between poll attempts
        #[arg(long, default_value = "2")]
        interval_secs: u64,

        /// Poll attempt budget
        #[arg(long, default_value = "30")]
        max_attempts: u32,
    },
    /// Upload a file, trigger processing, and poll to completion
    Run(RunArgs),
    /// Check service health and readiness
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Note { command } => note::handle_note_command(command, config).await,
        Commands::Watch {
            id,
            interval_secs,
            max_attempts,
        } => watch::handle_watch(config, &id, interval_secs, max_attempts).await,
        Commands::Run(args) => flow::handle_run(config, args).await,
        Commands::Health => health::handle_health(config).await,
    }
}
