//! Dyktafon CLI
//!
//! Command-line client for a dyktafon voice-note service: upload recordings,
//! trigger processing, watch notes until transcription settles, and manage
//! the resulting library.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dyktafon")]
#[command(about = "Voice note service client", long_about = None)]
struct Cli {
    /// Service base URL
    #[arg(long, env = "DYKTAFON_URL", default_value = "http://localhost:3101")]
    base_url: String,

    /// Session identifier scoping anonymous uploads (generated when omitted)
    #[arg(long, env = "DYKTAFON_SESSION")]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyktafon_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        session_id: cli
            .session
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
    };

    handle_command(cli.command, &config).await
}
