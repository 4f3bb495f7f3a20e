//! Polychat CLI — entry point.
//!
//! # Commands
//!
//! - `polychat chat [-m MESSAGE]` — send one prompt to every enabled model
//!   (single-shot with `-m`, interactive REPL otherwise)
//! - `polychat init` — write the default configuration
//! - `polychat status` — show configuration and provider key status
//! - `polychat config <ACTION>` — edit providers, models, and UI settings

mod config_cmd;
mod fanout;
mod helpers;
mod init_cmd;
mod render;
mod repl;
mod status;
mod turn;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use polychat_core::config::load_config;
use polychat_core::transcript::TranscriptSet;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Chat with multiple LLMs side by side
#[derive(Parser)]
#[command(name = "polychat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to all enabled models (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Initialize the configuration file
    Init,

    /// Show configuration and provider status
    Status,

    /// Edit the configuration
    Config {
        #[command(subcommand)]
        action: config_cmd::ConfigCommands,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Every command loads the config, so every command gets a subscriber.
    let verbose = matches!(cli.command, Commands::Chat { logs: true, .. });
    init_logging(verbose);

    match cli.command {
        Commands::Chat { message, .. } => run_chat(message).await,
        Commands::Init => init_cmd::run(),
        Commands::Status => status::run(),
        Commands::Config { action } => config_cmd::dispatch(action),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>) -> Result<()> {
    let config = load_config(None).context("failed to load configuration")?;

    // Surface missing keys up front; affected models are excluded, the rest run.
    for missing in config.missing_api_keys() {
        eprintln!(
            "warning: API key for '{}' not set ({}); its models are skipped",
            missing.provider_id, missing.api_key_env
        );
    }
    for id in helpers::unknown_enabled_providers(&config) {
        eprintln!("warning: '{id}' is not a known provider id; its models cannot be dispatched");
    }

    if config.dispatchable_models().is_empty() {
        anyhow::bail!(
            "no models available — enable one with `polychat config enable <PROVIDER>` \
             and make sure its API key env var is set (see `polychat status`)"
        );
    }

    let mut transcripts = TranscriptSet::new(config.ui.max_chat_history);

    match message {
        Some(prompt) => {
            // Single-shot mode
            turn::run_turn(&config, &mut transcripts, &prompt).await;
            Ok(())
        }
        None => repl::run(&config, &mut transcripts).await,
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("polychat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
