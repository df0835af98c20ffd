//! LED reactions CLI
//!
//! Plays effects on a small LED strip in response to host events.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "ledreaccs=debug,ledreaccs_surface=debug"
    } else {
        "ledreaccs=info,ledreaccs_surface=info"
    };
    // Logs go to stderr so `--output stdout` carries only frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::List { json } => commands::effects::list(&cli, *json)?,
        Commands::Play { effect, params } => commands::effects::play(&cli, effect, params)?,
        Commands::Notify {
            event,
            effect,
            params,
        } => commands::reactions::notify(&cli, event, effect.as_deref(), params)?,
        Commands::Listen => commands::reactions::listen(&cli)?,
        Commands::Check => commands::effects::check(&cli)?,
        Commands::InitConfig { force } => commands::reactions::init_config(&cli, *force)?,
    }

    Ok(())
}
