//! trackctl (wj) - CLI for waterjet run trackers on board cards.
//!
//! Trackers live in the card's key/value storage; this tool reads,
//! edits, and re-renders them from the terminal.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod resolve;
mod view;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Degraded paths (storage, checklist fetches) report through tracing.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
