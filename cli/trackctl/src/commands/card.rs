//! Card commands (working-card selection and inspection).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Manage the working card.
#[derive(Debug, Args)]
pub struct CardCommand {
    #[command(subcommand)]
    command: CardSubcommand,
}

#[derive(Debug, Subcommand)]
enum CardSubcommand {
    /// Select the card to work on.
    Use(UseCardArgs),

    /// Show the selected card.
    Show,

    /// Clear the selection.
    Clear,
}

#[derive(Debug, Args)]
struct UseCardArgs {
    /// Card ID.
    card_id: String,

    /// Card snapshot JSON to cache for offline checklist and machine lookup.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CardView {
    api_url: String,
    card: Option<String>,
    storage_path: Option<String>,
    snapshot_cached: bool,
}

impl CardCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            CardSubcommand::Use(args) => use_card(ctx, args).await,
            CardSubcommand::Show => show(ctx).await,
            CardSubcommand::Clear => clear(ctx).await,
        }
    }
}

/// Select a card and optionally cache its snapshot.
async fn use_card(mut ctx: CommandContext, args: UseCardArgs) -> Result<()> {
    let card_id = args.card_id.trim().to_string();
    if card_id.is_empty() || !card_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("Card ID must be alphanumeric, got '{}'", args.card_id);
    }

    if let Some(path) = args.snapshot.as_deref() {
        let contents = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read snapshot {:?}: {}", path, e))?;
        let value: serde_json::Value = serde_json::from_slice(&contents)
            .map_err(|e| anyhow::anyhow!("Snapshot {:?} is not valid JSON: {}", path, e))?;

        let cache = config::card_snapshot_path(&card_id)?;
        if let Some(parent) = cache.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&cache, serde_json::to_vec_pretty(&value)?)?;
    }

    ctx.config.context.card = Some(card_id.clone());
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(
            &serde_json::json!({ "ok": true, "card": card_id }),
            ctx.format,
        ),
        OutputFormat::Table => print_success(&format!("Using card {}", card_id)),
    }

    Ok(())
}

async fn show(ctx: CommandContext) -> Result<()> {
    let card = ctx.resolve_card().map(|s| s.to_string());
    let storage_path = match card.as_deref() {
        Some(id) => Some(config::card_store_path(id)?.display().to_string()),
        None => None,
    };
    let snapshot_cached = ctx.card_snapshot().is_some();

    let view = CardView {
        api_url: ctx.config.api_url.clone(),
        card,
        storage_path,
        snapshot_cached,
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view, ctx.format),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("card: {}", view.card.as_deref().unwrap_or("-"));
            println!("storage: {}", view.storage_path.as_deref().unwrap_or("-"));
            println!(
                "snapshot: {}",
                if view.snapshot_cached { "cached" } else { "-" }
            );
        }
    }

    Ok(())
}

async fn clear(mut ctx: CommandContext) -> Result<()> {
    ctx.config.context.card = None;
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true }), ctx.format),
        OutputFormat::Table => print_success("Cleared card selection"),
    }

    Ok(())
}
