//! CLI commands.

mod add;
mod auth;
mod breakdown;
mod card;
mod collapse;
mod count;
mod delete;
mod edit;
mod link;
mod list;
mod show;
mod split;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::warn;

use crate::config::{self, Config, Credentials};
use crate::error::CliError;
use crate::output::OutputFormat;
use runtrack_store::{
    ChecklistChain, ChecklistSource, FileStorage, NoChecklist, RestChecklist, SnapshotChecklist,
    TrackerStore,
};

/// Run tracker CLI - track waterjet runs on board cards.
#[derive(Debug, Parser)]
#[command(name = "wj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Card ID to operate on.
    #[arg(long, global = true, env = "WJ_CARD")]
    card: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Store board API credentials.
    Auth(auth::AuthCommand),

    /// Select or inspect the working card.
    Card(card::CardCommand),

    /// Create a tracker on the card.
    Add(add::AddCommand),

    /// Update a tracker's name, jets, or targets.
    Edit(edit::EditCommand),

    /// List trackers on the card.
    List(list::ListCommand),

    /// Show one tracker in full.
    Show(show::ShowCommand),

    /// Record run counts.
    Count(count::CountCommand),

    /// Divide a total target across jets in tenth steps.
    Split(split::SplitCommand),

    /// Link a tracker to a checklist item.
    Link(link::LinkCommand),

    /// Remove a tracker's checklist link.
    Unlink(link::UnlinkCommand),

    /// Manage a tracker's breakdowns.
    Breakdown(breakdown::BreakdownCommand),

    /// Collapse or expand a tracker in the board view.
    Collapse(collapse::CollapseCommand),

    /// Delete a tracker.
    Delete(delete::DeleteCommand),

    /// Watch the card and re-render when trackers change.
    Watch(watch::WatchCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let format = match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        let config = Config::load()?;
        let credentials = Credentials::load()?;

        // Build context from flags and config
        let ctx = CommandContext {
            config,
            credentials,
            format,
            card: self.card,
        };

        match self.command {
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Card(cmd) => cmd.run(ctx).await,
            Commands::Add(cmd) => cmd.run(ctx).await,
            Commands::Edit(cmd) => cmd.run(ctx).await,
            Commands::List(cmd) => cmd.run(ctx).await,
            Commands::Show(cmd) => cmd.run(ctx).await,
            Commands::Count(cmd) => cmd.run(ctx).await,
            Commands::Split(cmd) => cmd.run(ctx).await,
            Commands::Link(cmd) => cmd.run(ctx).await,
            Commands::Unlink(cmd) => cmd.run(ctx).await,
            Commands::Breakdown(cmd) => cmd.run(ctx).await,
            Commands::Collapse(cmd) => cmd.run(ctx).await,
            Commands::Delete(cmd) => cmd.run(ctx).await,
            Commands::Watch(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("wj {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub credentials: Option<Credentials>,
    pub format: OutputFormat,
    pub card: Option<String>,
}

impl CommandContext {
    /// Resolve the current card, preferring flag over context.
    pub fn resolve_card(&self) -> Option<&str> {
        self.card.as_deref().or(self.config.context.card.as_deref())
    }

    /// Require a card to be specified.
    pub fn require_card(&self) -> Result<&str> {
        self.resolve_card().ok_or_else(|| CliError::NoCard.into())
    }

    /// Tracker store backed by the current card's storage file.
    pub fn store(&self) -> Result<TrackerStore<FileStorage>> {
        let card = self.require_card()?;
        let path = config::card_store_path(card)?;
        Ok(TrackerStore::new(FileStorage::new(path)))
    }

    /// Cached card snapshot for the current card, if one was saved.
    pub fn card_snapshot(&self) -> Option<Value> {
        let card = self.resolve_card()?;
        let path = config::card_snapshot_path(card).ok()?;
        let contents = std::fs::read(&path).ok()?;
        match serde_json::from_slice(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable card snapshot");
                None
            }
        }
    }

    /// Checklist items come from the board API when credentials exist,
    /// then from the saved card snapshot, then from nowhere.
    pub fn checklist_source(&self) -> Result<Box<dyn ChecklistSource>> {
        let card = self.require_card()?;
        let snapshot = self.card_snapshot();

        Ok(match (&self.credentials, snapshot) {
            (Some(creds), Some(snap)) => Box::new(ChecklistChain::new(
                RestChecklist::new(
                    self.config.api_url(),
                    card,
                    creds.key.as_str(),
                    creds.token.as_str(),
                ),
                SnapshotChecklist::new(snap),
            )),
            (Some(creds), None) => Box::new(RestChecklist::new(
                self.config.api_url(),
                card,
                creds.key.as_str(),
                creds.token.as_str(),
            )),
            (None, Some(snap)) => Box::new(SnapshotChecklist::new(snap)),
            (None, None) => Box::new(NoChecklist),
        })
    }
}
