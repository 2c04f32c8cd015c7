//! Count commands (record run tallies).

use anyhow::Result;
use clap::{Args, Subcommand};

use runtrack_core::{fmt_count, totals};

use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};
use crate::resolve::{resolve_breakdown_id, resolve_tracker_id};

use super::CommandContext;

/// Count commands.
#[derive(Debug, Args)]
pub struct CountCommand {
    #[command(subcommand)]
    command: CountSubcommand,
}

#[derive(Debug, Subcommand)]
enum CountSubcommand {
    /// Overwrite a jet's current tally.
    Set(CountSetArgs),

    /// Add to a jet's current tally.
    Add(CountAddArgs),
}

#[derive(Debug, Args)]
struct CountSetArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Jet name.
    jet: String,

    /// New tally.
    #[arg(allow_negative_numbers = true)]
    value: f64,

    /// Breakdown ID or name (for trackers with breakdowns).
    #[arg(long)]
    breakdown: Option<String>,
}

#[derive(Debug, Args)]
struct CountAddArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Jet name.
    jet: String,

    /// Amount to add (negative to subtract).
    #[arg(allow_negative_numbers = true)]
    delta: f64,

    /// Breakdown ID or name (for trackers with breakdowns).
    #[arg(long)]
    breakdown: Option<String>,
}

enum Change {
    Set(f64),
    Add(f64),
}

impl CountCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            CountSubcommand::Set(args) => {
                apply_count(ctx, args.tracker, args.jet, args.breakdown, Change::Set(args.value))
                    .await
            }
            CountSubcommand::Add(args) => {
                apply_count(ctx, args.tracker, args.jet, args.breakdown, Change::Add(args.delta))
                    .await
            }
        }
    }
}

async fn apply_count(
    ctx: CommandContext,
    tracker_ident: String,
    jet: String,
    breakdown_ident: Option<String>,
    change: Change,
) -> Result<()> {
    let store = ctx.store()?;
    let mut trackers = store.load_all().await;

    let id = resolve_tracker_id(&trackers, &tracker_ident)?;
    let tracker = trackers
        .get_mut(&id)
        .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", tracker_ident)))?;

    let jet = jet.trim().to_string();
    let breakdown_id = match breakdown_ident.as_deref() {
        Some(ident) => Some(resolve_breakdown_id(tracker, ident)?),
        None => None,
    };

    let updated = match (&breakdown_id, &change) {
        (Some(bd_id), Change::Set(value)) => tracker.set_breakdown_current(bd_id, &jet, *value),
        (Some(bd_id), Change::Add(delta)) => tracker.add_breakdown_current(bd_id, &jet, *delta),
        (None, Change::Set(value)) => tracker.set_current(&jet, *value),
        (None, Change::Add(delta)) => tracker.add_current(&jet, *delta),
    };

    if !updated {
        if tracker.is_advanced() && breakdown_id.is_none() {
            anyhow::bail!(
                "Tracker '{}' tracks breakdowns. Pass --breakdown to pick one.",
                tracker_ident
            );
        }
        return Err(CliError::NotFound(format!(
            "Jet '{}' not found on tracker '{}'",
            jet, tracker_ident
        ))
        .into());
    }

    let count = match breakdown_id.as_ref() {
        Some(bd_id) => tracker
            .breakdowns
            .iter()
            .find(|b| &b.id == bd_id)
            .and_then(|b| b.jets.get(&jet))
            .copied()
            .unwrap_or_default(),
        None => tracker.jets.get(&jet).copied().unwrap_or_default(),
    };
    let total = totals(tracker);
    let snapshot = tracker.clone();
    store.save_all(&trackers).await.map_err(CliError::Storage)?;

    match ctx.format {
        OutputFormat::Json => print_single(
            &serde_json::json!({ "id": id, "tracker": snapshot }),
            ctx.format,
        ),
        OutputFormat::Table => print_success(&format!(
            "{}: {} / {} (total {} / {})",
            jet,
            fmt_count(count.current),
            fmt_count(count.target),
            fmt_count(total.current),
            fmt_count(total.target)
        )),
    }

    Ok(())
}
