//! Breakdown commands (sub-allocations within a tracker).

use anyhow::Result;
use clap::{Args, Subcommand};

use runtrack_core::{default_jets, fmt_count, validate, ValidationError};

use crate::error::CliError;
use crate::output::{print_info, print_single, print_success, OutputFormat};
use crate::resolve::{resolve_breakdown_id, resolve_tracker_id};

use super::CommandContext;

/// Breakdown commands.
#[derive(Debug, Args)]
pub struct BreakdownCommand {
    #[command(subcommand)]
    command: BreakdownSubcommand,
}

#[derive(Debug, Subcommand)]
enum BreakdownSubcommand {
    /// Add a breakdown to a tracker.
    Add(AddBreakdownArgs),

    /// Remove a breakdown.
    Remove(RemoveBreakdownArgs),

    /// Add or remove one jet within a breakdown.
    ToggleJet(ToggleJetArgs),

    /// Set a breakdown's total target.
    SetTotal(SetTotalArgs),
}

#[derive(Debug, Args)]
struct AddBreakdownArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Breakdown name.
    name: String,

    /// Jets for this breakdown, comma separated. Defaults to the card's
    /// machine custom field, or the full machine set.
    #[arg(long, value_delimiter = ',')]
    jets: Option<Vec<String>>,

    /// Total target for this breakdown.
    #[arg(long)]
    total: Option<f64>,
}

#[derive(Debug, Args)]
struct RemoveBreakdownArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Breakdown ID or name.
    breakdown: String,
}

#[derive(Debug, Args)]
struct ToggleJetArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Breakdown ID or name.
    breakdown: String,

    /// Jet name.
    jet: String,
}

#[derive(Debug, Args)]
struct SetTotalArgs {
    /// Tracker ID or name.
    tracker: String,

    /// Breakdown ID or name.
    breakdown: String,

    /// New total target.
    #[arg(allow_negative_numbers = true)]
    total: f64,
}

impl BreakdownCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            BreakdownSubcommand::Add(args) => add_breakdown(ctx, args).await,
            BreakdownSubcommand::Remove(args) => remove_breakdown(ctx, args).await,
            BreakdownSubcommand::ToggleJet(args) => toggle_jet(ctx, args).await,
            BreakdownSubcommand::SetTotal(args) => set_total(ctx, args).await,
        }
    }
}

async fn add_breakdown(ctx: CommandContext, args: AddBreakdownArgs) -> Result<()> {
    let store = ctx.store()?;
    let mut trackers = store.load_all().await;

    let id = resolve_tracker_id(&trackers, &args.tracker)?;
    let tracker = trackers
        .get_mut(&id)
        .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", args.tracker)))?;

    let name = args.name.trim().to_string();
    if name.is_empty() {
        return Err(CliError::Validation(ValidationError::UnnamedBreakdown).into());
    }

    let jets: Vec<String> = match args.jets {
        Some(ref jets) => jets
            .iter()
            .map(|jet| jet.trim().to_string())
            .filter(|jet| !jet.is_empty())
            .collect(),
        None => default_jets(ctx.card_snapshot().as_ref()),
    };
    if jets.is_empty() {
        return Err(CliError::Validation(ValidationError::EmptyBreakdown { name }).into());
    }

    if !tracker.is_advanced() && !tracker.jets.is_empty() {
        print_info("Flat jet targets cleared; tracker now tracks breakdowns.");
    }

    let bd_id = tracker.push_breakdown(name, &jets);
    if let Some(total) = args.total {
        if let Some(breakdown) = tracker.breakdown_mut(&bd_id) {
            breakdown.set_total_target(total);
        }
    }

    validate(tracker).map_err(CliError::Validation)?;

    let rendered = crate::view::render_tracker(&id, tracker);
    let snapshot = tracker.clone();
    store.save_all(&trackers).await.map_err(CliError::Storage)?;

    match ctx.format {
        OutputFormat::Json => print_single(
            &serde_json::json!({ "id": id, "breakdown_id": bd_id, "tracker": snapshot }),
            ctx.format,
        ),
        OutputFormat::Table => {
            print_success(&format!(
                "Added breakdown ({}) to '{}'",
                bd_id,
                snapshot.title()
            ));
            println!("{rendered}");
        }
    }

    Ok(())
}

async fn remove_breakdown(ctx: CommandContext, args: RemoveBreakdownArgs) -> Result<()> {
    let store = ctx.store()?;
    let mut trackers = store.load_all().await;

    let id = resolve_tracker_id(&trackers, &args.tracker)?;
    let tracker = trackers
        .get_mut(&id)
        .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", args.tracker)))?;

    let bd_id = resolve_breakdown_id(tracker, &args.breakdown)?;
    if !tracker.remove_breakdown(&bd_id) {
        return Err(
            CliError::NotFound(format!("Breakdown '{}' not found", args.breakdown)).into(),
        );
    }

    if tracker.breakdowns.is_empty() && tracker.jets.is_empty() {
        print_info("Tracker has no jets or breakdowns left. Edit it to pick jets.");
    }

    let title = tracker.title().to_string();
    store.save_all(&trackers).await.map_err(CliError::Storage)?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true, "id": id }), ctx.format),
        OutputFormat::Table => print_success(&format!("Removed breakdown from '{}'", title)),
    }

    Ok(())
}

async fn toggle_jet(ctx: CommandContext, args: ToggleJetArgs) -> Result<()> {
    let store = ctx.store()?;
    let mut trackers = store.load_all().await;

    let id = resolve_tracker_id(&trackers, &args.tracker)?;
    let tracker = trackers
        .get_mut(&id)
        .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", args.tracker)))?;

    let bd_id = resolve_breakdown_id(tracker, &args.breakdown)?;
    let jet = args.jet.trim().to_string();
    if jet.is_empty() {
        anyhow::bail!("Jet name cannot be empty");
    }

    let breakdown = tracker
        .breakdown_mut(&bd_id)
        .ok_or_else(|| CliError::NotFound(format!("Breakdown '{}' not found", args.breakdown)))?;

    let was_present = breakdown.jets.contains_key(&jet);
    let present = breakdown.toggle_jet(&jet);
    store.save_all(&trackers).await.map_err(CliError::Storage)?;

    match ctx.format {
        OutputFormat::Json => print_single(
            &serde_json::json!({ "ok": true, "id": id, "jet": jet, "present": present }),
            ctx.format,
        ),
        OutputFormat::Table => match (was_present, present) {
            (false, _) => print_success(&format!("Added '{}'", jet)),
            (true, false) => print_success(&format!("Removed '{}'", jet)),
            (true, true) => {
                print_info(&format!("A breakdown keeps at least one jet; '{}' was reset.", jet))
            }
        },
    }

    Ok(())
}

async fn set_total(ctx: CommandContext, args: SetTotalArgs) -> Result<()> {
    let store = ctx.store()?;
    let mut trackers = store.load_all().await;

    let id = resolve_tracker_id(&trackers, &args.tracker)?;
    let tracker = trackers
        .get_mut(&id)
        .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", args.tracker)))?;

    let bd_id = resolve_breakdown_id(tracker, &args.breakdown)?;
    let breakdown = tracker
        .breakdown_mut(&bd_id)
        .ok_or_else(|| CliError::NotFound(format!("Breakdown '{}' not found", args.breakdown)))?;

    breakdown.set_total_target(args.total);
    let stored = breakdown.total_target;
    validate(tracker).map_err(CliError::Validation)?;
    store.save_all(&trackers).await.map_err(CliError::Storage)?;

    match ctx.format {
        OutputFormat::Json => print_single(
            &serde_json::json!({ "ok": true, "id": id, "breakdown_id": bd_id, "total": stored }),
            ctx.format,
        ),
        OutputFormat::Table => {
            print_success(&format!("Set breakdown total to {}", fmt_count(stored)))
        }
    }

    Ok(())
}
