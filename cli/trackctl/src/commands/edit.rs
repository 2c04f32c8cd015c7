//! Edit command (update a tracker's name, jets, or targets).

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;

use runtrack_core::{auto_split, validate, ValidationError};

use crate::error::CliError;
use crate::output::{print_info, print_single, print_success, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::add::parse_targets;
use super::CommandContext;

/// Edit command - update a tracker on the working card.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Tracker ID or name.
    tracker: String,

    /// New tracker name.
    #[arg(long)]
    name: Option<String>,

    /// New total target.
    #[arg(long)]
    total: Option<f64>,

    /// Replace the jet selection, comma separated. Kept jets keep their
    /// targets and tallies.
    #[arg(long, value_delimiter = ',')]
    jets: Option<Vec<String>>,

    /// Per-jet target in format JET=VALUE. Can be specified multiple times.
    #[arg(long = "target", value_name = "JET=VALUE")]
    targets: Vec<String>,

    /// Turn the auto-split preference on.
    #[arg(long, conflicts_with = "no_auto_split")]
    auto_split: bool,

    /// Turn the auto-split preference off.
    #[arg(long)]
    no_auto_split: bool,

    /// Split the total across jets after applying changes.
    #[arg(long)]
    split: bool,
}

impl EditCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get_mut(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        if let Some(name) = self.name.as_deref() {
            tracker.set_name(name);
        }

        let overrides = parse_targets(&self.targets)?;
        let selection: Option<Vec<String>> = match self.jets {
            Some(ref jets) => Some(
                jets.iter()
                    .map(|jet| jet.trim().to_string())
                    .filter(|jet| !jet.is_empty())
                    .collect(),
            ),
            // Bare --target flags adjust the existing selection.
            None if !overrides.is_empty() => Some(tracker.jets.keys().cloned().collect()),
            None => None,
        };

        if let Some(jets) = selection {
            if jets.is_empty() {
                return Err(CliError::Validation(ValidationError::NoJetsSelected).into());
            }
            for jet in overrides.keys() {
                if !jets.contains(jet) {
                    anyhow::bail!("--target jet '{}' is not among the selected jets", jet);
                }
            }

            if tracker.is_advanced() {
                print_info("Replacing breakdowns with a flat jet selection.");
            }

            let previous_targets: BTreeMap<String, f64> = tracker
                .jets
                .iter()
                .map(|(jet, count)| (jet.clone(), count.target))
                .collect();
            tracker.set_flat_targets(jets.into_iter().map(|jet| {
                let target = overrides
                    .get(&jet)
                    .copied()
                    .or_else(|| previous_targets.get(&jet).copied())
                    .unwrap_or(0.0);
                (jet, target)
            }));
        }

        if let Some(total) = self.total {
            tracker.set_total_target(total);
        }

        if self.auto_split {
            tracker.auto_split = true;
        }
        if self.no_auto_split {
            tracker.auto_split = false;
        }

        if self.split {
            auto_split(tracker).map_err(CliError::Validation)?;
        }

        validate(tracker).map_err(CliError::Validation)?;

        let rendered = crate::view::render_tracker(&id, tracker);
        let snapshot = tracker.clone();
        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => print_single(
                &serde_json::json!({ "id": id, "tracker": snapshot }),
                ctx.format,
            ),
            OutputFormat::Table => {
                print_success(&format!("Updated tracker '{}' ({})", snapshot.title(), id));
                println!("{rendered}");
            }
        }

        Ok(())
    }
}
