//! Add command (create a tracker on the card).

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;

use runtrack_core::{auto_split, default_jets, round3, validate, Tracker, ValidationError};
use runtrack_id::TrackerId;
use runtrack_store::item_name;

use crate::error::CliError;
use crate::output::{print_single, print_success, print_warning, OutputFormat};

use super::CommandContext;

/// Add command - create a tracker on the working card.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Tracker name.
    #[arg(long)]
    name: Option<String>,

    /// Total target for the run.
    #[arg(long)]
    total: Option<f64>,

    /// Jets to include, comma separated. Defaults to the card's machine
    /// custom field, or the full machine set.
    #[arg(long, value_delimiter = ',')]
    jets: Option<Vec<String>>,

    /// Per-jet target in format JET=VALUE. Can be specified multiple times.
    #[arg(long = "target", value_name = "JET=VALUE")]
    targets: Vec<String>,

    /// Checklist item ID to link.
    #[arg(long)]
    link: Option<String>,

    /// Split the total across jets before saving.
    #[arg(long)]
    split: bool,

    /// Turn off the tracker's auto-split preference.
    #[arg(long)]
    no_auto_split: bool,
}

impl AddCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;

        let mut tracker = Tracker::new();
        tracker.auto_split = !self.no_auto_split;

        if let Some(name) = self.name.as_deref() {
            tracker.set_name(name);
        }

        let jets: Vec<String> = match self.jets {
            Some(ref jets) => jets
                .iter()
                .map(|jet| jet.trim().to_string())
                .filter(|jet| !jet.is_empty())
                .collect(),
            None => default_jets(ctx.card_snapshot().as_ref()),
        };
        if jets.is_empty() {
            return Err(CliError::Validation(ValidationError::NoJetsSelected).into());
        }

        let overrides = parse_targets(&self.targets)?;
        for jet in overrides.keys() {
            if !jets.contains(jet) {
                anyhow::bail!("--target jet '{}' is not among the selected jets", jet);
            }
        }

        tracker.set_flat_targets(jets.into_iter().map(|jet| {
            let target = overrides.get(&jet).copied().unwrap_or(0.0);
            (jet, target)
        }));

        if let Some(total) = self.total {
            tracker.set_total_target(total);
        }

        if let Some(item_id) = self.link.as_deref() {
            let source = ctx.checklist_source()?;
            let items = source.list_items().await;
            let name = item_name(&items, item_id);
            if name.is_none() && !items.is_empty() {
                print_warning("Checklist item not found on the card; linking anyway.");
            }
            tracker.link_checklist_item(item_id.to_string(), name);
        }

        if self.split {
            auto_split(&mut tracker).map_err(CliError::Validation)?;
        }

        validate(&tracker).map_err(CliError::Validation)?;

        let mut trackers = store.load_all().await;
        let id = TrackerId::new();
        trackers.insert(id.clone(), tracker.clone());
        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => print_single(
                &serde_json::json!({ "id": id, "tracker": tracker }),
                ctx.format,
            ),
            OutputFormat::Table => {
                print_success(&format!("Created tracker '{}' ({})", tracker.title(), id));
                println!("{}", crate::view::render_tracker(&id, &tracker));
            }
        }

        Ok(())
    }
}

/// Parse repeated `JET=VALUE` specs (deterministic ordering).
pub(super) fn parse_targets(specs: &[String]) -> Result<BTreeMap<String, f64>> {
    let mut targets = BTreeMap::new();
    for spec in specs {
        let Some((jet_raw, value_raw)) = spec.split_once('=') else {
            return Err(anyhow::anyhow!(
                "Invalid target '{}'. Use format JET=VALUE (e.g., 'Waterjet 1=5.6')",
                spec
            ));
        };

        let jet = jet_raw.trim().to_string();
        if jet.is_empty() {
            return Err(anyhow::anyhow!(
                "Invalid target '{}'. Jet name cannot be empty.",
                spec
            ));
        }

        let value: f64 = value_raw.trim().parse().map_err(|_| {
            anyhow::anyhow!(
                "Invalid value '{}' for jet '{}'. Must be a number.",
                value_raw,
                jet
            )
        })?;

        if targets.insert(jet.clone(), round3(value)).is_some() {
            return Err(anyhow::anyhow!("Jet '{}' specified multiple times", jet));
        }
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jet_value_specs() {
        let specs = vec!["Waterjet 1=5.6".to_string(), "Waterjet 2 = 3".to_string()];
        let targets = parse_targets(&specs).unwrap();
        assert_eq!(targets.get("Waterjet 1"), Some(&5.6));
        assert_eq!(targets.get("Waterjet 2"), Some(&3.0));
    }

    #[test]
    fn rejects_missing_separator() {
        let specs = vec!["Waterjet 1".to_string()];
        assert!(parse_targets(&specs).is_err());
    }

    #[test]
    fn rejects_duplicate_jets() {
        let specs = vec!["Waterjet 1=1".to_string(), "Waterjet 1=2".to_string()];
        assert!(parse_targets(&specs).is_err());
    }

    #[test]
    fn rejects_non_numeric_value() {
        let specs = vec!["Waterjet 1=lots".to_string()];
        assert!(parse_targets(&specs).is_err());
    }
}
