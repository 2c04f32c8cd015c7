//! Link commands (attach a tracker to a card checklist item).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_output, print_single, print_success, print_warning, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::CommandContext;

/// Link command - link a tracker to a checklist item.
///
/// With no item argument, lists the items the card offers.
#[derive(Debug, Args)]
pub struct LinkCommand {
    /// Tracker ID or name.
    tracker: String,

    /// Checklist item ID or name.
    item: Option<String>,
}

/// Unlink command - remove a tracker's checklist link.
#[derive(Debug, Args)]
pub struct UnlinkCommand {
    /// Tracker ID or name.
    tracker: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Item")]
    name: String,

    #[tabled(rename = "Checklist")]
    checklist: String,
}

impl LinkCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get_mut(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        let source = ctx.checklist_source()?;
        let items = source.list_items().await;

        let Some(ident) = self.item.as_deref() else {
            let rows: Vec<ItemRow> = items
                .iter()
                .map(|item| ItemRow {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    checklist: item.checklist_name.clone(),
                })
                .collect();
            match ctx.format {
                OutputFormat::Table => print_output(&rows, ctx.format),
                OutputFormat::Json => print_single(&rows, ctx.format),
            }
            return Ok(());
        };

        let ident = ident.trim();
        if ident.is_empty() {
            anyhow::bail!("Checklist item cannot be empty");
        }

        let (item_id, item_label) = match items.iter().find(|item| item.id == ident) {
            Some(item) => (item.id.clone(), Some(item.name.clone())),
            None => {
                let matches: Vec<_> = items.iter().filter(|item| item.name == ident).collect();
                match matches.as_slice() {
                    [] => {
                        if !items.is_empty() {
                            print_warning("Checklist item not found on the card; linking by raw ID.");
                        }
                        // Re-linking the same id keeps the cached label.
                        let cached = (tracker.checklist_item_id.as_deref() == Some(ident))
                            .then(|| tracker.checklist_item_name.clone())
                            .flatten();
                        (ident.to_string(), cached)
                    }
                    [only] => (only.id.clone(), Some(only.name.clone())),
                    many => {
                        let ids = many
                            .iter()
                            .map(|item| item.id.clone())
                            .collect::<Vec<_>>()
                            .join(", ");
                        anyhow::bail!(
                            "Checklist item name '{}' is ambiguous ({}). Use an explicit item ID.",
                            ident,
                            ids
                        );
                    }
                }
            }
        };

        tracker.link_checklist_item(item_id, item_label);
        let snapshot = tracker.clone();
        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => print_single(
                &serde_json::json!({ "id": id, "tracker": snapshot }),
                ctx.format,
            ),
            OutputFormat::Table => match snapshot.checklist_item_name.as_deref() {
                Some(name) => print_success(&format!(
                    "Linked '{}' to checklist item '{}'",
                    snapshot.title(),
                    name
                )),
                None => print_success(&format!(
                    "Linked '{}' to checklist item {}",
                    snapshot.title(),
                    snapshot.checklist_item_id.as_deref().unwrap_or("-")
                )),
            },
        }

        Ok(())
    }
}

impl UnlinkCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get_mut(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        tracker.unlink_checklist_item();
        let title = tracker.title().to_string();
        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => {
                print_single(&serde_json::json!({ "ok": true, "id": id }), ctx.format)
            }
            OutputFormat::Table => print_success(&format!("Unlinked '{}'", title)),
        }

        Ok(())
    }
}
