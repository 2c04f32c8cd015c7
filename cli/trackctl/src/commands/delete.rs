//! Delete command (remove a tracker from the card).

use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::CommandContext;

/// Delete command - remove one tracker and its tallies.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Tracker ID or name.
    tracker: String,
}

impl DeleteCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let removed = trackers
            .remove(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => {
                print_single(&serde_json::json!({ "ok": true, "id": id }), ctx.format)
            }
            OutputFormat::Table => {
                print_success(&format!("Deleted tracker '{}' ({})", removed.title(), id))
            }
        }

        Ok(())
    }
}
