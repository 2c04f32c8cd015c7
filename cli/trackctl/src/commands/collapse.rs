//! Collapse command (toggle a tracker's collapsed state in the board view).

use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::CommandContext;

/// Collapse command - collapse or expand one tracker.
#[derive(Debug, Args)]
pub struct CollapseCommand {
    /// Tracker ID or name.
    tracker: String,
}

impl CollapseCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get_mut(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        let collapsed = tracker.toggle_collapsed();
        let title = tracker.title().to_string();
        store.save_all(&trackers).await.map_err(CliError::Storage)?;

        match ctx.format {
            OutputFormat::Json => print_single(
                &serde_json::json!({ "ok": true, "id": id, "collapsed": collapsed }),
                ctx.format,
            ),
            OutputFormat::Table => {
                let verb = if collapsed { "Collapsed" } else { "Expanded" };
                print_success(&format!("{} '{}'", verb, title));
            }
        }

        Ok(())
    }
}
