//! Show command (one tracker in full).

use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::output::{print_single, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::CommandContext;

/// Show command - render one tracker with its jets and breakdowns.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Tracker ID or name.
    tracker: String,
}

impl ShowCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        match ctx.format {
            OutputFormat::Json => print_single(
                &serde_json::json!({ "id": id, "tracker": tracker }),
                ctx.format,
            ),
            OutputFormat::Table => println!("{}", crate::view::render_tracker(&id, tracker)),
        }

        Ok(())
    }
}
