//! Split command (divide totals across jets in tenth steps).

use anyhow::Result;
use clap::Args;

use runtrack_core::{auto_split, validate};

use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};
use crate::resolve::resolve_tracker_id;

use super::CommandContext;

/// Split command - divide the tracker's total across its jets.
///
/// Flat trackers split the tracker total. Trackers with breakdowns split each
/// breakdown's own total instead.
#[derive(Debug, Args)]
pub struct SplitCommand {
    /// Tracker ID or name.
    tracker: String,

    /// Set the tracker's total target before splitting.
    #[arg(long)]
    total: Option<f64>,
}

impl SplitCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let mut trackers = store.load_all().await;

        let id = resolve_tracker_id(&trackers, &self.tracker)?;
        let tracker = trackers
            .get_mut(&id)
            .ok_or_else(|| CliError::NotFound(format!("Tracker '{}' not found", self.tracker)))?;

        if let Some(total) = self.total {
            tracker.set_total_target(total);
        }

        auto_split(tracker).map_err(CliError::Validation)?;
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
                print_success(&format!("Split targets for '{}'", snapshot.title()));
                println!("{rendered}");
            }
        }

        Ok(())
    }
}
