//! List command (trackers on the card).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use runtrack_core::{fmt_count, totals, TrackerMap};

use crate::output::{print_output, print_single, OutputFormat};

use super::CommandContext;

/// List command - list trackers on the working card.
#[derive(Debug, Args)]
pub struct ListCommand {}

#[derive(Debug, Clone, Serialize, Tabled)]
struct TrackerRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Mode")]
    mode: String,

    #[tabled(rename = "Current")]
    current: String,

    #[tabled(rename = "Target")]
    target: String,

    #[tabled(rename = "Linked")]
    linked: String,
}

fn display_option(opt: &Option<String>) -> String {
    opt.as_deref().unwrap_or("-").to_string()
}

fn rows(trackers: &TrackerMap) -> Vec<TrackerRow> {
    trackers
        .iter()
        .map(|(id, tracker)| {
            let total = totals(tracker);
            TrackerRow {
                id: id.to_string(),
                name: tracker.title().to_string(),
                mode: if tracker.is_advanced() {
                    format!("breakdowns ({})", tracker.breakdowns.len())
                } else {
                    format!("jets ({})", tracker.jets.len())
                },
                current: fmt_count(total.current),
                target: fmt_count(total.target),
                linked: display_option(&tracker.checklist_item_name),
            }
        })
        .collect()
}

impl ListCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let store = ctx.store()?;
        let trackers = store.load_all().await;

        match ctx.format {
            OutputFormat::Table => print_output(&rows(&trackers), ctx.format),
            OutputFormat::Json => print_single(&trackers, ctx.format),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtrack_core::Tracker;
    use runtrack_id::TrackerId;

    #[test]
    fn rows_summarize_mode_and_totals() {
        let mut trackers = TrackerMap::new();
        let mut tracker = Tracker::new();
        tracker.set_name("Plates");
        tracker.set_flat_targets([
            ("Waterjet 1".to_string(), 5.0),
            ("Waterjet 2".to_string(), 5.0),
        ]);
        tracker.set_current("Waterjet 1", 2.5);
        trackers.insert(TrackerId::new(), tracker);

        let rows = rows(&trackers);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Plates");
        assert_eq!(rows[0].mode, "jets (2)");
        assert_eq!(rows[0].current, "2.5");
        assert_eq!(rows[0].target, "10");
        assert_eq!(rows[0].linked, "-");
    }
}
