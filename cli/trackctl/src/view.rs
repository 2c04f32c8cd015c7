//! Terminal rendering of tracker state.
//!
//! Pure functions from loaded tracker state to text. `show` and `watch`
//! both render through here so the two stay in agreement.

use colored::Colorize;
use runtrack_core::{breakdown_totals, fmt_count, totals, Totals, Tracker, TrackerMap};
use runtrack_id::TrackerId;

const BAR_WIDTH: usize = 20;

/// Render every tracker on the card, separated by blank lines.
pub fn render_board(trackers: &TrackerMap) -> String {
    if trackers.is_empty() {
        return "No trackers on this card.".dimmed().to_string();
    }

    let blocks: Vec<String> = trackers
        .iter()
        .map(|(id, tracker)| render_tracker(id, tracker))
        .collect();
    blocks.join("\n\n")
}

/// Render one tracker block.
pub fn render_tracker(id: &TrackerId, tracker: &Tracker) -> String {
    let mut lines = Vec::new();

    let marker = if tracker.collapsed { "  (collapsed)" } else { "" };
    lines.push(format!(
        "{} {}{}",
        tracker.title().bold(),
        format!("[{id}]").dimmed(),
        marker
    ));
    lines.push(format!("  {}", subtitle(tracker).dimmed()));

    let total = totals(tracker);
    lines.push(format!(
        "  Total {} / {}  {}",
        fmt_count(total.current),
        fmt_count(total.target),
        progress(total)
    ));

    if tracker.collapsed {
        return lines.join("\n");
    }

    if tracker.is_advanced() {
        for breakdown in &tracker.breakdowns {
            let bd = breakdown_totals(breakdown);
            lines.push(format!(
                "  {}  {} / {}",
                breakdown.name.bold(),
                fmt_count(bd.current),
                fmt_count(bd.target)
            ));
            for (jet, count) in &breakdown.jets {
                lines.push(format!(
                    "    {}  {} / {}",
                    jet,
                    fmt_count(count.current),
                    fmt_count(count.target)
                ));
            }
        }
    } else {
        for (jet, count) in &tracker.jets {
            lines.push(format!(
                "  {}  {} / {}",
                jet,
                fmt_count(count.current),
                fmt_count(count.target)
            ));
        }
    }

    lines.join("\n")
}

fn subtitle(tracker: &Tracker) -> String {
    match (&tracker.checklist_item_name, &tracker.checklist_item_id) {
        (Some(name), _) => format!("Linked to: {name}"),
        (None, Some(_)) => "Linked item not found".to_string(),
        (None, None) => "Not linked".to_string(),
    }
}

fn progress(total: Totals) -> String {
    let Some(fraction) = total.fraction() else {
        return String::new();
    };
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(BAR_WIDTH - filled);
    format!("[{bar}] {:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtrack_core::BreakdownDraft;

    fn flat_tracker() -> Tracker {
        let mut tracker = Tracker::new();
        tracker.set_name("Plates");
        tracker.set_flat_targets([
            ("Waterjet 1".to_string(), 5.6),
            ("Waterjet 2".to_string(), 5.6),
            ("Waterjet 3".to_string(), 5.6),
        ]);
        tracker.set_current("Waterjet 1", 3.4);
        tracker
    }

    #[test]
    fn renders_flat_jets_in_order() {
        let id = TrackerId::new();
        let rendered = render_tracker(&id, &flat_tracker());
        let one = rendered.find("Waterjet 1").unwrap();
        let two = rendered.find("Waterjet 2").unwrap();
        let three = rendered.find("Waterjet 3").unwrap();
        assert!(one < two && two < three);
        assert!(rendered.contains("3.4 / 5.6"));
        assert!(rendered.contains("Not linked"));
    }

    #[test]
    fn collapsed_hides_jet_rows() {
        let id = TrackerId::new();
        let mut tracker = flat_tracker();
        tracker.collapsed = true;
        let rendered = render_tracker(&id, &tracker);
        assert!(rendered.contains("(collapsed)"));
        assert!(rendered.contains("Total"));
        assert!(!rendered.contains("Waterjet 1  "));
    }

    #[test]
    fn advanced_lists_breakdowns_with_their_jets() {
        let id = TrackerId::new();
        let mut tracker = Tracker::new();
        tracker.set_name("Plates");
        tracker.set_breakdowns(vec![
            BreakdownDraft {
                id: None,
                name: "Rough cut".to_string(),
                total_target: 12.0,
                jets: vec![("Waterjet 1".to_string(), 6.0), ("Waterjet 2".to_string(), 6.0)],
            },
            BreakdownDraft {
                id: None,
                name: "Finish".to_string(),
                total_target: 0.0,
                jets: vec![("Waterjet 3".to_string(), 4.0)],
            },
        ]);
        let rendered = render_tracker(&id, &tracker);
        assert!(rendered.contains("Rough cut"));
        assert!(rendered.contains("Finish"));
        let rough = rendered.find("Rough cut").unwrap();
        let jet_one = rendered.find("Waterjet 1").unwrap();
        assert!(rough < jet_one);
    }

    #[test]
    fn subtitle_reports_link_state() {
        let mut tracker = Tracker::new();
        assert_eq!(subtitle(&tracker), "Not linked");
        tracker.link_checklist_item("abc123".to_string(), None);
        assert_eq!(subtitle(&tracker), "Linked item not found");
        tracker.link_checklist_item("abc123".to_string(), Some("Cut plates".to_string()));
        assert_eq!(subtitle(&tracker), "Linked to: Cut plates");
    }

    #[test]
    fn progress_shows_true_percent_past_full() {
        let bar = progress(Totals {
            current: 25.0,
            target: 20.0,
        });
        assert!(bar.contains("125%"));
    }

    #[test]
    fn progress_empty_without_target() {
        let bar = progress(Totals {
            current: 3.0,
            target: 0.0,
        });
        assert!(bar.is_empty());
    }

    #[test]
    fn empty_board_has_placeholder() {
        let trackers = TrackerMap::new();
        assert!(render_board(&trackers).contains("No trackers"));
    }
}
