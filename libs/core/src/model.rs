//! Tracker record model.
//!
//! These shapes mirror the JSON blob the host keeps per card, camelCase keys
//! included. A card stores one [`TrackerMap`] under a fixed storage key; each
//! tracker either carries flat per-jet targets or a list of breakdowns, never
//! both.

use std::collections::BTreeMap;

use runtrack_id::{BreakdownId, TrackerId};
use serde::{Deserialize, Serialize};

use crate::round::{clamp_number, round3};

/// Jet tallies keyed by jet name, sorted for stable iteration.
pub type JetMap = BTreeMap<String, JetCount>;

/// All trackers on a card, keyed by tracker id.
pub type TrackerMap = BTreeMap<TrackerId, Tracker>;

/// Running tally and goal for a single jet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JetCount {
    pub current: f64,
    pub target: f64,
}

impl JetCount {
    /// A zeroed tally, used when a jet is first selected.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// A named sub-allocation with its own total and jet targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub id: BreakdownId,
    pub name: String,
    pub total_target: f64,
    pub jets: JetMap,
}

impl Breakdown {
    /// Creates a breakdown with zeroed tallies for the given jets.
    #[must_use]
    pub fn new(name: impl Into<String>, jets: &[String]) -> Self {
        Self {
            id: BreakdownId::new(),
            name: name.into(),
            total_target: 0.0,
            jets: jets
                .iter()
                .map(|j| (j.clone(), JetCount::zero()))
                .collect(),
        }
    }

    /// Toggles a jet's membership and returns whether it is now present.
    ///
    /// Removing the last jet immediately re-adds it zeroed; a breakdown never
    /// ends up with an empty jet set through this operation.
    pub fn toggle_jet(&mut self, jet: &str) -> bool {
        if self.jets.remove(jet).is_some() {
            if self.jets.is_empty() {
                self.jets.insert(jet.to_string(), JetCount::zero());
                return true;
            }
            false
        } else {
            self.jets.insert(jet.to_string(), JetCount::zero());
            true
        }
    }

    /// Sets the breakdown's own total, coerced and rounded.
    pub fn set_total_target(&mut self, total: f64) {
        self.total_target = round3(clamp_number(total));
    }
}

/// Requested state for one breakdown when (re)building a tracker's breakdown
/// list, as read from an edit surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownDraft {
    /// Existing id to keep, or `None` for a fresh breakdown.
    pub id: Option<BreakdownId>,
    pub name: String,
    pub total_target: f64,
    /// Selected jets with their requested targets.
    pub jets: Vec<(String, f64)>,
}

/// One run-count goal attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    pub name: Option<String>,
    /// Id of the linked checklist item, if any.
    pub checklist_item_id: Option<String>,
    /// Cached display name of the linked item, refreshed whenever the item
    /// list is available at save time.
    pub checklist_item_name: Option<String>,
    pub total_target: f64,
    pub auto_split: bool,
    pub collapsed: bool,
    /// Flat per-jet tallies; empty whenever breakdowns are present.
    pub jets: JetMap,
    /// Sub-allocations; empty in flat mode.
    pub breakdowns: Vec<Breakdown>,
}

impl Tracker {
    /// Creates an empty tracker with the defaults a fresh edit surface shows.
    ///
    /// Auto-split starts enabled for new trackers; records loaded from
    /// storage default it to off when the field is absent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            checklist_item_id: None,
            checklist_item_name: None,
            total_target: 0.0,
            auto_split: true,
            collapsed: false,
            jets: JetMap::new(),
            breakdowns: Vec::new(),
        }
    }

    /// Display title, falling back to a generic label for unnamed trackers.
    /// Blank names count as unnamed; legacy records can carry empty strings.
    #[must_use]
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Run Tracker",
        }
    }

    /// Whether this tracker is in breakdown mode.
    #[must_use]
    pub fn is_advanced(&self) -> bool {
        !self.breakdowns.is_empty()
    }

    /// Sets the display name; blank input clears it.
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Sets the tracker's own total, coerced and rounded.
    pub fn set_total_target(&mut self, total: f64) {
        self.total_target = round3(clamp_number(total));
    }

    /// Replaces the flat jet selection, keeping each surviving jet's current
    /// tally and switching the tracker out of breakdown mode.
    pub fn set_flat_targets<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut jets = JetMap::new();
        for (name, target) in targets {
            let current = self
                .jets
                .get(&name)
                .map(|j| round3(j.current))
                .unwrap_or(0.0);
            jets.insert(
                name,
                JetCount {
                    current,
                    target: round3(target),
                },
            );
        }
        self.jets = jets;
        self.breakdowns.clear();
    }

    /// Replaces the breakdown list from edit-surface drafts, keeping current
    /// tallies per (breakdown id, jet name) and switching out of flat mode.
    pub fn set_breakdowns(&mut self, drafts: Vec<BreakdownDraft>) {
        let previous = std::mem::take(&mut self.breakdowns);
        let mut breakdowns = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = draft.id.unwrap_or_default();
            let kept = previous.iter().find(|b| b.id == id);
            let mut jets = JetMap::new();
            for (jet, target) in draft.jets {
                let current = kept
                    .and_then(|b| b.jets.get(&jet))
                    .map(|j| round3(j.current))
                    .unwrap_or(0.0);
                jets.insert(
                    jet,
                    JetCount {
                        current,
                        target: round3(target),
                    },
                );
            }
            breakdowns.push(Breakdown {
                id,
                name: draft.name.trim().to_string(),
                total_target: round3(clamp_number(draft.total_target)),
                jets,
            });
        }
        self.breakdowns = breakdowns;
        self.jets.clear();
    }

    /// Appends a fresh breakdown seeded with zeroed jets and switches the
    /// tracker into breakdown mode. Returns the new breakdown's id.
    pub fn push_breakdown(&mut self, name: impl Into<String>, jets: &[String]) -> BreakdownId {
        let breakdown = Breakdown::new(name, jets);
        let id = breakdown.id.clone();
        self.breakdowns.push(breakdown);
        self.jets.clear();
        id
    }

    /// Removes a breakdown by id. Returns whether it was present.
    pub fn remove_breakdown(&mut self, id: &BreakdownId) -> bool {
        let before = self.breakdowns.len();
        self.breakdowns.retain(|b| &b.id != id);
        self.breakdowns.len() != before
    }

    /// Looks up a breakdown for in-place edits.
    pub fn breakdown_mut(&mut self, id: &BreakdownId) -> Option<&mut Breakdown> {
        self.breakdowns.iter_mut().find(|b| &b.id == id)
    }

    /// Overwrites a flat jet's current tally. Returns whether the jet exists.
    pub fn set_current(&mut self, jet: &str, value: f64) -> bool {
        match self.jets.get_mut(jet) {
            Some(count) => {
                count.current = round3(clamp_number(value));
                true
            }
            None => false,
        }
    }

    /// Adds a delta to a flat jet's current tally. Returns whether the jet
    /// exists.
    pub fn add_current(&mut self, jet: &str, delta: f64) -> bool {
        match self.jets.get_mut(jet) {
            Some(count) => {
                count.current = round3(count.current + clamp_number(delta));
                true
            }
            None => false,
        }
    }

    /// Overwrites a breakdown jet's current tally. Returns whether both the
    /// breakdown and the jet exist.
    pub fn set_breakdown_current(&mut self, id: &BreakdownId, jet: &str, value: f64) -> bool {
        match self.breakdown_mut(id).and_then(|b| b.jets.get_mut(jet)) {
            Some(count) => {
                count.current = round3(clamp_number(value));
                true
            }
            None => false,
        }
    }

    /// Adds a delta to a breakdown jet's current tally.
    pub fn add_breakdown_current(&mut self, id: &BreakdownId, jet: &str, delta: f64) -> bool {
        match self.breakdown_mut(id).and_then(|b| b.jets.get_mut(jet)) {
            Some(count) => {
                count.current = round3(count.current + clamp_number(delta));
                true
            }
            None => false,
        }
    }

    /// Links a checklist item, caching its display name when known.
    pub fn link_checklist_item(&mut self, id: String, name: Option<String>) {
        self.checklist_item_id = Some(id);
        self.checklist_item_name = name;
    }

    /// Clears the checklist link and the cached name.
    pub fn unlink_checklist_item(&mut self) {
        self.checklist_item_id = None;
        self.checklist_item_name = None;
    }

    /// Flips the collapsed flag and returns the new state.
    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jets(entries: &[(&str, f64, f64)]) -> JetMap {
        entries
            .iter()
            .map(|(name, current, target)| {
                (
                    name.to_string(),
                    JetCount {
                        current: *current,
                        target: *target,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_new_tracker_defaults() {
        let tracker = Tracker::new();
        assert!(tracker.auto_split);
        assert!(!tracker.collapsed);
        assert!(tracker.jets.is_empty());
        assert!(tracker.breakdowns.is_empty());
        assert_eq!(tracker.title(), "Run Tracker");
    }

    #[test]
    fn test_set_name_blank_clears() {
        let mut tracker = Tracker::new();
        tracker.set_name("  Batch 42  ");
        assert_eq!(tracker.name.as_deref(), Some("Batch 42"));
        tracker.set_name("   ");
        assert_eq!(tracker.name, None);
    }

    #[test]
    fn test_set_flat_targets_preserves_current_by_name() {
        let mut tracker = Tracker::new();
        tracker.jets = jets(&[("Waterjet 1", 4.5, 10.0), ("Waterjet 2", 2.0, 10.0)]);

        tracker.set_flat_targets(vec![
            ("Waterjet 1".to_string(), 6.0),
            ("Waterjet 3".to_string(), 6.0),
        ]);

        assert_eq!(tracker.jets.len(), 2);
        assert_eq!(tracker.jets["Waterjet 1"].current, 4.5);
        assert_eq!(tracker.jets["Waterjet 1"].target, 6.0);
        assert_eq!(tracker.jets["Waterjet 3"].current, 0.0);
        assert!(!tracker.jets.contains_key("Waterjet 2"));
    }

    #[test]
    fn test_set_flat_targets_exits_breakdown_mode() {
        let mut tracker = Tracker::new();
        tracker.push_breakdown("Lids", &["Waterjet 1".to_string()]);
        assert!(tracker.is_advanced());

        tracker.set_flat_targets(vec![("Waterjet 1".to_string(), 3.0)]);
        assert!(!tracker.is_advanced());
        assert_eq!(tracker.jets.len(), 1);
    }

    #[test]
    fn test_set_breakdowns_preserves_current_per_id_and_jet() {
        let mut tracker = Tracker::new();
        let id = tracker.push_breakdown("Lids", &["Waterjet 1".to_string()]);
        tracker.add_breakdown_current(&id, "Waterjet 1", 2.5);

        tracker.set_breakdowns(vec![BreakdownDraft {
            id: Some(id.clone()),
            name: "Lids".to_string(),
            total_target: 12.0,
            jets: vec![("Waterjet 1".to_string(), 6.0), ("Waterjet 2".to_string(), 6.0)],
        }]);

        let bd = &tracker.breakdowns[0];
        assert_eq!(bd.id, id);
        assert_eq!(bd.jets["Waterjet 1"].current, 2.5);
        assert_eq!(bd.jets["Waterjet 1"].target, 6.0);
        assert_eq!(bd.jets["Waterjet 2"].current, 0.0);
    }

    #[test]
    fn test_set_breakdowns_fresh_draft_gets_new_id() {
        let mut tracker = Tracker::new();
        tracker.set_breakdowns(vec![BreakdownDraft {
            id: None,
            name: "Bases".to_string(),
            total_target: 8.0,
            jets: vec![("Waterjet 2".to_string(), 8.0)],
        }]);

        assert_eq!(tracker.breakdowns.len(), 1);
        assert!(tracker.breakdowns[0].id.as_str().starts_with("bd_"));
        assert!(tracker.jets.is_empty());
    }

    #[test]
    fn test_toggle_jet_keeps_last_jet() {
        let mut bd = Breakdown::new("Lids", &["Waterjet 1".to_string()]);
        bd.jets.get_mut("Waterjet 1").unwrap().current = 3.0;

        // Removing the only jet re-adds it zeroed.
        assert!(bd.toggle_jet("Waterjet 1"));
        assert_eq!(bd.jets["Waterjet 1"], JetCount::zero());

        assert!(bd.toggle_jet("Waterjet 2"));
        assert!(!bd.toggle_jet("Waterjet 1"));
        assert_eq!(bd.jets.len(), 1);
    }

    #[test]
    fn test_set_current_unknown_jet() {
        let mut tracker = Tracker::new();
        tracker.jets = jets(&[("Waterjet 1", 0.0, 5.0)]);
        assert!(!tracker.set_current("Waterjet 9", 2.0));
        assert!(tracker.set_current("Waterjet 1", 2.0));
        assert_eq!(tracker.jets["Waterjet 1"].current, 2.0);
    }

    #[test]
    fn test_add_current_rounds_float_noise() {
        let mut tracker = Tracker::new();
        tracker.jets = jets(&[("Waterjet 1", 0.1, 5.0)]);
        assert!(tracker.add_current("Waterjet 1", 0.2));
        assert_eq!(tracker.jets["Waterjet 1"].current, 0.3);
    }

    #[test]
    fn test_push_and_remove_breakdown() {
        let mut tracker = Tracker::new();
        tracker.jets = jets(&[("Waterjet 1", 1.0, 5.0)]);

        let id = tracker.push_breakdown("Lids", &["Waterjet 1".to_string()]);
        assert!(tracker.jets.is_empty());
        assert!(tracker.is_advanced());

        assert!(tracker.remove_breakdown(&id));
        assert!(!tracker.remove_breakdown(&id));
        assert!(!tracker.is_advanced());
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let mut tracker = Tracker::new();
        tracker.set_name("Plates");
        tracker.jets = jets(&[("Waterjet 1", 1.5, 4.0)]);
        tracker.total_target = 4.0;

        let value = serde_json::to_value(&tracker).unwrap();
        assert_eq!(value["totalTarget"], 4.0);
        assert_eq!(value["autoSplit"], true);
        assert!(value["checklistItemId"].is_null());
        assert!(value["checklistItemName"].is_null());
        assert_eq!(value["jets"]["Waterjet 1"]["current"], 1.5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut tracker = Tracker::new();
        tracker.set_name("Plates");
        let id = tracker.push_breakdown("Lids", &["Waterjet 2".to_string()]);
        tracker.breakdown_mut(&id).unwrap().set_total_target(7.2);

        let json = serde_json::to_string(&tracker).unwrap();
        let parsed: Tracker = serde_json::from_str(&json).unwrap();
        assert_eq!(tracker, parsed);
    }
}
