//! Schema normalization for stored tracker records.
//!
//! The storage key has accumulated several historical record shapes: jets as
//! a list instead of a map, `max` for `target`, `totalMax` for `totalTarget`,
//! `checkItemId` for `checklistItemId`, and breakdowns without ids. Loading
//! lifts any of them into the current schema.
//!
//! Invariants:
//! - Normalization is pure and idempotent; normalizing an already-current
//!   record changes nothing.
//! - Values present in the input are never altered, only renamed or moved;
//!   when a current and a legacy spelling both appear, the current one wins.
//! - Derived fields from old revisions (`totalCurrent`) are dropped, never
//!   migrated.

use std::collections::BTreeMap;

use runtrack_id::BreakdownId;
use serde::Deserialize;

use crate::model::{Breakdown, JetCount, JetMap, Tracker};

/// Jet tally as found in a stored blob, either spelling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJetCount {
    pub current: Option<f64>,
    pub target: Option<f64>,
    /// Legacy spelling of `target`.
    pub max: Option<f64>,
}

/// A jet entry from the legacy list shape, name inline.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamedJet {
    pub name: Option<String>,
    #[serde(flatten)]
    pub count: RawJetCount,
}

/// Jets as found in a stored blob: the current keyed map, or the legacy list
/// of named entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawJets {
    Map(BTreeMap<String, RawJetCount>),
    List(Vec<RawNamedJet>),
}

/// Breakdown as found in a stored blob. Early revisions omitted ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBreakdown {
    pub id: Option<String>,
    pub name: Option<String>,
    pub total_target: Option<f64>,
    pub jets: Option<RawJets>,
}

/// Tracker record as found in a stored blob, covering every shape the key
/// has ever held. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTracker {
    /// Embedded id from the legacy list-of-trackers store shape; the keyed
    /// map shape carries the id outside the record.
    pub id: Option<String>,
    pub name: Option<String>,
    pub checklist_item_id: Option<String>,
    /// Legacy spelling of `checklist_item_id`.
    pub check_item_id: Option<String>,
    pub checklist_item_name: Option<String>,
    pub total_target: Option<f64>,
    /// Legacy spelling of `total_target`.
    pub total_max: Option<f64>,
    pub auto_split: Option<bool>,
    pub collapsed: Option<bool>,
    pub jets: Option<RawJets>,
    pub breakdowns: Option<Vec<RawBreakdown>>,
}

fn normalize_jet(raw: &RawJetCount) -> JetCount {
    JetCount {
        current: raw.current.unwrap_or(0.0),
        target: raw.target.or(raw.max).unwrap_or(0.0),
    }
}

fn normalize_jets(raw: Option<RawJets>) -> JetMap {
    match raw {
        None => JetMap::new(),
        Some(RawJets::Map(map)) => map
            .iter()
            .map(|(name, count)| (name.clone(), normalize_jet(count)))
            .collect(),
        Some(RawJets::List(list)) => {
            let mut jets = JetMap::new();
            for entry in &list {
                let Some(name) = entry.name.as_deref() else {
                    continue;
                };
                // Duplicate names collapse to the last entry, matching how
                // the list shape was originally folded into a map.
                jets.insert(name.to_string(), normalize_jet(&entry.count));
            }
            jets
        }
    }
}

fn normalize_breakdown(raw: RawBreakdown) -> Breakdown {
    let id = raw
        .id
        .as_deref()
        .and_then(|s| BreakdownId::parse(s).ok())
        .unwrap_or_default();
    Breakdown {
        id,
        name: raw.name.unwrap_or_default(),
        total_target: raw.total_target.unwrap_or(0.0),
        jets: normalize_jets(raw.jets),
    }
}

/// Lifts a stored record of any historical shape into the current schema.
#[must_use]
pub fn normalize(raw: RawTracker) -> Tracker {
    Tracker {
        name: raw.name,
        checklist_item_id: raw.checklist_item_id.or(raw.check_item_id),
        checklist_item_name: raw.checklist_item_name,
        total_target: raw.total_target.or(raw.total_max).unwrap_or(0.0),
        auto_split: raw.auto_split.unwrap_or(false),
        collapsed: raw.collapsed.unwrap_or(false),
        jets: normalize_jets(raw.jets),
        breakdowns: raw
            .breakdowns
            .unwrap_or_default()
            .into_iter()
            .map(normalize_breakdown)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize_value(value: serde_json::Value) -> Tracker {
        normalize(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_normalize_legacy_list_record() {
        let tracker = normalize_value(json!({
            "name": "Legacy",
            "totalMax": 12,
            "checkItemId": "abc123",
            "jets": [
                { "name": "Waterjet 1", "current": 2, "max": 6 },
                { "name": "Waterjet 2", "current": 1 }
            ]
        }));

        assert_eq!(tracker.name.as_deref(), Some("Legacy"));
        assert_eq!(tracker.total_target, 12.0);
        assert_eq!(tracker.checklist_item_id.as_deref(), Some("abc123"));
        assert_eq!(tracker.checklist_item_name, None);
        assert!(!tracker.auto_split);
        assert!(!tracker.collapsed);
        assert!(tracker.breakdowns.is_empty());

        assert_eq!(tracker.jets.len(), 2);
        assert_eq!(
            tracker.jets["Waterjet 1"],
            JetCount {
                current: 2.0,
                target: 6.0
            }
        );
        assert_eq!(
            tracker.jets["Waterjet 2"],
            JetCount {
                current: 1.0,
                target: 0.0
            }
        );
    }

    #[test]
    fn test_normalize_current_shape_passes_through() {
        let tracker = normalize_value(json!({
            "name": "Plates",
            "checklistItemId": "chk9",
            "checklistItemName": "Cut plates",
            "totalTarget": 10,
            "autoSplit": true,
            "collapsed": true,
            "jets": { "Waterjet 1": { "current": 3.4, "target": 5 } },
            "breakdowns": []
        }));

        assert_eq!(tracker.total_target, 10.0);
        assert!(tracker.auto_split);
        assert!(tracker.collapsed);
        assert_eq!(tracker.checklist_item_name.as_deref(), Some("Cut plates"));
        assert_eq!(tracker.jets["Waterjet 1"].current, 3.4);
    }

    #[test]
    fn test_current_spelling_wins_over_legacy() {
        // A zero in the current spelling still beats a nonzero legacy value;
        // presence decides, not truthiness.
        let tracker = normalize_value(json!({
            "totalTarget": 0,
            "totalMax": 7,
            "checklistItemId": "new",
            "checkItemId": "old",
            "jets": { "Waterjet 1": { "target": 0, "max": 9 } }
        }));

        assert_eq!(tracker.total_target, 0.0);
        assert_eq!(tracker.checklist_item_id.as_deref(), Some("new"));
        assert_eq!(tracker.jets["Waterjet 1"].target, 0.0);
    }

    #[test]
    fn test_normalize_drops_derived_total() {
        let tracker = normalize_value(json!({
            "totalCurrent": 99,
            "jets": { "Waterjet 1": { "current": 1, "target": 2 } }
        }));

        let value = serde_json::to_value(&tracker).unwrap();
        assert!(value.get("totalCurrent").is_none());
    }

    #[test]
    fn test_normalize_breakdown_fills_missing_fields() {
        let tracker = normalize_value(json!({
            "breakdowns": [
                { "jets": { "Waterjet 2": { "current": 1 } } },
                { "id": "bd_9e1f20c4", "name": "Lids", "totalTarget": 4 }
            ]
        }));

        assert_eq!(tracker.breakdowns.len(), 2);

        let first = &tracker.breakdowns[0];
        assert!(first.id.as_str().starts_with("bd_"));
        assert_eq!(first.name, "");
        assert_eq!(first.total_target, 0.0);
        assert_eq!(first.jets["Waterjet 2"].target, 0.0);

        let second = &tracker.breakdowns[1];
        assert_eq!(second.id.as_str(), "bd_9e1f20c4");
        assert_eq!(second.name, "Lids");
        assert_eq!(second.total_target, 4.0);
        assert!(second.jets.is_empty());
    }

    #[test]
    fn test_normalize_regenerates_malformed_breakdown_id() {
        let tracker = normalize_value(json!({
            "breakdowns": [{ "id": "not-a-breakdown-id", "name": "Lids" }]
        }));
        assert!(tracker.breakdowns[0].id.as_str().starts_with("bd_"));
        assert_ne!(tracker.breakdowns[0].id.as_str(), "not-a-breakdown-id");
    }

    #[test]
    fn test_legacy_list_duplicate_names_last_wins() {
        let tracker = normalize_value(json!({
            "jets": [
                { "name": "Waterjet 1", "current": 1, "target": 2 },
                { "name": "Waterjet 1", "current": 5, "target": 6 }
            ]
        }));

        assert_eq!(tracker.jets.len(), 1);
        assert_eq!(tracker.jets["Waterjet 1"].current, 5.0);
        assert_eq!(tracker.jets["Waterjet 1"].target, 6.0);
    }

    #[test]
    fn test_legacy_list_entry_without_name_is_skipped() {
        let tracker = normalize_value(json!({
            "jets": [
                { "current": 9, "target": 9 },
                { "name": "Waterjet 3", "current": 1 }
            ]
        }));

        assert_eq!(tracker.jets.len(), 1);
        assert!(tracker.jets.contains_key("Waterjet 3"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_value(json!({
            "name": "Legacy",
            "totalMax": 12,
            "checkItemId": "abc123",
            "jets": [{ "name": "Waterjet 1", "current": 2, "max": 6 }],
            "breakdowns": [{ "name": "Lids", "jets": { "Waterjet 1": { "max": 3 } } }]
        }));

        // Feed the normalized record back through the raw shapes.
        let twice = normalize_value(serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty_record() {
        let tracker = normalize_value(json!({}));
        assert_eq!(tracker.name, None);
        assert_eq!(tracker.total_target, 0.0);
        assert!(!tracker.auto_split);
        assert!(tracker.jets.is_empty());
        assert!(tracker.breakdowns.is_empty());
    }
}
