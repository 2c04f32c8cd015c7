//! End-to-end happy path test.
//!
//! This test drives the full tracker lifecycle against file-backed card
//! storage, verifying:
//!
//! 1. Jet preselection from the card's Machine(s) custom field
//! 2. Flat tracker creation with an auto-split total
//! 3. Persistence roundtrip and run-count tallies
//! 4. Checklist linking from the card snapshot
//! 5. Switching to breakdowns, each splitting its own total
//! 6. Legacy storage blob upgrade on load
//! 7. Deletion leaving the card empty
//!
//! ## Running
//!
//! ```bash
//! cargo test -p runtrack-e2e --test happy_path
//! ```

use runtrack_core::{auto_split, default_jets, totals, validate, BreakdownDraft, Tracker, TrackerMap};
use runtrack_id::TrackerId;
use runtrack_store::{
    CardStorage, ChecklistSource, FileStorage, SnapshotChecklist, TrackerStore, STORAGE_KEY,
};
use serde_json::json;
use tracing::info;

/// Card snapshot as the host exports it: a Machine(s) dropdown naming two
/// jets, and one checklist with two items.
fn card_snapshot() -> serde_json::Value {
    json!({
        "id": "c4rd5n4p",
        "name": "Order 4471 - stainless plates",
        "customFields": [{
            "id": "cf_machines",
            "name": "Machine(s)",
            "options": [
                { "id": "opt_12", "value": { "text": "Waterjet #1 & #2" } },
                { "id": "opt_3", "value": { "text": "Waterjet #3" } }
            ]
        }],
        "customFieldItems": [{ "idCustomField": "cf_machines", "idValue": "opt_12" }],
        "checklists": [{
            "name": "Cutting",
            "checkItems": [
                { "id": "5f8a1c2d", "name": "Cut plates" },
                { "id": "5f8a1c2e", "name": "Deburr edges" }
            ]
        }]
    })
}

/// E2E happy path covering the complete tracker flow:
/// create, split, tally, link, restructure, upgrade, delete.
#[tokio::test]
async fn e2e_happy_path_create_to_delete() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,runtrack_store=debug".into()),
        )
        .with_test_writer()
        .try_init();

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("c4rd5n4p.json");
    let store = TrackerStore::new(FileStorage::new(&path));
    let card = card_snapshot();

    // Jet preselection from the card's custom field.
    let jets = default_jets(Some(&card));
    assert_eq!(
        jets,
        vec!["Waterjet 1".to_string(), "Waterjet 2".to_string()],
        "Machine(s) dropdown should preselect jets 1 and 2"
    );

    // Create a flat tracker and auto-split its total across the jets.
    info!("creating tracker");
    let mut tracker = Tracker::new();
    tracker.set_name("Plates");
    tracker.set_flat_targets(jets.iter().map(|jet| (jet.clone(), 0.0)));
    tracker.set_total_target(16.9);
    auto_split(&mut tracker).expect("auto-split failed");
    assert_eq!(tracker.jets["Waterjet 1"].target, 8.5);
    assert_eq!(tracker.jets["Waterjet 2"].target, 8.4);
    assert_eq!(tracker.total_target, 16.9);
    validate(&tracker).expect("tracker should validate");

    let id = TrackerId::new();
    let mut map = TrackerMap::new();
    map.insert(id.clone(), tracker);
    store.save_all(&map).await.expect("save failed");

    // Reload and tally run counts.
    let mut map = store.load_all().await;
    assert_eq!(map.len(), 1);
    let tracker = map.get_mut(&id).expect("tracker lost on reload");
    assert_eq!(tracker.title(), "Plates");

    assert!(tracker.add_current("Waterjet 1", 0.1));
    assert!(tracker.add_current("Waterjet 1", 0.2));
    assert_eq!(
        tracker.jets["Waterjet 1"].current, 0.3,
        "tallies must not accumulate float noise"
    );
    assert!(tracker.set_current("Waterjet 2", 4.0));
    assert!(
        !tracker.set_current("Waterjet 3", 1.0),
        "unselected jet must be refused"
    );

    let t = totals(tracker);
    assert_eq!(t.current, 4.3);
    assert_eq!(t.target, 16.9);

    // Link the checklist item the snapshot offers.
    let source = SnapshotChecklist::new(card.clone());
    let items = source.list_items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Cut plates");
    assert_eq!(items[0].checklist_name, "Cutting");

    tracker.link_checklist_item(items[0].id.clone(), Some(items[0].name.clone()));
    store.save_all(&map).await.expect("save failed");

    // Switch to breakdowns; each splits its own total.
    info!("switching tracker to breakdowns");
    let mut map = store.load_all().await;
    let tracker = map.get_mut(&id).expect("tracker lost on reload");
    assert_eq!(tracker.checklist_item_name.as_deref(), Some("Cut plates"));

    tracker.set_breakdowns(vec![
        BreakdownDraft {
            id: None,
            name: "Rough cut".to_string(),
            total_target: 10.0,
            jets: vec![
                ("Waterjet 1".to_string(), 0.0),
                ("Waterjet 2".to_string(), 0.0),
                ("Waterjet 3".to_string(), 0.0),
            ],
        },
        BreakdownDraft {
            id: None,
            name: "Finish pass".to_string(),
            total_target: 6.8,
            jets: vec![("Waterjet 3".to_string(), 0.0)],
        },
    ]);
    tracker.set_total_target(0.0);
    auto_split(tracker).expect("auto-split failed");
    validate(tracker).expect("tracker should validate");

    let rough = &tracker.breakdowns[0];
    assert_eq!(rough.jets["Waterjet 1"].target, 3.4);
    assert_eq!(rough.jets["Waterjet 2"].target, 3.3);
    assert_eq!(rough.jets["Waterjet 3"].target, 3.3);
    let finish = &tracker.breakdowns[1];
    assert_eq!(finish.jets["Waterjet 3"].target, 6.8);

    let rough_id = tracker.breakdowns[0].id.clone();
    assert!(tracker.add_breakdown_current(&rough_id, "Waterjet 1", 1.5));

    let t = totals(tracker);
    assert_eq!(t.current, 1.5);
    // No explicit tracker total, so the targets sum across breakdowns.
    assert_eq!(t.target, 16.8);

    store.save_all(&map).await.expect("save failed");

    // The stored blob is the current keyed-map shape with camelCase fields.
    let raw = FileStorage::new(&path)
        .get(STORAGE_KEY)
        .await
        .expect("raw read failed")
        .expect("storage key unset");
    assert!(raw.get("trackers").is_none(), "store writes the keyed-map shape");
    let record = &raw[id.as_str()];
    assert_eq!(record["checklistItemId"], "5f8a1c2d");
    assert_eq!(record["breakdowns"][0]["name"], "Rough cut");
    assert_eq!(record["breakdowns"][0]["totalTarget"], 10.0);

    // A legacy blob upgrades on load and re-saves in the current shape.
    info!("upgrading legacy blob");
    let legacy_path = dir.path().join("legacy_card.json");
    let legacy_storage = FileStorage::new(&legacy_path);
    legacy_storage
        .set(
            STORAGE_KEY,
            json!({
                "trackers": [{
                    "id": "trk_9f3a2b11c44",
                    "name": "Carried over",
                    "checkItemId": "5f8a1c2d",
                    "totalMax": 12,
                    "jets": [
                        { "name": "Waterjet 1", "current": 2, "max": 6 },
                        { "name": "Waterjet 2", "current": 1, "max": 6 }
                    ]
                }]
            }),
        )
        .await
        .expect("failed to seed legacy blob");

    let legacy_store = TrackerStore::new(legacy_storage);
    let upgraded = legacy_store.load_all().await;
    let legacy_id = TrackerId::parse("trk_9f3a2b11c44").expect("legacy id should parse");
    let carried = &upgraded[&legacy_id];
    assert_eq!(carried.total_target, 12.0);
    assert_eq!(carried.checklist_item_id.as_deref(), Some("5f8a1c2d"));
    assert!(
        !carried.auto_split,
        "records predating the flag default it off"
    );
    assert_eq!(carried.jets["Waterjet 1"].current, 2.0);
    assert_eq!(carried.jets["Waterjet 1"].target, 6.0);
    assert_eq!(carried.jets["Waterjet 2"].current, 1.0);

    legacy_store.save_all(&upgraded).await.expect("save failed");
    let raw = FileStorage::new(&legacy_path)
        .get(STORAGE_KEY)
        .await
        .expect("raw read failed")
        .expect("storage key unset");
    assert!(
        raw.get("trackers").is_none(),
        "re-save writes the keyed-map shape"
    );
    assert_eq!(raw[legacy_id.as_str()]["totalTarget"], 12.0);
    assert_eq!(
        legacy_store.load_all().await,
        upgraded,
        "upgrade must be idempotent"
    );

    // Delete the tracker; the card ends empty.
    let mut map = store.load_all().await;
    assert!(map.remove(&id).is_some());
    store.save_all(&map).await.expect("save failed");
    assert!(store.load_all().await.is_empty());
}
