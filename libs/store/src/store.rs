//! Loading and saving the per-card tracker map.
//!
//! Persistence is whole-map, last-write-wins: every save serializes the full
//! map under [`STORAGE_KEY`], and concurrent editors overwrite each other at
//! record granularity with no merging.
//!
//! Loading is lenient by design. A missing or unreadable blob yields an
//! empty map with a logged warning, records of any historical shape are
//! lifted through [`normalize`], and a single bad record is skipped without
//! poisoning the rest.

use runtrack_core::{normalize, RawTracker, TrackerMap};
use runtrack_id::TrackerId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::{CardStorage, StorageError, STORAGE_KEY};

/// Tracker persistence over a [`CardStorage`] implementation.
pub struct TrackerStore<S> {
    storage: S,
}

impl<S: CardStorage> TrackerStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads every tracker on the card.
    ///
    /// Never fails: storage errors and unreadable state degrade to an empty
    /// map so the caller always has something to render.
    pub async fn load_all(&self) -> TrackerMap {
        let value = match self.storage.get(STORAGE_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return TrackerMap::new(),
            Err(err) => {
                warn!(error = %err, "failed to read tracker storage; starting empty");
                return TrackerMap::new();
            }
        };

        let trackers = parse_state(value);
        debug!(count = trackers.len(), "loaded trackers");
        trackers
    }

    /// Writes the whole map back, replacing whatever is stored.
    pub async fn save_all(&self, trackers: &TrackerMap) -> Result<(), StorageError> {
        let value = serde_json::to_value(trackers)?;
        self.storage.set(STORAGE_KEY, value).await
    }
}

fn parse_state(value: Value) -> TrackerMap {
    let Value::Object(map) = value else {
        warn!("tracker storage is not a JSON object; starting empty");
        return TrackerMap::new();
    };

    // The oldest store shape was a single list under a "trackers" key, each
    // record carrying its own id.
    if let Some(records) = map.get("trackers").and_then(Value::as_array) {
        return parse_legacy_list(records);
    }

    parse_keyed_map(map)
}

fn parse_keyed_map(map: serde_json::Map<String, Value>) -> TrackerMap {
    let mut trackers = TrackerMap::new();
    for (key, value) in map {
        let id = match TrackerId::parse(&key) {
            Ok(id) => id,
            Err(err) => {
                warn!(key = %key, error = %err, "skipping record under malformed id");
                continue;
            }
        };
        match serde_json::from_value::<RawTracker>(value) {
            Ok(raw) => {
                trackers.insert(id, normalize(raw));
            }
            Err(err) => {
                warn!(id = %id, error = %err, "skipping unreadable tracker record");
            }
        }
    }
    trackers
}

fn parse_legacy_list(records: &[Value]) -> TrackerMap {
    let mut trackers = TrackerMap::new();
    for record in records {
        let raw: RawTracker = match serde_json::from_value(record.clone()) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "skipping unreadable tracker record");
                continue;
            }
        };
        // Records without a usable embedded id get a fresh one.
        let id = raw
            .id
            .as_deref()
            .and_then(|s| TrackerId::parse(s).ok())
            .unwrap_or_default();
        trackers.insert(id, normalize(raw));
    }
    trackers
}
