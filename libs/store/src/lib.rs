//! # runtrack-store
//!
//! Persistence and host collaborators for card run trackers.
//!
//! The host stores all trackers for a card as one JSON value in card-scoped
//! shared key/value storage. This crate owns that boundary:
//! - [`storage`]: the [`CardStorage`] interface with in-memory and
//!   file-backed implementations
//! - [`store`]: whole-map load/save with lenient schema normalization
//! - [`checklist`]: checklist-item sources with capability degradation
//! - [`render`]: stale render-pass suppression for overlapping refreshes

pub mod checklist;
pub mod render;
pub mod storage;
pub mod store;

pub use checklist::{
    item_name, sort_items, ChecklistChain, ChecklistItem, ChecklistSource, NoChecklist,
    RestChecklist, SnapshotChecklist, DEFAULT_API_BASE,
};
pub use render::{RenderGate, RenderPass};
pub use storage::{CardStorage, FileStorage, MemoryStorage, StorageError, STORAGE_KEY};
pub use store::TrackerStore;
