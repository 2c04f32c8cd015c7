//! # runtrack-core
//!
//! Record model and pure logic for card run trackers: multi-jet waterjet
//! run counts with targets, optional per-breakdown sub-allocations, and a
//! fixed-step auto-split engine.
//!
//! ## Design Principles
//!
//! - Everything here is pure: no storage, no host calls, no clocks. The
//!   store and CLI crates drive these functions.
//! - A tracker is either flat (per-jet targets) or advanced (breakdowns);
//!   edits that switch modes clear the other side.
//! - All stored numbers are coerced finite and kept to three decimal
//!   places; allocation runs on a 0.1 step grid.
//! - Loading is lenient: [`normalize`] lifts every historical record shape
//!   into the current schema without altering values that are present.
//!
//! ## Module Map
//!
//! - [`model`]: the tracker record and its edit operations
//! - [`normalize`]: raw stored shapes and schema upgrade
//! - [`split`]: the auto-split allocation engine
//! - [`totals`]: aggregate progress with explicit-total fallback
//! - [`validate`]: save-time checks
//! - [`machines`]: canonical jet set and custom-field preselection
//! - [`round`]: shared numeric hygiene

pub mod machines;
pub mod model;
pub mod normalize;
pub mod round;
pub mod split;
pub mod totals;
pub mod validate;

pub use machines::{default_jets, guess_jets, JETS};
pub use model::{Breakdown, BreakdownDraft, JetCount, JetMap, Tracker, TrackerMap};
pub use normalize::{normalize, RawTracker};
pub use round::{clamp_number, fmt_count, round3, round_step, strip_float};
pub use split::{auto_split, split_targets, SplitOutcome, TARGET_STEP};
pub use totals::{breakdown_totals, totals, Totals};
pub use validate::{validate, ValidationError};
