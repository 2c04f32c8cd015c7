//! Typed ID definitions for tracker records.
//!
//! Each ID type has a unique prefix that identifies the record kind.
//! Fresh IDs are ULID-based for sortability and uniqueness; legacy hex
//! suffixes parse unchanged.

use crate::define_id;

define_id!(TrackerId, "trk");
define_id!(BreakdownId, "bd");

// =============================================================================
// Tests
// =============================================================================
