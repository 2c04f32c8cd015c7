//! # runtrack-id
//!
//! Prefixed ID types, parsing, and validation for tracker records.
//!
//! ## Design Principles
//!
//! - IDs are stable and system-generated; names are user-controlled labels
//! - All IDs have a canonical string representation with strict parsing
//! - IDs support roundtrip serialization (parse → format → parse)
//! - IDs are typed to prevent mixing different record kinds
//!
//! ## ID Format
//!
//! All record IDs use a prefixed format: `{prefix}_{suffix}`
//!
//! Examples:
//! - `trk_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `bd_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//!
//! Freshly generated IDs carry a ULID suffix (time-ordered, 80 bits of
//! randomness). Parsing accepts any non-empty alphanumeric suffix, because
//! records written by earlier storage-schema revisions used random hex
//! suffixes and must keep their identity across loads.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
