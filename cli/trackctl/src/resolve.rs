//! Name → ID resolution for tracker references.
//!
//! Storage is ID-addressed. For UX, commands accept either a tracker ID or a
//! tracker name and resolve names by scanning the loaded map.

use anyhow::Result;
use runtrack_core::{Tracker, TrackerMap};
use runtrack_id::{BreakdownId, TrackerId};

use crate::error::CliError;

/// Resolve a tracker reference against the loaded map.
pub fn resolve_tracker_id(trackers: &TrackerMap, ident: &str) -> Result<TrackerId> {
    let ident = ident.trim();
    if ident.is_empty() {
        anyhow::bail!("Tracker cannot be empty");
    }

    if let Ok(id) = ident.parse::<TrackerId>() {
        return Ok(id);
    }

    let mut matches: Vec<TrackerId> = trackers
        .iter()
        .filter(|(_, tracker)| tracker.title() == ident)
        .map(|(id, _)| id.clone())
        .collect();

    matches.sort();
    match matches.as_slice() {
        [] => Err(CliError::NotFound(format!("Tracker '{}' not found", ident)).into()),
        [only] => Ok(only.clone()),
        many => {
            let ids = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            anyhow::bail!(
                "Tracker name '{}' is ambiguous ({}). Use an explicit tracker ID.",
                ident,
                ids
            );
        }
    }
}

/// Resolve a breakdown reference within one tracker.
pub fn resolve_breakdown_id(tracker: &Tracker, ident: &str) -> Result<BreakdownId> {
    let ident = ident.trim();
    if ident.is_empty() {
        anyhow::bail!("Breakdown cannot be empty");
    }

    if let Ok(id) = ident.parse::<BreakdownId>() {
        return Ok(id);
    }

    let mut matches: Vec<BreakdownId> = tracker
        .breakdowns
        .iter()
        .filter(|breakdown| breakdown.name == ident)
        .map(|breakdown| breakdown.id.clone())
        .collect();

    matches.sort();
    match matches.as_slice() {
        [] => Err(CliError::NotFound(format!("Breakdown '{}' not found", ident)).into()),
        [only] => Ok(only.clone()),
        many => {
            let ids = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            anyhow::bail!(
                "Breakdown name '{}' is ambiguous ({}). Use an explicit breakdown ID.",
                ident,
                ids
            );
        }
    }
}
