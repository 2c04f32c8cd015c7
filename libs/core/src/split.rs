//! Auto-split target allocation.
//!
//! Splitting rounds a total onto a fixed step grid and divides it across
//! recipients.
//!
//! Invariants:
//! - Assigned targets sum exactly to the rounded total (at storage
//!   resolution).
//! - No two targets differ by more than one step.
//! - Earlier recipients receive the larger share.

use crate::model::Tracker;
use crate::round::{clamp_number, round3, round_step, strip_float};
use crate::validate::ValidationError;

/// Allocation granularity for split targets.
pub const TARGET_STEP: f64 = 0.1;

/// Result of one split: the step-rounded total and the per-recipient targets
/// in recipient order.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub rounded_total: f64,
    pub targets: Vec<f64>,
}

/// Divides `total` across `count` recipients on a `step` grid.
///
/// Every recipient gets the floored per-recipient share; the remainder is
/// handed out one step at a time from the first recipient on. A zero count is
/// treated as one, and a non-positive or non-finite step falls back to
/// [`TARGET_STEP`].
#[must_use]
pub fn split_targets(total: f64, step: f64, count: usize) -> SplitOutcome {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        TARGET_STEP
    };
    let count = count.max(1);
    let total = round_step(clamp_number(total), step);

    let base = strip_float(((total / count as f64) / step).floor() * step);
    let remainder = strip_float(total - base * count as f64);
    let extra = ((remainder / step).round().max(0.0)) as usize;

    let mut targets = vec![base; count];
    for target in targets.iter_mut().take(extra) {
        *target = strip_float(*target + step);
    }

    SplitOutcome {
        rounded_total: total,
        targets,
    }
}

/// Applies auto-split to a tracker in place.
///
/// Flat mode splits the tracker's own total across its jets and also stores
/// the step-rounded total back. Breakdown mode runs the same split per
/// breakdown against each breakdown's own total.
pub fn auto_split(tracker: &mut Tracker) -> Result<(), ValidationError> {
    if tracker.is_advanced() {
        auto_split_breakdowns(tracker);
        Ok(())
    } else {
        auto_split_flat(tracker)
    }
}

fn auto_split_flat(tracker: &mut Tracker) -> Result<(), ValidationError> {
    if tracker.jets.is_empty() {
        return Err(ValidationError::NoJetsSelected);
    }
    let total = clamp_number(tracker.total_target);
    if total <= 0.0 {
        return Err(ValidationError::NonPositiveTotal);
    }

    let outcome = split_targets(total, TARGET_STEP, tracker.jets.len());
    tracker.total_target = outcome.rounded_total;
    for (jet, target) in tracker.jets.values_mut().zip(outcome.targets) {
        jet.target = round3(target);
    }
    Ok(())
}

fn auto_split_breakdowns(tracker: &mut Tracker) {
    // A breakdown with no jets or nothing to allocate is skipped, not an
    // error; the others still split.
    for breakdown in &mut tracker.breakdowns {
        if breakdown.jets.is_empty() {
            continue;
        }
        let total = clamp_number(breakdown.total_target);
        if total <= 0.0 {
            continue;
        }

        let outcome = split_targets(total, TARGET_STEP, breakdown.jets.len());
        breakdown.total_target = outcome.rounded_total;
        for (jet, target) in breakdown.jets.values_mut().zip(outcome.targets) {
            jet.target = round3(target);
        }
    }
}
