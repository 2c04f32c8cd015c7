//! Aggregate progress totals.
//!
//! Current totals are always derived by summing jet tallies. Target totals
//! prefer the explicitly entered total and fall back to the derived sum when
//! the explicit value is zero or absent.

use crate::model::{Breakdown, Tracker};
use crate::round::{clamp_number, round3};

/// Summed progress for a tracker or a single breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub current: f64,
    pub target: f64,
}

impl Totals {
    /// Fraction complete, or `None` when there is no target to measure
    /// against.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        if self.target == 0.0 {
            None
        } else {
            Some(self.current / self.target)
        }
    }
}

fn effective_target(explicit: f64, derived: f64) -> f64 {
    let explicit = clamp_number(explicit);
    if explicit != 0.0 {
        explicit
    } else {
        derived
    }
}

/// Totals for one breakdown: summed currents, and the breakdown's own total
/// when nonzero, else the sum of its jet targets.
#[must_use]
pub fn breakdown_totals(breakdown: &Breakdown) -> Totals {
    let current = breakdown
        .jets
        .values()
        .map(|j| clamp_number(j.current))
        .sum();
    let derived = breakdown
        .jets
        .values()
        .map(|j| clamp_number(j.target))
        .sum();
    Totals {
        current: round3(current),
        target: round3(effective_target(breakdown.total_target, derived)),
    }
}

/// Totals for a tracker across both modes.
///
/// In breakdown mode the derived target is the sum of each breakdown's
/// effective total; the tracker-level explicit total still wins when nonzero.
#[must_use]
pub fn totals(tracker: &Tracker) -> Totals {
    if tracker.is_advanced() {
        let mut current = 0.0;
        let mut derived = 0.0;
        for breakdown in &tracker.breakdowns {
            let t = breakdown_totals(breakdown);
            current += t.current;
            derived += t.target;
        }
        Totals {
            current: round3(current),
            target: round3(effective_target(tracker.total_target, derived)),
        }
    } else {
        let current = tracker
            .jets
            .values()
            .map(|j| clamp_number(j.current))
            .sum();
        let derived = tracker
            .jets
            .values()
            .map(|j| clamp_number(j.target))
            .sum();
        Totals {
            current: round3(current),
            target: round3(effective_target(tracker.total_target, derived)),
        }
    }
}
