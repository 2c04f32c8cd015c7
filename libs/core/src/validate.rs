//! Save-time validation.
//!
//! A failed check surfaces as a dismissible warning on the edit surface and
//! aborts the save; stored state is never touched by an invalid edit.

use thiserror::Error;

use crate::model::Tracker;
use crate::round::clamp_number;

/// Reasons an edit or a split is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Flat mode with no jet selected.
    #[error("select at least one jet")]
    NoJetsSelected,

    /// Auto-split asked to allocate nothing.
    #[error("enter a total above 0 to auto-split")]
    NonPositiveTotal,

    /// A breakdown is missing its display name.
    #[error("each breakdown needs a name")]
    UnnamedBreakdown,

    /// A named breakdown has no jets.
    #[error("breakdown \"{name}\" must include at least one jet")]
    EmptyBreakdown { name: String },

    /// A stored total cannot go negative.
    #[error("total target cannot be negative")]
    NegativeTotal,
}

/// Checks a tracker before it is written back.
pub fn validate(tracker: &Tracker) -> Result<(), ValidationError> {
    if clamp_number(tracker.total_target) < 0.0 {
        return Err(ValidationError::NegativeTotal);
    }

    if tracker.is_advanced() {
        for breakdown in &tracker.breakdowns {
            if breakdown.name.trim().is_empty() {
                return Err(ValidationError::UnnamedBreakdown);
            }
            if breakdown.jets.is_empty() {
                return Err(ValidationError::EmptyBreakdown {
                    name: breakdown.name.clone(),
                });
            }
            if clamp_number(breakdown.total_target) < 0.0 {
                return Err(ValidationError::NegativeTotal);
            }
        }
        return Ok(());
    }

    if tracker.jets.is_empty() {
        return Err(ValidationError::NoJetsSelected);
    }
    Ok(())
}
