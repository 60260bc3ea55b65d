//! Error taxonomy for timetable generation.
//!
//! Three failure classes: rejected input (surfaced before any allocation),
//! per-run misconfiguration, and exhaustion of the bounded retry budget.
//! Empty room-candidate sets and busy reserved rooms are *not* errors;
//! they abandon the current attempt and count against the budget.

use thiserror::Error;

use crate::models::SessionKind;
use crate::validation::ValidationError;

/// A fatal timetabling failure.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Input records failed integrity checks; nothing was allocated.
    #[error("invalid input: {} problem(s) found", .0.len())]
    Invalid(Vec<ValidationError>),

    /// A run-level setting is unusable (batch count out of range, a week
    /// plan with no contiguous pair while labs are required).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The attempt budget ran out with hours still outstanding. Names one
    /// stuck (subject, kind) pair so the caller can diagnose the input.
    #[error(
        "no feasible slot for '{subject}' ({kind}) after {attempts} attempts; \
         {remaining} hour(s) still unallocated"
    )]
    Unsatisfiable {
        /// Course id of a subject that could not be placed.
        subject: String,
        /// Session kind that could not be placed.
        kind: SessionKind,
        /// Hours still outstanding for that pair.
        remaining: u32,
        /// Attempts consumed in the failing pass.
        attempts: usize,
    },

    /// A track-core group produced an inconsistent assignment set. The
    /// whole attempt is discarded; no member is ever committed partially.
    #[error("track core '{key}' produced an inconsistent group assignment")]
    GroupCommit {
        /// The shared track-core key.
        key: String,
    },
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_message_names_pair() {
        let err = ScheduleError::Unsatisfiable {
            subject: "CS101".into(),
            kind: SessionKind::Lab,
            remaining: 2,
            attempts: 128,
        };
        let msg = err.to_string();
        assert!(msg.contains("CS101"));
        assert!(msg.contains("lab"));
        assert!(msg.contains("128"));
        assert!(msg.contains("2 hour(s)"));
    }

    #[test]
    fn test_invalid_counts_problems() {
        let err: ScheduleError = vec![].into();
        assert!(err.to_string().contains("0 problem(s)"));
    }
}
