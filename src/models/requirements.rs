//! Remaining-hour bookkeeping.
//!
//! A `RequirementSet` is one batch's private copy of the semester's hour
//! requirements, indexed by subject position and session kind. It is the
//! termination oracle for a batch: allocation is complete exactly when
//! every tracked counter is zero.

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{SessionKind, Subject};

/// Per-subject remaining-hour counters for each session kind.
///
/// Counters are non-negative and monotonically non-increasing; each batch
/// gets an independent copy so hours are never shared across batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementSet {
    remaining: Vec<[u32; 3]>,
}

impl RequirementSet {
    /// Snapshots the requirements of a subject slice.
    ///
    /// Counter positions are parallel to the slice: counters for
    /// `subjects[i]` live at index `i`.
    pub fn for_subjects(subjects: &[Subject]) -> Self {
        Self {
            remaining: subjects
                .iter()
                .map(|s| [s.lecture_hours, s.lab_hours, s.tutorial_hours])
                .collect(),
        }
    }

    /// Remaining hours for (subject, kind).
    pub fn remaining(&self, subject: usize, kind: SessionKind) -> u32 {
        self.remaining[subject][kind.index()]
    }

    /// Reduces the counter for (subject, kind) by `amount`.
    ///
    /// A counter never goes below zero; committing more hours than remain
    /// is a caller bug.
    pub fn decrement(&mut self, subject: usize, kind: SessionKind, amount: u32) {
        let counter = &mut self.remaining[subject][kind.index()];
        debug_assert!(*counter >= amount, "over-decrement of hour counter");
        *counter = counter.saturating_sub(amount);
    }

    /// Whether every counter for the given kinds is zero.
    pub fn is_satisfied(&self, kinds: &[SessionKind]) -> bool {
        self.remaining.iter().all(|counters| {
            kinds
                .iter()
                .all(|&k| counters[k.index()] == 0)
        })
    }

    /// All (subject, kind) pairs still needing at least one hour of any
    /// kind in `kinds`, in subject order.
    pub fn outstanding(&self, kinds: &[SessionKind]) -> Vec<(usize, SessionKind)> {
        let mut pairs = Vec::new();
        for (subject, counters) in self.remaining.iter().enumerate() {
            for &kind in kinds {
                if counters[kind.index()] > 0 {
                    pairs.push((subject, kind));
                }
            }
        }
        pairs
    }

    /// Picks uniformly at random among all outstanding (subject, kind)
    /// pairs for the given kinds. `None` when none remain.
    pub fn pick_random<R: Rng>(
        &self,
        kinds: &[SessionKind],
        rng: &mut R,
    ) -> Option<(usize, SessionKind)> {
        self.outstanding(kinds).choose(rng).copied()
    }

    /// Total remaining hours across all subjects for the given kinds.
    pub fn total_remaining(&self, kinds: &[SessionKind]) -> u32 {
        self.remaining
            .iter()
            .map(|counters| {
                kinds
                    .iter()
                    .map(|&k| counters[k.index()])
                    .sum::<u32>()
            })
            .sum()
    }

    /// Number of tracked subjects.
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Whether no subjects are tracked.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
