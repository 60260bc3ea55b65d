//! Synchronized track-core resolution.
//!
//! Subjects sharing a track-core key (elective cohorts) must always meet
//! together: same day and slot(s), one room and teacher per member,
//! recorded as a single merged cell. Resolution is all-or-nothing — if any
//! member cannot be given a distinct free room, the whole attempt yields
//! nothing and the caller draws again. No partial assignment ever leaks.

use rand::prelude::IndexedRandom;
use rand::Rng;

use super::SchedulingContext;
use crate::models::{Day, RequirementSet, RoomCatalog, SessionKind, Subject};

/// One member's share of a synchronized session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    /// Member position in the batch's subject slice.
    pub subject: usize,
    /// Teacher resolved for the session kind.
    pub teacher: String,
    /// Room resolved for this member, distinct within the group.
    pub room: String,
}

/// Groups subjects by track-core key and resolves merged sessions.
///
/// Grouping is derived data recomputed from the current requirement
/// snapshot; the resolver owns no persistent state.
pub struct TrackCoreResolver<'a> {
    subjects: &'a [Subject],
    catalog: &'a RoomCatalog,
}

impl<'a> TrackCoreResolver<'a> {
    /// Creates a resolver over the batch's subjects and the room catalog.
    pub fn new(subjects: &'a [Subject], catalog: &'a RoomCatalog) -> Self {
        Self { subjects, catalog }
    }

    /// Member positions sharing `key` that still have outstanding hours of
    /// `kind`, in input order.
    ///
    /// A teacher appears at most once per group: when two members share a
    /// teacher they cannot meet in parallel rooms, so only the first is
    /// kept for this synchronized session.
    pub fn members(&self, key: &str, kind: SessionKind, reqs: &RequirementSet) -> Vec<usize> {
        let mut members = Vec::new();
        let mut teachers: Vec<&str> = Vec::new();
        for (idx, subject) in self.subjects.iter().enumerate() {
            if subject.track_core.as_deref() != Some(key) {
                continue;
            }
            if reqs.remaining(idx, kind) < kind.slot_hours() {
                continue;
            }
            let teacher = subject.teacher_for(kind);
            if teachers.contains(&teacher) {
                continue;
            }
            teachers.push(teacher);
            members.push(idx);
        }
        members
    }

    /// Resolves a (teacher, room) pair for every member at the proposed
    /// day and slot(s).
    ///
    /// Rooms are drawn from the member's reserved room or the catalog's
    /// exact-capacity candidates, excluding rooms occupied in any archived
    /// grid at the proposed slots and rooms already taken by an earlier
    /// member of the same attempt. Returns `None` as soon as any member
    /// has no room left, discarding the whole attempt.
    pub fn resolve<R: Rng>(
        &self,
        members: &[usize],
        kind: SessionKind,
        day: Day,
        slots: &[usize],
        ctx: &SchedulingContext,
        rng: &mut R,
    ) -> Option<Vec<GroupAssignment>> {
        let mut assignments: Vec<GroupAssignment> = Vec::with_capacity(members.len());

        for &idx in members {
            let subject = &self.subjects[idx];
            let taken: Vec<&str> = assignments.iter().map(|a| a.room.as_str()).collect();
            let room = pick_room(subject, kind, day, slots, ctx, self.catalog, &taken, rng)?;
            assignments.push(GroupAssignment {
                subject: idx,
                teacher: subject.teacher_for(kind).to_string(),
                room,
            });
        }

        Some(assignments)
    }
}

/// Picks a room for one subject at the proposed day and slot(s).
///
/// A reserved room is used as-is when free at every slot; otherwise the
/// attempt fails (reserved rooms are never substituted). Unreserved
/// subjects draw uniformly from the exact-capacity candidates that are
/// free in the archive and not in `taken`.
pub(super) fn pick_room<R: Rng>(
    subject: &Subject,
    kind: SessionKind,
    day: Day,
    slots: &[usize],
    ctx: &SchedulingContext,
    catalog: &RoomCatalog,
    taken: &[&str],
    rng: &mut R,
) -> Option<String> {
    if let Some(reserved) = subject.reserved_room(kind) {
        let free = !taken.contains(&reserved)
            && slots.iter().all(|&s| !ctx.room_occupied(day, s, reserved));
        return free.then(|| reserved.to_string());
    }

    let pool: Vec<&str> = catalog
        .candidates(kind.room_kind(), subject.capacity_for(kind))
        .into_iter()
        .map(|r| r.number.as_str())
        .filter(|number| !taken.contains(number))
        .filter(|number| slots.iter().all(|&s| !ctx.room_occupied(day, s, number)))
        .collect();

    pool.choose(rng).map(|number| (*number).to_string())
}
