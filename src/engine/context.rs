//! Cross-batch scheduling state.
//!
//! The `SchedulingContext` owns the archive of every finalized grid and is
//! the clash oracle later batches consult for room/teacher exclusivity.
//! Entries are immutable once inserted. Per-teacher and per-room views are
//! derived read-only projections rebuilt from the archive on demand; they
//! hold no state of their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Day, ScheduleGrid, Session, SlotEntry};

/// Identity of one finalized schedule: department, semester, and batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLabel {
    /// Owning department.
    pub department: String,
    /// Semester number.
    pub semester: u32,
    /// Batch number, `None` when the group has a single batch.
    pub batch: Option<u32>,
}

impl BatchLabel {
    /// Label for a single-batch group.
    pub fn new(department: impl Into<String>, semester: u32) -> Self {
        Self {
            department: department.into(),
            semester,
            batch: None,
        }
    }

    /// Label for one batch of a multi-batch group.
    pub fn with_batch(mut self, batch: u32) -> Self {
        self.batch = Some(batch);
        self
    }
}

impl fmt::Display for BatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Semester {}", self.department, self.semester)?;
        if let Some(batch) = self.batch {
            write!(f, " - Batch {batch}")?;
        }
        Ok(())
    }
}

/// A finalized grid together with its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedGrid {
    /// Schedule identity.
    pub label: BatchLabel,
    /// The frozen weekly grid.
    pub grid: ScheduleGrid,
}

/// The growing collection of finalized schedules.
///
/// Append-only: a grid is inserted exactly once, after its requirement set
/// is exhausted, and is never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingContext {
    archive: Vec<ArchivedGrid>,
}

impl SchedulingContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Freezes a finished grid into the archive.
    pub fn insert(&mut self, label: BatchLabel, grid: ScheduleGrid) {
        self.archive.push(ArchivedGrid { label, grid });
    }

    /// All finalized grids, in insertion order.
    pub fn grids(&self) -> &[ArchivedGrid] {
        &self.archive
    }

    /// Looks up a finalized grid by label.
    pub fn get(&self, label: &BatchLabel) -> Option<&ScheduleGrid> {
        self.archive
            .iter()
            .find(|a| &a.label == label)
            .map(|a| &a.grid)
    }

    /// Number of finalized grids.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether no grids have been finalized yet.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Whether any finalized grid occupies one of the proposed teachers or
    /// rooms at (day, slot).
    ///
    /// Merged cells contribute every member's labels, so a two-member
    /// session clashes with a later three-member one as soon as any single
    /// teacher or room token intersects.
    pub fn has_conflict(&self, day: Day, slot: usize, teachers: &[&str], rooms: &[&str]) -> bool {
        self.archive.iter().any(|archived| {
            if slot >= archived.grid.slot_count() {
                return false;
            }
            let entry = archived.grid.entry(day, slot);
            entry.teachers().any(|t| teachers.contains(&t))
                || entry.rooms().any(|r| rooms.contains(&r))
        })
    }

    /// Whether the given room is occupied at (day, slot) in any finalized
    /// grid.
    pub fn room_occupied(&self, day: Day, slot: usize, room: &str) -> bool {
        self.has_conflict(day, slot, &[], &[room])
    }

    /// Per-teacher projection: for each teacher, a grid of the sessions
    /// they run, assembled from every finalized cell.
    ///
    /// Merged cells are projected member by member. Blank teacher names
    /// (subjects without an assistant) produce no view.
    pub fn teacher_views(&self) -> BTreeMap<String, ScheduleGrid> {
        self.project(|session| {
            let name = session.teacher.trim();
            (!name.is_empty()).then(|| session.teacher.clone())
        })
    }

    /// Per-room projection: for each room, a grid of the sessions held in
    /// it, assembled from every finalized cell.
    pub fn room_views(&self) -> BTreeMap<String, ScheduleGrid> {
        self.project(|session| Some(session.room.clone()))
    }

    fn project<F>(&self, key_of: F) -> BTreeMap<String, ScheduleGrid>
    where
        F: Fn(&Session) -> Option<String>,
    {
        // Views take the widest slot count in the archive, so a key first
        // seen in a narrow grid can still receive cells from a wider one.
        let slot_count = self
            .archive
            .iter()
            .map(|a| a.grid.slot_count())
            .max()
            .unwrap_or(0);

        let mut views: BTreeMap<String, ScheduleGrid> = BTreeMap::new();
        for archived in &self.archive {
            for (day, slot, entry) in archived.grid.iter() {
                for session in entry.sessions() {
                    let Some(key) = key_of(session) else {
                        continue;
                    };
                    let view = views
                        .entry(key)
                        .or_insert_with(|| ScheduleGrid::new(slot_count));
                    view.set(day, slot, SlotEntry::Single(session.clone()));
                }
            }
        }
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(day: Day, slot: usize, entry: SlotEntry) -> ScheduleGrid {
        let mut g = ScheduleGrid::new(7);
        g.set(day, slot, entry);
        g
    }

    fn merged() -> SlotEntry {
        SlotEntry::Merged(vec![
            Session::new("Elective A", "Dr. A", "201"),
            Session::new("Elective B", "Dr. B", "202"),
        ])
    }

    #[test]
    fn test_label_display() {
        let plain = BatchLabel::new("CS", 3);
        assert_eq!(plain.to_string(), "CS - Semester 3");

        let batched = BatchLabel::new("CS", 3).with_batch(2);
        assert_eq!(batched.to_string(), "CS - Semester 3 - Batch 2");
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut ctx = SchedulingContext::new();
        assert!(ctx.is_empty());

        let label = BatchLabel::new("CS", 1);
        ctx.insert(label.clone(), ScheduleGrid::new(7));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.get(&label).is_some());
        assert!(ctx.get(&BatchLabel::new("EE", 1)).is_none());
    }

    #[test]
    fn test_empty_archive_never_conflicts() {
        let ctx = SchedulingContext::new();
        assert!(!ctx.has_conflict(Day::Mon, 0, &["Dr. A"], &["201"]));
    }

    #[test]
    fn test_conflict_on_teacher_or_room() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(
            BatchLabel::new("CS", 1),
            grid_with(
                Day::Mon,
                2,
                SlotEntry::Single(Session::new("Maths", "Dr. Rao", "101")),
            ),
        );

        assert!(ctx.has_conflict(Day::Mon, 2, &["Dr. Rao"], &[]));
        assert!(ctx.has_conflict(Day::Mon, 2, &[], &["101"]));
        assert!(!ctx.has_conflict(Day::Mon, 3, &["Dr. Rao"], &["101"]));
        assert!(!ctx.has_conflict(Day::Tue, 2, &["Dr. Rao"], &["101"]));
        assert!(!ctx.has_conflict(Day::Mon, 2, &["Dr. Sen"], &["102"]));
    }

    #[test]
    fn test_conflict_splits_merged_cells() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(BatchLabel::new("CS", 1), grid_with(Day::Wed, 4, merged()));

        // A single-member proposal clashes with one token of the merged
        // cell even though the group sizes differ.
        assert!(ctx.has_conflict(Day::Wed, 4, &["Dr. B"], &[]));
        assert!(ctx.has_conflict(Day::Wed, 4, &[], &["201"]));
        assert!(!ctx.has_conflict(Day::Wed, 4, &["Dr. C"], &["203"]));
    }

    #[test]
    fn test_room_occupied() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(
            BatchLabel::new("CS", 1),
            grid_with(
                Day::Fri,
                0,
                SlotEntry::Single(Session::new("Maths", "Dr. Rao", "101")),
            ),
        );
        assert!(ctx.room_occupied(Day::Fri, 0, "101"));
        assert!(!ctx.room_occupied(Day::Fri, 1, "101"));
    }

    #[test]
    fn test_teacher_views_split_merged_members() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(BatchLabel::new("CS", 1), grid_with(Day::Tue, 1, merged()));

        let views = ctx.teacher_views();
        assert_eq!(views.len(), 2);

        let a = &views["Dr. A"];
        assert!(a.entry(Day::Tue, 1).has_room("201"));
        assert!(!a.entry(Day::Tue, 1).has_room("202"));

        let b = &views["Dr. B"];
        assert!(b.entry(Day::Tue, 1).has_room("202"));
    }

    #[test]
    fn test_teacher_views_skip_blank_names() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(
            BatchLabel::new("CS", 1),
            grid_with(
                Day::Mon,
                0,
                SlotEntry::Single(Session::new("Self Study", " ", "101")),
            ),
        );
        assert!(ctx.teacher_views().is_empty());
        assert_eq!(ctx.room_views().len(), 1);
    }

    #[test]
    fn test_views_span_mixed_slot_counts() {
        // The same room appears first in a narrow grid, then in a wider
        // one; its view must be wide enough to hold both cells.
        let mut ctx = SchedulingContext::new();
        let mut narrow = ScheduleGrid::new(3);
        narrow.set(
            Day::Mon,
            0,
            SlotEntry::Single(Session::new("Maths", "Dr. Rao", "101")),
        );
        ctx.insert(BatchLabel::new("CS", 1), narrow);

        let mut wide = ScheduleGrid::new(7);
        wide.set(
            Day::Fri,
            6,
            SlotEntry::Single(Session::new("Signals", "Dr. Sen", "101")),
        );
        ctx.insert(BatchLabel::new("EE", 1), wide);

        let views = ctx.room_views();
        let room = &views["101"];
        assert_eq!(room.slot_count(), 7);
        assert!(!room.entry(Day::Mon, 0).is_free());
        assert!(!room.entry(Day::Fri, 6).is_free());
    }

    #[test]
    fn test_room_views_accumulate_across_grids() {
        let mut ctx = SchedulingContext::new();
        ctx.insert(
            BatchLabel::new("CS", 1),
            grid_with(
                Day::Mon,
                0,
                SlotEntry::Single(Session::new("Maths", "Dr. Rao", "101")),
            ),
        );
        ctx.insert(
            BatchLabel::new("EE", 1),
            grid_with(
                Day::Tue,
                3,
                SlotEntry::Single(Session::new("Signals", "Dr. Sen", "101")),
            ),
        );

        let views = ctx.room_views();
        let room = &views["101"];
        assert!(!room.entry(Day::Mon, 0).is_free());
        assert!(!room.entry(Day::Tue, 3).is_free());
        assert_eq!(room.filled_count(), 2);
    }
}
