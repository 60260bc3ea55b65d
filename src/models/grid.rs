//! Weekly schedule grid.
//!
//! A grid is the day × timeslot matrix of one batch's timetable. Each cell
//! holds either nothing, a single session, or a merged list of sessions for
//! a synchronized track-core group. Merged cells carry one entry per member
//! in stable input order; there is no delimiter-joined string anywhere.

use serde::{Deserialize, Serialize};

use super::Day;

/// One placed session: subject label, teacher label, room label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Subject label as shown in the cell (may carry a kind suffix).
    pub subject: String,
    /// Teacher or assistant name.
    pub teacher: String,
    /// Room number.
    pub room: String,
}

impl Session {
    /// Creates a session record.
    pub fn new(
        subject: impl Into<String>,
        teacher: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            teacher: teacher.into(),
            room: room.into(),
        }
    }
}

/// Contents of one (day, timeslot) cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotEntry {
    /// The distinguished unassigned marker.
    #[default]
    Free,
    /// A standalone session.
    Single(Session),
    /// A synchronized track-core session, one entry per member in
    /// stable input order.
    Merged(Vec<Session>),
}

impl SlotEntry {
    /// Whether the cell is unassigned.
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, SlotEntry::Free)
    }

    /// The sessions held in this cell (empty when free).
    pub fn sessions(&self) -> &[Session] {
        match self {
            SlotEntry::Free => &[],
            SlotEntry::Single(s) => std::slice::from_ref(s),
            SlotEntry::Merged(list) => list,
        }
    }

    /// Teacher labels occupied by this cell.
    pub fn teachers(&self) -> impl Iterator<Item = &str> {
        self.sessions().iter().map(|s| s.teacher.as_str())
    }

    /// Room labels occupied by this cell.
    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.sessions().iter().map(|s| s.room.as_str())
    }

    /// Subject labels held in this cell.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.sessions().iter().map(|s| s.subject.as_str())
    }

    /// Whether the cell occupies the given teacher.
    pub fn has_teacher(&self, teacher: &str) -> bool {
        self.teachers().any(|t| t == teacher)
    }

    /// Whether the cell occupies the given room.
    pub fn has_room(&self, room: &str) -> bool {
        self.rooms().any(|r| r == room)
    }
}

/// The weekly matrix of one batch: `Day` × slot index, one cell each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleGrid {
    slot_count: usize,
    cells: Vec<SlotEntry>,
}

impl ScheduleGrid {
    /// Creates an empty grid with the given number of slots per day.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            cells: vec![SlotEntry::Free; slot_count * Day::ALL.len()],
        }
    }

    /// Slots per day.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline]
    fn cell_index(&self, day: Day, slot: usize) -> usize {
        debug_assert!(slot < self.slot_count);
        day.index() * self.slot_count + slot
    }

    /// The cell at (day, slot).
    pub fn entry(&self, day: Day, slot: usize) -> &SlotEntry {
        &self.cells[self.cell_index(day, slot)]
    }

    /// Whether the cell at (day, slot) is unassigned.
    pub fn is_free(&self, day: Day, slot: usize) -> bool {
        self.entry(day, slot).is_free()
    }

    /// Overwrites the cell at (day, slot).
    ///
    /// Lab blocks are written once per slot of the contiguous pair, both
    /// with the same entry; the engine never writes one slot alone.
    pub fn set(&mut self, day: Day, slot: usize, entry: SlotEntry) {
        let idx = self.cell_index(day, slot);
        self.cells[idx] = entry;
    }

    /// Whether placing `teacher` at (day, slot) would put them in two
    /// timeslot-adjacent cells.
    ///
    /// Checks both the preceding and the following slot; the first and
    /// last slot of the day trivially pass on the missing side.
    pub fn no_consecutive_teacher(&self, day: Day, slot: usize, teacher: &str) -> bool {
        if slot > 0 && self.entry(day, slot - 1).has_teacher(teacher) {
            return false;
        }
        if slot + 1 < self.slot_count && self.entry(day, slot + 1).has_teacher(teacher) {
            return false;
        }
        true
    }

    /// Iterates all cells as (day, slot, entry).
    pub fn iter(&self) -> impl Iterator<Item = (Day, usize, &SlotEntry)> {
        Day::ALL.iter().flat_map(move |&day| {
            (0..self.slot_count).map(move |slot| (day, slot, self.entry(day, slot)))
        })
    }

    /// Number of cells holding at least one session.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_free()).count()
    }
}
