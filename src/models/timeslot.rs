//! Teaching week structure: weekdays and ordered timeslots.
//!
//! A `WeekPlan` is the fixed sequence of intervals covering a teaching day.
//! Two slots are *contiguous* when one ends exactly where the next begins;
//! contiguity is what permits uninterrupted two-hour lab blocks. The lunch
//! break shows up as a non-contiguous boundary between the morning and
//! afternoon runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A teaching weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    /// All teaching days, in week order.
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Position within the week (Mon = 0).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Day::Mon => 0,
            Day::Tue => 1,
            Day::Wed => 2,
            Day::Thu => 3,
            Day::Fri => 4,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
        };
        f.write_str(label)
    }
}

/// One fixed interval of the teaching day, in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the interval (minutes from midnight).
    pub start_min: u16,
    /// End of the interval (minutes from midnight).
    pub end_min: u16,
}

impl TimeSlot {
    /// Creates a slot from start/end minutes.
    pub fn new(start_min: u16, end_min: u16) -> Self {
        Self { start_min, end_min }
    }

    /// Creates a slot from (hour, minute) clock times.
    pub fn from_clock(start: (u16, u16), end: (u16, u16)) -> Self {
        Self {
            start_min: start.0 * 60 + start.1,
            end_min: end.0 * 60 + end.1,
        }
    }

    /// Whether `next` begins exactly where this slot ends.
    #[inline]
    pub fn is_contiguous_with(&self, next: &TimeSlot) -> bool {
        self.end_min == next.start_min
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}

/// The ordered slot sequence shared by every day of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    slots: Vec<TimeSlot>,
}

impl WeekPlan {
    /// Creates a plan from an ordered slot sequence.
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }

    /// The conventional seven-slot day: three morning hours, a lunch
    /// break, then four afternoon hours.
    pub fn standard() -> Self {
        Self::new(vec![
            TimeSlot::from_clock((9, 30), (10, 30)),
            TimeSlot::from_clock((10, 30), (11, 30)),
            TimeSlot::from_clock((11, 30), (12, 30)),
            TimeSlot::from_clock((13, 30), (14, 30)),
            TimeSlot::from_clock((14, 30), (15, 30)),
            TimeSlot::from_clock((15, 30), (16, 30)),
            TimeSlot::from_clock((16, 30), (17, 30)),
        ])
    }

    /// Number of slots per day.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the plan has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot at a given index.
    pub fn slot(&self, index: usize) -> &TimeSlot {
        &self.slots[index]
    }

    /// All slots, in day order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Index pairs of contiguous slots able to hold an uninterrupted
    /// two-hour lab block.
    pub fn lab_pairs(&self) -> Vec<(usize, usize)> {
        self.slots
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0].is_contiguous_with(&w[1]))
            .map(|(i, _)| (i, i + 1))
            .collect()
    }
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self::standard()
    }
}
