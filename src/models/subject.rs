//! Subject model.
//!
//! A subject is one course offering within a department and semester: who
//! teaches it, how many weekly hours of each session kind it needs, what
//! room capacity those sessions require, and whether specific rooms are
//! pre-assigned to it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::RoomKind;

/// The kind of a weekly class session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// Faculty-led lecture in a general room.
    Lecture,
    /// Assistant-led practical occupying two contiguous slots in a lab room.
    Lab,
    /// Assistant-led tutorial in a general room.
    Tutorial,
}

impl SessionKind {
    /// All session kinds.
    pub const ALL: [SessionKind; 3] = [SessionKind::Lecture, SessionKind::Lab, SessionKind::Tutorial];

    /// Position used by hour counters (Lecture = 0).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SessionKind::Lecture => 0,
            SessionKind::Lab => 1,
            SessionKind::Tutorial => 2,
        }
    }

    /// Hours consumed by one committed session of this kind.
    ///
    /// A lab is a block of two contiguous slots; everything else fills one.
    #[inline]
    pub fn slot_hours(self) -> u32 {
        match self {
            SessionKind::Lab => 2,
            _ => 1,
        }
    }

    /// The room kind this session is held in.
    #[inline]
    pub fn room_kind(self) -> RoomKind {
        match self {
            SessionKind::Lab => RoomKind::Lab,
            _ => RoomKind::General,
        }
    }

    /// Suffix appended to subject labels in grid cells.
    pub fn label_suffix(self) -> &'static str {
        match self {
            SessionKind::Lecture => "",
            SessionKind::Lab => " (Lab)",
            SessionKind::Tutorial => " (Tut)",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionKind::Lecture => "lecture",
            SessionKind::Lab => "lab",
            SessionKind::Tutorial => "tutorial",
        };
        f.write_str(label)
    }
}

/// One course offering within a department and semester.
///
/// Course ids are unique within their (department, semester) scope. Hour
/// counters are weekly requirements; the engine copies them into a
/// [`RequirementSet`](super::RequirementSet) per batch and never mutates
/// the subject itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Course identifier, unique within (department, semester).
    pub course_id: String,
    /// Human-readable course name, used in grid cells.
    pub name: String,
    /// Owning department.
    pub department: String,
    /// Semester number.
    pub semester: u32,
    /// Track-core grouping key; `None` means standalone.
    pub track_core: Option<String>,
    /// Faculty member who takes lectures.
    pub faculty: String,
    /// Teaching assistant who takes labs and tutorials.
    pub assistant: String,
    /// Required weekly lecture hours.
    pub lecture_hours: u32,
    /// Required weekly tutorial hours.
    pub tutorial_hours: u32,
    /// Required weekly lab hours (always consumed two at a time).
    pub lab_hours: u32,
    /// Room capacity for lectures and tutorials.
    pub capacity: u32,
    /// Room capacity for labs.
    pub lab_capacity: u32,
    /// Pre-assigned general room, if reserved at input time.
    pub assigned_room: Option<String>,
    /// Pre-assigned lab room, if reserved at input time.
    pub assigned_lab: Option<String>,
}

impl Subject {
    /// Creates a subject with no hours, no teachers, and no reservations.
    pub fn new(
        course_id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        semester: u32,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
            department: department.into(),
            semester,
            track_core: None,
            faculty: String::new(),
            assistant: String::new(),
            lecture_hours: 0,
            tutorial_hours: 0,
            lab_hours: 0,
            capacity: 0,
            lab_capacity: 0,
            assigned_room: None,
            assigned_lab: None,
        }
    }

    /// Sets the lecturing faculty member.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = faculty.into();
        self
    }

    /// Sets the teaching assistant.
    pub fn with_assistant(mut self, assistant: impl Into<String>) -> Self {
        self.assistant = assistant.into();
        self
    }

    /// Sets the weekly hour requirements (lecture, tutorial, lab).
    pub fn with_hours(mut self, lecture: u32, tutorial: u32, lab: u32) -> Self {
        self.lecture_hours = lecture;
        self.tutorial_hours = tutorial;
        self.lab_hours = lab;
        self
    }

    /// Sets the lecture/tutorial room capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the lab room capacity.
    pub fn with_lab_capacity(mut self, capacity: u32) -> Self {
        self.lab_capacity = capacity;
        self
    }

    /// Joins a track-core group.
    pub fn with_track_core(mut self, key: impl Into<String>) -> Self {
        self.track_core = Some(key.into());
        self
    }

    /// Reserves a general room for this subject.
    pub fn with_assigned_room(mut self, room: impl Into<String>) -> Self {
        self.assigned_room = Some(room.into());
        self
    }

    /// Reserves a lab room for this subject.
    pub fn with_assigned_lab(mut self, room: impl Into<String>) -> Self {
        self.assigned_lab = Some(room.into());
        self
    }

    /// The teacher responsible for sessions of the given kind.
    ///
    /// Lectures go to the faculty member; labs and tutorials to the
    /// teaching assistant.
    pub fn teacher_for(&self, kind: SessionKind) -> &str {
        match kind {
            SessionKind::Lecture => &self.faculty,
            SessionKind::Lab | SessionKind::Tutorial => &self.assistant,
        }
    }

    /// The room capacity required for sessions of the given kind.
    pub fn capacity_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Lab => self.lab_capacity,
            _ => self.capacity,
        }
    }

    /// The pre-assigned room for the given kind, if any.
    pub fn reserved_room(&self, kind: SessionKind) -> Option<&str> {
        match kind {
            SessionKind::Lab => self.assigned_lab.as_deref(),
            _ => self.assigned_room.as_deref(),
        }
    }

    /// Required weekly hours for the given kind.
    pub fn required_hours(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Lecture => self.lecture_hours,
            SessionKind::Lab => self.lab_hours,
            SessionKind::Tutorial => self.tutorial_hours,
        }
    }

    /// Display label for a session of the given kind.
    pub fn session_label(&self, kind: SessionKind) -> String {
        format!("{}{}", self.name, kind.label_suffix())
    }
}
