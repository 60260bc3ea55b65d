//! Input validation for timetable generation.
//!
//! Checks structural integrity of subjects and rooms before any allocation
//! starts. Detects:
//! - Duplicate course ids within a (department, semester) scope
//! - Duplicate room numbers
//! - Missing teacher labels for kinds that have hours
//! - Lab hour counts that cannot form two-slot blocks
//! - Reserved rooms that do not exist or have the wrong kind
//! - Requirements no room in the catalog can ever satisfy
//! - Track-core groups split across departments or semesters
//!
//! Allocation with any of these defects either hangs the retry loop or
//! produces a grid that violates its own invariants, so everything is
//! rejected up front, in a single pass.

use std::collections::{HashMap, HashSet};

use crate::models::{RoomCatalog, SessionKind, Subject};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identifier in one scope.
    DuplicateId,
    /// A session kind has hours but no teacher label to run it.
    MissingTeacher,
    /// Lab hours are not a multiple of the two-slot block size.
    OddLabHours,
    /// A reserved room is absent from the catalog.
    UnknownReservedRoom,
    /// A reserved room exists but has the wrong kind for its sessions.
    ReservedRoomMismatch,
    /// No catalog room can ever satisfy a subject's capacity requirement.
    NoMatchingRoom,
    /// A track-core group spans more than one (department, semester).
    SplitTrackCore,
    /// A track-core key is also used as a course id.
    TrackCoreKeyCollision,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates subjects and rooms before scheduling.
///
/// Reports every detected problem at once rather than stopping at the
/// first, so a bad input sheet can be fixed in one round.
pub fn validate_input(subjects: &[Subject], rooms: &RoomCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_room_numbers(rooms, &mut errors);
    check_course_ids(subjects, &mut errors);

    for subject in subjects {
        check_teachers(subject, &mut errors);
        check_lab_hours(subject, &mut errors);
        for kind in SessionKind::ALL {
            if subject.required_hours(kind) == 0 {
                continue;
            }
            check_room_supply(subject, kind, rooms, &mut errors);
        }
    }

    check_track_cores(subjects, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_room_numbers(rooms: &RoomCatalog, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for room in rooms.iter() {
        if !seen.insert(room.number.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room number: {}", room.number),
            ));
        }
    }
}

fn check_course_ids(subjects: &[Subject], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for s in subjects {
        if !seen.insert((s.department.as_str(), s.semester, s.course_id.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!(
                    "Duplicate course id '{}' in {} semester {}",
                    s.course_id, s.department, s.semester
                ),
            ));
        }
    }
}

fn check_teachers(subject: &Subject, errors: &mut Vec<ValidationError>) {
    if subject.lecture_hours > 0 && subject.faculty.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingTeacher,
            format!(
                "Subject '{}' has lecture hours but no faculty",
                subject.course_id
            ),
        ));
    }
    if (subject.lab_hours > 0 || subject.tutorial_hours > 0)
        && subject.assistant.trim().is_empty()
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingTeacher,
            format!(
                "Subject '{}' has lab/tutorial hours but no assistant",
                subject.course_id
            ),
        ));
    }
}

fn check_lab_hours(subject: &Subject, errors: &mut Vec<ValidationError>) {
    // Labs are committed two hours at a time; an odd requirement would
    // leave one hour forever outstanding.
    if subject.lab_hours % SessionKind::Lab.slot_hours() != 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::OddLabHours,
            format!(
                "Subject '{}' has {} lab hour(s); lab blocks need an even count",
                subject.course_id, subject.lab_hours
            ),
        ));
    }
}

fn check_room_supply(
    subject: &Subject,
    kind: SessionKind,
    rooms: &RoomCatalog,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(reserved) = subject.reserved_room(kind) {
        match rooms.get(reserved) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReservedRoom,
                format!(
                    "Subject '{}' reserves unknown room '{}'",
                    subject.course_id, reserved
                ),
            )),
            Some(room) if room.kind != kind.room_kind() => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ReservedRoomMismatch,
                    format!(
                        "Subject '{}' reserves room '{}' for {} sessions, but it is not a {:?} room",
                        subject.course_id,
                        reserved,
                        kind,
                        kind.room_kind()
                    ),
                ));
            }
            Some(_) => {}
        }
        return;
    }

    if rooms
        .candidates(kind.room_kind(), subject.capacity_for(kind))
        .is_empty()
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMatchingRoom,
            format!(
                "No {:?} room of capacity {} exists for subject '{}' ({})",
                kind.room_kind(),
                subject.capacity_for(kind),
                subject.course_id,
                kind
            ),
        ));
    }
}

fn check_track_cores(subjects: &[Subject], errors: &mut Vec<ValidationError>) {
    let course_ids: HashSet<&str> = subjects.iter().map(|s| s.course_id.as_str()).collect();
    let mut scopes: HashMap<&str, HashSet<(&str, u32)>> = HashMap::new();

    for s in subjects {
        let Some(key) = s.track_core.as_deref() else {
            continue;
        };
        scopes
            .entry(key)
            .or_default()
            .insert((s.department.as_str(), s.semester));

        if course_ids.contains(key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::TrackCoreKeyCollision,
                format!(
                    "Track-core key '{key}' of subject '{}' is also a course id",
                    s.course_id
                ),
            ));
        }
    }

    for (key, members) in scopes {
        if members.len() > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::SplitTrackCore,
                format!(
                    "Track core '{key}' spans {} department/semester scopes",
                    members.len()
                ),
            ));
        }
    }
}
