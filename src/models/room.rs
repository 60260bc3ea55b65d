//! Room model and catalog.
//!
//! Rooms are immutable reference data loaded once per run. Reservation is
//! not recorded on the room; a pre-assigned room is expressed on the
//! [`Subject`](super::Subject) via its assigned-room fields.

use serde::{Deserialize, Serialize};

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Ordinary classroom for lectures and tutorials.
    General,
    /// Laboratory for practical sessions.
    Lab,
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room number, unique across the catalog.
    pub number: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Room classification.
    pub kind: RoomKind,
}

impl Room {
    /// Creates a general classroom.
    pub fn general(number: impl Into<String>, capacity: u32) -> Self {
        Self {
            number: number.into(),
            capacity,
            kind: RoomKind::General,
        }
    }

    /// Creates a laboratory.
    pub fn lab(number: impl Into<String>, capacity: u32) -> Self {
        Self {
            number: number.into(),
            capacity,
            kind: RoomKind::Lab,
        }
    }
}

/// Static lookup over the room inventory.
///
/// Pure queries only; the catalog never changes during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    /// Builds a catalog from the room inventory.
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Rooms of the requested kind with exactly the requested capacity.
    ///
    /// Capacity matching is exact, not "at least". An empty result means
    /// "no assignment possible this attempt" and is not an error.
    pub fn candidates(&self, kind: RoomKind, capacity: u32) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.kind == kind && r.capacity == capacity)
            .collect()
    }

    /// Looks up a room by number.
    pub fn get(&self, number: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.number == number)
    }

    /// All rooms in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
