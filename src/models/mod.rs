//! Timetabling domain models.
//!
//! Core data types for weekly class scheduling: the teaching week shape,
//! subjects with their hour requirements, the room inventory, the weekly
//! grid a batch fills in, and the remaining-hour counters that decide when
//! a batch is done.

mod grid;
mod requirements;
mod room;
mod subject;
mod timeslot;

pub use grid::{ScheduleGrid, Session, SlotEntry};
pub use requirements::RequirementSet;
pub use room::{Room, RoomCatalog, RoomKind};
pub use subject::{SessionKind, Subject};
pub use timeslot::{Day, TimeSlot, WeekPlan};
