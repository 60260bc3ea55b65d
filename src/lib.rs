//! Weekly class timetabling for university departments.
//!
//! Builds one weekly grid per batch of a (department, semester) group by
//! randomized slot allocation: labs first as contiguous two-slot blocks,
//! then lectures and tutorials cell by cell, with room and teacher
//! exclusivity enforced across every batch scheduled so far.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Subject`, `Room`, `RoomCatalog`,
//!   `WeekPlan`, `ScheduleGrid`, `SlotEntry`, `RequirementSet`
//! - **`validation`**: Input integrity checks (duplicate course IDs,
//!   missing teachers, odd lab hours, room supply)
//! - **`engine`**: The allocation engine, the cross-batch archive, and
//!   track-core group resolution
//! - **`error`**: The failure taxonomy for a run
//!
//! # Example
//!
//! ```
//! use classweave::engine::{AllocationEngine, BatchRequest};
//! use classweave::models::{Room, RoomCatalog, Subject, WeekPlan};
//!
//! let subjects = vec![
//!     Subject::new("CS201", "Data Structures", "CS", 3)
//!         .with_faculty("Dr. Iyer")
//!         .with_assistant("R. Menon")
//!         .with_hours(3, 1, 2)
//!         .with_capacity(60)
//!         .with_lab_capacity(30),
//! ];
//! let catalog = RoomCatalog::new(vec![
//!     Room::general("301", 60),
//!     Room::lab("CL-1", 30),
//! ]);
//!
//! let mut engine = AllocationEngine::from_seed(WeekPlan::standard(), catalog, 7);
//! let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 3, 1)]).unwrap();
//!
//! // 3 lecture cells + 1 tutorial cell + one two-slot lab block.
//! assert_eq!(ctx.grids()[0].grid.filled_count(), 6);
//! ```
//!
//! Runs are reproducible: the random source is injected, and
//! [`AllocationEngine::from_seed`](engine::AllocationEngine::from_seed)
//! yields the same archive for the same input and seed.

pub mod engine;
pub mod error;
pub mod models;
pub mod validation;

pub use error::ScheduleError;
