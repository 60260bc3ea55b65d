//! Allocation engine: randomized placement with clash checking.
//!
//! - [`context`]: the cross-batch archive and its conflict queries
//! - [`track_core`]: synchronized placement of elective groups
//! - [`allocator`]: the batch-by-batch engine itself

pub mod allocator;
pub mod context;
pub mod track_core;

pub use allocator::{AllocationEngine, BatchRequest, EngineConfig};
pub use context::{ArchivedGrid, BatchLabel, SchedulingContext};
pub use track_core::{GroupAssignment, TrackCoreResolver};
