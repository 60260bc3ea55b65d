//! The allocation engine.
//!
//! # Algorithm
//!
//! Per batch, starting from an empty grid and a fresh requirement copy:
//!
//! 1. **Lab phase**: for each day, walk the free contiguous slot pairs
//!    (starting from a pair that rotates across batches so labs spread
//!    over the day) and draw random outstanding (subject, lab) pairs
//!    until one commits. A commit writes both slots of the pair and
//!    burns two hours.
//! 2. **Lecture/tutorial phase**: sweep the slot × day product; at each
//!    free cell, draw random outstanding pairs until one commits, then
//!    move on. Passes repeat until every counter is zero.
//! 3. Freeze the grid into the [`SchedulingContext`] under its batch
//!    label.
//!
//! Every draw is validated against the archive (cross-batch room/teacher
//! exclusivity) and the in-progress grid (back-to-back teacher rule)
//! before anything is written; a failed draw mutates nothing. Draws per
//! placement site are bounded by [`EngineConfig::max_attempts`], and a
//! full pass that commits nothing aborts the batch with
//! [`ScheduleError::Unsatisfiable`] naming a stuck pair — the engine never
//! loops forever on an infeasible input.

use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::track_core::{pick_room, TrackCoreResolver};
use super::{BatchLabel, SchedulingContext};
use crate::error::ScheduleError;
use crate::models::{
    Day, RequirementSet, RoomCatalog, ScheduleGrid, Session, SessionKind, SlotEntry, Subject,
    WeekPlan,
};
use crate::validation;

const LAB_KINDS: [SessionKind; 1] = [SessionKind::Lab];
const LECTURE_KINDS: [SessionKind; 2] = [SessionKind::Lecture, SessionKind::Tutorial];

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Random draws allowed per placement site before it is given up.
    pub max_attempts: usize,
    /// Upper bound on batches per (department, semester) group.
    pub max_batches: u32,
    /// Probability of skipping an otherwise-free cell during the
    /// lecture/tutorial sweep. Spreads sessions thinner over the week at
    /// the cost of more passes. `0.0` disables the gate; hard constraints
    /// are never affected.
    pub acceptance_noise: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 256,
            max_batches: 4,
            acceptance_noise: 0.0,
        }
    }
}

impl EngineConfig {
    /// Sets the per-site attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the batch count ceiling.
    pub fn with_max_batches(mut self, max_batches: u32) -> Self {
        self.max_batches = max_batches;
        self
    }

    /// Sets the cell-skip probability.
    pub fn with_acceptance_noise(mut self, noise: f64) -> Self {
        self.acceptance_noise = noise.clamp(0.0, 1.0);
        self
    }
}

/// One (department, semester) group to schedule, with its batch count.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Department of the group.
    pub department: String,
    /// Semester of the group.
    pub semester: u32,
    /// Number of parallel batches; each gets an independent grid.
    pub batches: u32,
}

impl BatchRequest {
    /// Creates a request.
    pub fn new(department: impl Into<String>, semester: u32, batches: u32) -> Self {
        Self {
            department: department.into(),
            semester,
            batches,
        }
    }
}

/// Orchestrates batch-by-batch allocation.
///
/// The random source is an explicit dependency: construct with
/// [`from_seed`](AllocationEngine::from_seed) for reproducible runs, or
/// [`with_rng`](AllocationEngine::with_rng) to inject any [`Rng`].
///
/// # Example
///
/// ```
/// use classweave::engine::{AllocationEngine, BatchRequest};
/// use classweave::models::{Room, RoomCatalog, Subject, WeekPlan};
///
/// let subjects = vec![
///     Subject::new("CS101", "Programming", "CS", 1)
///         .with_faculty("Dr. Rao")
///         .with_hours(2, 0, 0)
///         .with_capacity(30),
/// ];
/// let catalog = RoomCatalog::new(vec![Room::general("201", 30)]);
///
/// let mut engine = AllocationEngine::from_seed(WeekPlan::standard(), catalog, 42);
/// let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 1, 1)]).unwrap();
/// assert_eq!(ctx.grids()[0].grid.filled_count(), 2);
/// ```
pub struct AllocationEngine<R: Rng> {
    plan: WeekPlan,
    catalog: RoomCatalog,
    config: EngineConfig,
    rng: R,
    // Rotates the preferred lab pair across batches.
    lab_cursor: usize,
}

impl AllocationEngine<SmallRng> {
    /// Creates an engine with an OS-seeded random source.
    pub fn new(plan: WeekPlan, catalog: RoomCatalog) -> Self {
        Self::with_rng(plan, catalog, SmallRng::from_os_rng())
    }

    /// Creates an engine with a deterministic, seeded random source.
    pub fn from_seed(plan: WeekPlan, catalog: RoomCatalog, seed: u64) -> Self {
        Self::with_rng(plan, catalog, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AllocationEngine<R> {
    /// Creates an engine with an injected random source.
    pub fn with_rng(plan: WeekPlan, catalog: RoomCatalog, rng: R) -> Self {
        Self {
            plan,
            catalog,
            config: EngineConfig::default(),
            rng,
            lab_cursor: 0,
        }
    }

    /// Replaces the engine tunables.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Generates one schedule per requested batch.
    ///
    /// Subjects are grouped by (department, semester) per request; every
    /// batch gets an independent requirement copy and consults all
    /// earlier grids for room/teacher exclusivity. Input is validated up
    /// front; nothing is allocated when validation fails.
    pub fn run(
        &mut self,
        subjects: &[Subject],
        requests: &[BatchRequest],
    ) -> Result<SchedulingContext, ScheduleError> {
        validation::validate_input(subjects, &self.catalog)?;

        let mut ctx = SchedulingContext::new();
        for request in requests {
            if request.batches == 0 || request.batches > self.config.max_batches {
                return Err(ScheduleError::Configuration(format!(
                    "batch count {} for {} semester {} is outside 1..={}",
                    request.batches,
                    request.department,
                    request.semester,
                    self.config.max_batches
                )));
            }

            let group: Vec<Subject> = subjects
                .iter()
                .filter(|s| s.department == request.department && s.semester == request.semester)
                .cloned()
                .collect();

            for batch in 1..=request.batches {
                let mut label = BatchLabel::new(request.department.clone(), request.semester);
                if request.batches > 1 {
                    label = label.with_batch(batch);
                }
                self.schedule_batch(&group, label, &mut ctx)?;
            }
        }
        Ok(ctx)
    }

    /// Builds one batch's grid to completion and freezes it into the
    /// context.
    pub fn schedule_batch(
        &mut self,
        subjects: &[Subject],
        label: BatchLabel,
        ctx: &mut SchedulingContext,
    ) -> Result<(), ScheduleError> {
        info!("scheduling {label}: {} subject(s)", subjects.len());

        let mut grid = ScheduleGrid::new(self.plan.len());
        let mut reqs = RequirementSet::for_subjects(subjects);

        self.place_labs(subjects, &mut grid, &mut reqs, ctx)?;
        self.place_lectures(subjects, &mut grid, &mut reqs, ctx)?;

        info!("{label} complete: {} filled cell(s)", grid.filled_count());
        ctx.insert(label, grid);
        Ok(())
    }

    /// Lab phase: commits two-slot blocks until all lab hours are down.
    fn place_labs(
        &mut self,
        subjects: &[Subject],
        grid: &mut ScheduleGrid,
        reqs: &mut RequirementSet,
        ctx: &SchedulingContext,
    ) -> Result<(), ScheduleError> {
        if reqs.is_satisfied(&LAB_KINDS) {
            return Ok(());
        }

        let pairs = self.plan.lab_pairs();
        if pairs.is_empty() {
            return Err(ScheduleError::Configuration(
                "week plan has no contiguous slot pair for lab blocks".into(),
            ));
        }
        let preferred = self.lab_cursor % pairs.len();
        self.lab_cursor += 1;

        while !reqs.is_satisfied(&LAB_KINDS) {
            let mut placed_this_pass = false;
            'days: for day in Day::ALL {
                if reqs.is_satisfied(&LAB_KINDS) {
                    break;
                }
                // Every free pair of the day gets the attempt budget,
                // preferred pair first; a day blocked at one pair can
                // still host the block later in the day.
                for i in 0..pairs.len() {
                    let (a, b) = pairs[(preferred + i) % pairs.len()];
                    if !grid.is_free(day, a) || !grid.is_free(day, b) {
                        continue;
                    }
                    for _ in 0..self.config.max_attempts {
                        if self.try_session(subjects, &LAB_KINDS, grid, reqs, ctx, day, &[a, b])? {
                            placed_this_pass = true;
                            continue 'days;
                        }
                        if reqs.is_satisfied(&LAB_KINDS) {
                            break 'days;
                        }
                    }
                }
            }
            if !placed_this_pass && !reqs.is_satisfied(&LAB_KINDS) {
                return Err(self.unsatisfiable(subjects, reqs, &LAB_KINDS));
            }
        }
        Ok(())
    }

    /// Lecture/tutorial phase: sweeps the slot × day product over empty
    /// cells until all lecture and tutorial hours are down.
    fn place_lectures(
        &mut self,
        subjects: &[Subject],
        grid: &mut ScheduleGrid,
        reqs: &mut RequirementSet,
        ctx: &SchedulingContext,
    ) -> Result<(), ScheduleError> {
        while !reqs.is_satisfied(&LECTURE_KINDS) {
            let mut placed_this_pass = false;
            'cells: for slot in 0..self.plan.len() {
                for day in Day::ALL {
                    if reqs.is_satisfied(&LECTURE_KINDS) {
                        break 'cells;
                    }
                    if !grid.is_free(day, slot) {
                        continue;
                    }
                    if self.config.acceptance_noise > 0.0
                        && self.rng.random::<f64>() < self.config.acceptance_noise
                    {
                        trace!("noise gate skipped {day} slot {slot}");
                        continue;
                    }
                    for _ in 0..self.config.max_attempts {
                        if self.try_session(
                            subjects,
                            &LECTURE_KINDS,
                            grid,
                            reqs,
                            ctx,
                            day,
                            &[slot],
                        )? {
                            placed_this_pass = true;
                            break;
                        }
                    }
                }
            }
            if !placed_this_pass && !reqs.is_satisfied(&LECTURE_KINDS) {
                return Err(self.unsatisfiable(subjects, reqs, &LECTURE_KINDS));
            }
        }
        Ok(())
    }

    /// One random draw at a placement site: pick an outstanding pair,
    /// resolve resources, validate, and commit or discard.
    fn try_session(
        &mut self,
        subjects: &[Subject],
        kinds: &[SessionKind],
        grid: &mut ScheduleGrid,
        reqs: &mut RequirementSet,
        ctx: &SchedulingContext,
        day: Day,
        slots: &[usize],
    ) -> Result<bool, ScheduleError> {
        let Some((idx, kind)) = reqs.pick_random(kinds, &mut self.rng) else {
            return Ok(false);
        };
        debug_assert_eq!(kind.slot_hours() as usize, slots.len());

        match subjects[idx].track_core.clone() {
            None => Ok(self.try_standalone(subjects, idx, kind, grid, reqs, ctx, day, slots)),
            Some(key) => self.try_group(subjects, &key, kind, grid, reqs, ctx, day, slots),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn try_standalone(
        &mut self,
        subjects: &[Subject],
        idx: usize,
        kind: SessionKind,
        grid: &mut ScheduleGrid,
        reqs: &mut RequirementSet,
        ctx: &SchedulingContext,
        day: Day,
        slots: &[usize],
    ) -> bool {
        let subject = &subjects[idx];
        let teacher = subject.teacher_for(kind).to_string();
        let Some(room) = pick_room(
            subject,
            kind,
            day,
            slots,
            ctx,
            &self.catalog,
            &[],
            &mut self.rng,
        ) else {
            trace!(
                "no room for '{}' ({kind}) at {day} slot {}",
                subject.course_id,
                slots[0]
            );
            return false;
        };

        if !self.fits(grid, ctx, day, slots, &[teacher.as_str()], &[room.as_str()]) {
            return false;
        }

        let entry = SlotEntry::Single(Session::new(subject.session_label(kind), &teacher, &room));
        for &slot in slots {
            grid.set(day, slot, entry.clone());
        }
        reqs.decrement(idx, kind, kind.slot_hours());
        debug!(
            "placed '{}' ({kind}) at {day} slot {} in room {room}",
            subject.course_id, slots[0]
        );
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn try_group(
        &mut self,
        subjects: &[Subject],
        key: &str,
        kind: SessionKind,
        grid: &mut ScheduleGrid,
        reqs: &mut RequirementSet,
        ctx: &SchedulingContext,
        day: Day,
        slots: &[usize],
    ) -> Result<bool, ScheduleError> {
        let resolver = TrackCoreResolver::new(subjects, &self.catalog);
        let members = resolver.members(key, kind, reqs);
        if members.is_empty() {
            // The drawn pair was outstanding, so its group cannot be empty.
            return Err(ScheduleError::GroupCommit {
                key: key.to_string(),
            });
        }

        let Some(assignments) =
            resolver.resolve(&members, kind, day, slots, ctx, &mut self.rng)
        else {
            trace!("track core '{key}' found no room set at {day} slot {}", slots[0]);
            return Ok(false);
        };
        if assignments.len() != members.len() {
            return Err(ScheduleError::GroupCommit {
                key: key.to_string(),
            });
        }

        // Every member must pass; any failure discards the whole group
        // with nothing decremented.
        let teachers: Vec<&str> = assignments.iter().map(|a| a.teacher.as_str()).collect();
        let rooms: Vec<&str> = assignments.iter().map(|a| a.room.as_str()).collect();
        if !self.fits(grid, ctx, day, slots, &teachers, &rooms) {
            return Ok(false);
        }

        let sessions: Vec<Session> = assignments
            .iter()
            .map(|a| {
                Session::new(
                    subjects[a.subject].session_label(kind),
                    a.teacher.clone(),
                    a.room.clone(),
                )
            })
            .collect();
        let entry = SlotEntry::Merged(sessions);
        for &slot in slots {
            grid.set(day, slot, entry.clone());
        }
        for assignment in &assignments {
            reqs.decrement(assignment.subject, kind, kind.slot_hours());
        }
        debug!(
            "placed track core '{key}' ({kind}) with {} member(s) at {day} slot {}",
            assignments.len(),
            slots[0]
        );
        Ok(true)
    }

    /// Hard-constraint check for a proposed block: all slots free, no
    /// archive clash, and no back-to-back teacher around the block edges.
    fn fits(
        &self,
        grid: &ScheduleGrid,
        ctx: &SchedulingContext,
        day: Day,
        slots: &[usize],
        teachers: &[&str],
        rooms: &[&str],
    ) -> bool {
        for &slot in slots {
            if !grid.is_free(day, slot) {
                return false;
            }
            if ctx.has_conflict(day, slot, teachers, rooms) {
                return false;
            }
        }

        if let [slot] = slots {
            teachers
                .iter()
                .all(|t| grid.no_consecutive_teacher(day, *slot, t))
        } else {
            // A lab block is internally same-teacher by design; only the
            // cells bordering the block count.
            let first = slots[0];
            let last = slots[slots.len() - 1];
            teachers.iter().all(|t| {
                (first == 0 || !grid.entry(day, first - 1).has_teacher(t))
                    && (last + 1 >= grid.slot_count()
                        || !grid.entry(day, last + 1).has_teacher(t))
            })
        }
    }

    /// Builds the diagnosable failure for an exhausted pass.
    fn unsatisfiable(
        &self,
        subjects: &[Subject],
        reqs: &RequirementSet,
        kinds: &[SessionKind],
    ) -> ScheduleError {
        let (idx, kind) = reqs
            .outstanding(kinds)
            .into_iter()
            .next()
            .unwrap_or((0, kinds[0]));
        ScheduleError::Unsatisfiable {
            subject: subjects
                .get(idx)
                .map(|s| s.course_id.clone())
                .unwrap_or_default(),
            kind,
            remaining: reqs.remaining(idx, kind),
            attempts: self.config.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Room;

    fn standalone(course_id: &str, lecture: u32, tutorial: u32, lab: u32) -> Subject {
        Subject::new(course_id, format!("{course_id} name"), "CS", 1)
            .with_faculty(format!("Prof {course_id}"))
            .with_assistant(format!("TA {course_id}"))
            .with_hours(lecture, tutorial, lab)
            .with_capacity(30)
            .with_lab_capacity(30)
    }

    fn engine_with(rooms: Vec<Room>, seed: u64) -> AllocationEngine<rand::rngs::SmallRng> {
        AllocationEngine::from_seed(WeekPlan::standard(), RoomCatalog::new(rooms), seed)
    }

    /// No teacher in two adjacent cells unless both cells are the same
    /// lab block entry.
    fn assert_no_back_to_back(grid: &ScheduleGrid) {
        for day in Day::ALL {
            for slot in 1..grid.slot_count() {
                let prev = grid.entry(day, slot - 1);
                let cur = grid.entry(day, slot);
                if prev == cur {
                    continue; // the two halves of one lab block
                }
                for teacher in cur.teachers() {
                    assert!(
                        !prev.has_teacher(teacher),
                        "teacher {teacher} back-to-back on {day} at slot {slot}"
                    );
                }
            }
        }
    }

    /// No room or teacher shared between two archived grids at one
    /// (day, slot).
    fn assert_cross_grid_exclusive(ctx: &SchedulingContext) {
        let grids = ctx.grids();
        for i in 0..grids.len() {
            for j in (i + 1)..grids.len() {
                for (day, slot, entry) in grids[i].grid.iter() {
                    let other = grids[j].grid.entry(day, slot);
                    for room in entry.rooms() {
                        assert!(
                            !other.has_room(room),
                            "room {room} shared at {day} slot {slot}"
                        );
                    }
                    for teacher in entry.teachers() {
                        assert!(
                            !other.has_teacher(teacher),
                            "teacher {teacher} shared at {day} slot {slot}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_three_lectures_fill_exactly_three_cells() {
        let subjects = vec![standalone("CS101", 3, 0, 0)];
        let mut engine = engine_with(vec![Room::general("201", 30)], 11);

        let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 1, 1)]).unwrap();
        assert_eq!(ctx.len(), 1);

        let grid = &ctx.grids()[0].grid;
        assert_eq!(grid.filled_count(), 3);
        let lectures = grid
            .iter()
            .filter(|(_, _, e)| e.subjects().any(|s| s == "CS101 name"))
            .count();
        assert_eq!(lectures, 3);
        assert_no_back_to_back(grid);
    }

    #[test]
    fn test_conservation_of_hours() {
        let subjects = vec![standalone("CS101", 3, 1, 2), standalone("CS102", 2, 1, 0)];
        let rooms = vec![
            Room::general("201", 30),
            Room::general("202", 30),
            Room::lab("L1", 30),
        ];
        let mut engine = engine_with(rooms, 5);

        let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 1, 1)]).unwrap();
        let grid = &ctx.grids()[0].grid;

        let count = |label: &str| {
            grid.iter()
                .filter(|(_, _, e)| e.subjects().any(|s| s == label))
                .count()
        };
        // Every required hour appears exactly once; labs fill two cells.
        assert_eq!(count("CS101 name"), 3);
        assert_eq!(count("CS101 name (Tut)"), 1);
        assert_eq!(count("CS101 name (Lab)"), 2);
        assert_eq!(count("CS102 name"), 2);
        assert_eq!(count("CS102 name (Tut)"), 1);
        assert_eq!(grid.filled_count(), 9);
        assert_no_back_to_back(grid);
    }

    #[test]
    fn test_lab_block_atomicity() {
        let subjects = vec![standalone("CS101", 0, 0, 2)];
        let mut engine = engine_with(vec![Room::lab("L1", 30)], 17);

        let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 1, 1)]).unwrap();
        let grid = &ctx.grids()[0].grid;

        let cells: Vec<_> = grid.iter().filter(|(_, _, e)| !e.is_free()).collect();
        assert_eq!(cells.len(), 2);

        let (day_a, slot_a, entry_a) = cells[0];
        let (day_b, slot_b, entry_b) = cells[1];
        assert_eq!(day_a, day_b);
        assert_eq!(slot_b, slot_a + 1);
        assert_eq!(entry_a, entry_b);
        // Contiguous in wall-clock time, not just in index order.
        assert!(WeekPlan::standard().lab_pairs().contains(&(slot_a, slot_b)));
        assert!(entry_a.subjects().any(|s| s == "CS101 name (Lab)"));
    }

    #[test]
    fn test_track_core_tutorial_synchrony() {
        let mut a = standalone("E1", 0, 1, 0);
        a.track_core = Some("TC1".into());
        a.assistant = "TA E1".into();
        let mut b = standalone("E2", 0, 1, 0);
        b.track_core = Some("TC1".into());
        b.assistant = "TA E2".into();

        let rooms = vec![Room::general("201", 30), Room::general("202", 30)];
        let mut engine = engine_with(rooms, 23);

        let ctx = engine.run(&[a, b], &[BatchRequest::new("CS", 1, 1)]).unwrap();
        let grid = &ctx.grids()[0].grid;

        // Both members share one merged cell with distinct rooms.
        assert_eq!(grid.filled_count(), 1);
        let (_, _, entry) = grid.iter().find(|(_, _, e)| !e.is_free()).unwrap();
        let sessions = entry.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].subject, "E1 name (Tut)");
        assert_eq!(sessions[1].subject, "E2 name (Tut)");
        assert_ne!(sessions[0].room, sessions[1].room);
    }

    #[test]
    fn test_cross_batch_exclusivity() {
        let subjects = vec![standalone("CS101", 2, 0, 0)];
        let mut engine = engine_with(vec![Room::general("201", 30)], 29);

        let ctx = engine.run(&subjects, &[BatchRequest::new("CS", 1, 2)]).unwrap();
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.grids()[0].label.batch, Some(1));
        assert_eq!(ctx.grids()[1].label.batch, Some(2));

        for archived in ctx.grids() {
            assert_eq!(archived.grid.filled_count(), 2);
        }
        assert_cross_grid_exclusive(&ctx);
    }

    #[test]
    fn test_lab_falls_through_to_later_pairs_when_morning_is_taken() {
        let subjects = vec![standalone("CS101", 0, 0, 2)];
        let mut engine = engine_with(vec![Room::lab("L1", 30)], 13);

        // An earlier schedule holds L1 over the first morning pair of
        // every day; the afternoon pairs are wide open.
        let mut ctx = SchedulingContext::new();
        let mut busy = ScheduleGrid::new(7);
        for day in Day::ALL {
            for slot in [0, 1] {
                busy.set(
                    day,
                    slot,
                    SlotEntry::Single(Session::new("Other (Lab)", "TA X", "L1")),
                );
            }
        }
        ctx.insert(BatchLabel::new("EE", 1), busy);

        engine
            .schedule_batch(&subjects, BatchLabel::new("CS", 1), &mut ctx)
            .unwrap();

        let grid = ctx.get(&BatchLabel::new("CS", 1)).unwrap();
        let cells: Vec<_> = grid.iter().filter(|(_, _, e)| !e.is_free()).collect();
        assert_eq!(cells.len(), 2);
        let (day_a, slot_a, entry_a) = cells[0];
        let (day_b, slot_b, _) = cells[1];
        assert_eq!(day_a, day_b);
        assert_eq!(slot_b, slot_a + 1);
        // The block landed past the occupied morning slots.
        assert!(slot_a >= 3);
        assert!(entry_a.has_room("L1"));
    }

    #[test]
    fn test_reserved_lab_occupied_everywhere_fails_fast() {
        let subjects = vec![standalone("CS101", 0, 0, 2).with_assigned_lab("L1")];
        let rooms = vec![Room::lab("L1", 30), Room::lab("L2", 30)];
        let mut engine = engine_with(rooms, 31);

        // An unrelated schedule holds L1 at every slot of every day.
        let mut ctx = SchedulingContext::new();
        let mut busy = ScheduleGrid::new(7);
        for day in Day::ALL {
            for slot in 0..7 {
                busy.set(
                    day,
                    slot,
                    SlotEntry::Single(Session::new("Other (Lab)", "TA X", "L1")),
                );
            }
        }
        ctx.insert(BatchLabel::new("EE", 1), busy);

        // The reservation is never substituted with L2: the batch must
        // fail with a diagnosable report instead of spinning.
        let err = engine
            .schedule_batch(&subjects, BatchLabel::new("CS", 1), &mut ctx)
            .unwrap_err();
        match err {
            ScheduleError::Unsatisfiable {
                subject,
                kind,
                remaining,
                ..
            } => {
                assert_eq!(subject, "CS101");
                assert_eq!(kind, SessionKind::Lab);
                assert_eq!(remaining, 2);
            }
            other => panic!("expected Unsatisfiable, got {other}"),
        }
        // Nothing was archived for the failed batch.
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_batch_count_out_of_range() {
        let subjects = vec![standalone("CS101", 1, 0, 0)];
        let mut engine = engine_with(vec![Room::general("201", 30)], 1);

        let err = engine
            .run(&subjects, &[BatchRequest::new("CS", 1, 5)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));

        let err = engine
            .run(&subjects, &[BatchRequest::new("CS", 1, 0)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn test_run_rejects_invalid_input() {
        let mut bad = standalone("CS101", 1, 0, 0);
        bad.faculty = String::new();
        let mut engine = engine_with(vec![Room::general("201", 30)], 1);

        let err = engine.run(&[bad], &[BatchRequest::new("CS", 1, 1)]).unwrap_err();
        assert!(matches!(err, ScheduleError::Invalid(_)));
    }

    #[test]
    fn test_missing_lab_pair_is_configuration_error() {
        // Two non-contiguous slots: labs cannot be held at all.
        let plan = WeekPlan::new(vec![
            crate::models::TimeSlot::from_clock((9, 0), (10, 0)),
            crate::models::TimeSlot::from_clock((11, 0), (12, 0)),
        ]);
        let subjects = vec![standalone("CS101", 0, 0, 2)];
        let catalog = RoomCatalog::new(vec![Room::lab("L1", 30)]);
        let mut engine = AllocationEngine::from_seed(plan, catalog, 1);

        let err = engine
            .run(&subjects, &[BatchRequest::new("CS", 1, 1)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn test_full_noise_gate_fails_instead_of_looping() {
        let subjects = vec![standalone("CS101", 1, 0, 0)];
        let config = EngineConfig::default().with_acceptance_noise(1.0);
        let mut engine = engine_with(vec![Room::general("201", 30)], 2);
        engine = engine.with_config(config);

        let err = engine
            .run(&subjects, &[BatchRequest::new("CS", 1, 1)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Unsatisfiable { .. }));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let subjects = vec![standalone("CS101", 3, 1, 2), standalone("CS102", 2, 0, 0)];
        let rooms = || {
            vec![
                Room::general("201", 30),
                Room::general("202", 30),
                Room::lab("L1", 30),
            ]
        };
        let requests = [BatchRequest::new("CS", 1, 1)];

        let ctx_a = engine_with(rooms(), 99).run(&subjects, &requests).unwrap();
        let ctx_b = engine_with(rooms(), 99).run(&subjects, &requests).unwrap();

        let json_a = serde_json::to_string(&ctx_a).unwrap();
        let json_b = serde_json::to_string(&ctx_b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_requests_only_pick_their_own_subjects() {
        let cs = standalone("CS101", 1, 0, 0);
        let mut ee = standalone("EE101", 1, 0, 0);
        ee.department = "EE".into();

        let rooms = vec![Room::general("201", 30), Room::general("202", 30)];
        let mut engine = engine_with(rooms, 41);

        let ctx = engine
            .run(&[cs, ee], &[BatchRequest::new("CS", 1, 1)])
            .unwrap();
        assert_eq!(ctx.len(), 1);
        let grid = &ctx.grids()[0].grid;
        assert_eq!(grid.filled_count(), 1);
        let (_, _, entry) = grid.iter().find(|(_, _, e)| !e.is_free()).unwrap();
        assert!(entry.subjects().any(|s| s == "CS101 name"));
    }
}
