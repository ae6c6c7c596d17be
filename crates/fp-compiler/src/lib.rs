//! `fp-compiler` — turns a continuous navigation plan into a discrete,
//! orchestrator-ready action sequence.
//!
//! # Pipeline
//!
//! [`compile_plan`] runs six passes, strictly in order; no pass re-enters
//! an earlier one:
//!
//! 1. **Event lowering** ([`lower`]) — each graph-embedded event becomes
//!    zero or one typed action descriptors.
//! 2. **Waypoint partitioning** ([`partition`]) — contiguous waypoints
//!    group into move runs, flushed at event / dependency / mutex-group
//!    boundaries.
//! 3. **Mutex-group insertion** (also [`partition`]) — crossing into a
//!    mutually-exclusive segment flushes the run, truncates the previous
//!    reservation snapshot, and opens a lock.
//! 4. **Group compaction** ([`compact`]) — door pass-throughs and lift
//!    rides fold into labeled composite groups.
//! 5. **Sequence assembly** ([`assemble`]) — dependency waits and the
//!    optional tail wait join the folded list into one ordered sequence.
//! 6. **Itinerary commit** ([`commit`]) — the finalized reservation is
//!    registered in the shared schedule, retrying under fresh plan
//!    versions, bounded.
//!
//! # Failure taxonomy
//!
//! Only two conditions are fatal: a plan with no forward-time trajectory
//! ([`CompileError::EmptyPlan`]) and an exhausted commit-retry budget
//! ([`CompileError::CommitRejected`]).  Everything else — mismatched
//! door/lift identities, unterminated lift sessions, unmapped hold points,
//! anomalous translation inside a lift — degrades conservatively and lands
//! in the caller's [`EventLog`].

use thiserror::Error;

use fp_actions::{ActionSequence, EventLog, IdAssigner, RobotContext};
use fp_core::{Duration, PlanId, Time};
use fp_graph::NavGraph;
use fp_traffic::{Itinerary, Plan, ScheduleStore};

mod assemble;
mod commit;
mod compact;
mod lower;
mod partition;

#[cfg(test)]
mod tests;

// ── CompileConfig ─────────────────────────────────────────────────────────────

/// Tunable compilation limits.  The defaults match fleet-wide conventions;
/// applications override individual fields from their own configuration
/// layer.
#[derive(Clone, Debug)]
pub struct CompileConfig {
    /// How many times the committer may retry under a freshly assigned plan
    /// version before giving up.
    pub commit_retry_limit: u32,

    /// Maximum cumulative travel time allowed between a door-open and its
    /// door-close for the pair to fold into one pass-through group.
    pub door_fold_travel_budget: Duration,

    /// Positional drift between consecutive waypoints inside a moving lift
    /// below which the discrepancy is treated as map misalignment and
    /// skipped silently.  At or above it, a warning is logged.
    pub lift_drift_threshold: f64,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            commit_retry_limit: 5,
            door_fold_travel_budget: Duration::from_mins(1),
            lift_drift_threshold: 0.5,
        }
    }
}

// ── CompileError ──────────────────────────────────────────────────────────────

/// Hard compilation failures.  The caller is expected to request a new plan
/// from the planner in either case.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The itinerary contains no forward-time trajectory at all.
    #[error("plan has no forward-time trajectory to execute")]
    EmptyPlan,

    /// The shared schedule rejected the reservation repeatedly, even under
    /// freshly assigned plan versions.
    #[error("schedule rejected the itinerary after {attempts} attempts")]
    CommitRejected { attempts: u32 },
}

pub type CompileResult<T> = Result<T, CompileError>;

// ── CompiledPlan ──────────────────────────────────────────────────────────────

/// The finished product: an ordered action sequence plus the reservation it
/// was committed under.
pub struct CompiledPlan {
    /// The plan version the reservation was registered with (the
    /// recommended id, or a reassigned one if commits were rejected).
    pub plan_id: PlanId,

    /// Latest trajectory finish time across the reserved routes.
    pub finish_time: Time,

    /// The executable sequence.  Hand to the execution engine via
    /// [`ActionSequence::begin`].
    pub sequence: ActionSequence,

    /// Itinerary snapshots owned by this compilation.  Snapshot 0 is the
    /// committed reservation (truncated at the first lock boundary, if
    /// any); each mutex lock references the snapshot to resume with by
    /// [`SnapshotId`][fp_core::SnapshotId].
    pub itinerary_snapshots: Vec<Itinerary>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Compile `plan` into an executable sequence for the robot in `ctx`.
///
/// `recommended_plan_id` is the version the planner suggests committing
/// under; the committer substitutes freshly assigned versions if the shared
/// schedule rejects it.  `tail_period` requests a trailing hold: the
/// sequence will not finish before the final plan time even if the robot
/// arrives early.
///
/// Graph-inconsistency diagnostics accumulate in `log`; they never fail
/// compilation.
pub fn compile_plan<S: ScheduleStore>(
    ctx: &mut RobotContext<S>,
    recommended_plan_id: PlanId,
    plan: &Plan,
    graph: &NavGraph,
    tail_period: Option<Duration>,
    config: &CompileConfig,
    ids: &mut IdAssigner,
    log: &mut EventLog,
) -> CompileResult<CompiledPlan> {
    let finish_time = plan
        .itinerary
        .finish_time()
        .ok_or(CompileError::EmptyPlan)?;

    // Passes 1–3: lower events and partition waypoints into descriptors,
    // snapshotting and truncating the reservation at each lock boundary.
    let requester_id = ctx.requester_id();
    let partitioned = partition::partition_waypoints(partition::PartitionInput {
        waypoints: &plan.waypoints,
        full_itinerary: &plan.itinerary,
        graph,
        plan_id: recommended_plan_id,
        finish_time,
        requester_id: &requester_id,
        config,
        log,
    });

    // Pass 4: fold door pass-throughs and lift rides.
    let steps = compact::compact_descriptors(&partitioned.descriptors, ids, config, log);

    // Pass 5: append the tail wait, if requested.
    let mut steps = assemble::assemble_steps(steps, &partitioned.descriptors, tail_period);

    // Pass 6: register the reservation, then rebind any lock actions to the
    // version it actually committed under.
    let plan_id = commit::commit_itinerary(
        ctx,
        recommended_plan_id,
        &partitioned.snapshots[0],
        config.commit_retry_limit,
        log,
    )?;
    if plan_id != recommended_plan_id {
        commit::rebind_plan_version(&mut steps, plan_id);
    }

    Ok(CompiledPlan {
        plan_id,
        finish_time,
        sequence: ActionSequence::new(steps),
        itinerary_snapshots: partitioned.snapshots,
    })
}
