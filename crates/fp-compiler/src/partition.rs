//! Waypoint partitioning and mutex-group insertion — passes 2 and 3.
//!
//! Walks the plan's waypoint list, accumulating a "move-through" run and
//! flushing it whenever a boundary interrupts continuous driving:
//!
//! - an **embedded event** (door, lift, dock, wait) — lowered via
//!   [`EventLowering`];
//! - a **dependency-only waypoint** — becomes a pure wait descriptor;
//! - a **mutex-group crossing** — flushes the run, truncates the previous
//!   reservation snapshot at the run's arrival checkpoints, and opens a
//!   lock that rides on every descriptor emitted inside the region.
//!
//! # Cursor discipline
//!
//! The original implementation erased consumed waypoints from the front of
//! a mutable vector mid-scan.  Here the waypoint list is an immutable
//! slice; each boundary shrinks a `remaining` sub-slice and the scan
//! restarts from its head.  The restart preserves an important property:
//! the waypoint that triggered a mutex boundary is re-examined under the
//! freshly opened lock, so its own run accumulation happens inside the
//! region.

use fp_actions::{ActionDescriptor, ActionKind, EventLog, MutexGroupLock};
use fp_core::{PlanId, SnapshotId, Time};
use fp_graph::NavGraph;
use fp_traffic::{Itinerary, PlanWaypoint};

use crate::lower::EventLowering;
use crate::CompileConfig;

// ── Inputs / outputs ──────────────────────────────────────────────────────────

pub(crate) struct PartitionInput<'a> {
    pub waypoints: &'a [PlanWaypoint],
    pub full_itinerary: &'a Itinerary,
    pub graph: &'a NavGraph,
    /// Version token active while compiling; locks record it.
    pub plan_id: PlanId,
    /// Estimated plan finish time; anchors the final flushed run.
    pub finish_time: Time,
    /// Robot identity for door requests and diagnostics.
    pub requester_id: &'a str,
    pub config: &'a CompileConfig,
    pub log: &'a mut EventLog,
}

pub(crate) struct PartitionOutput {
    pub descriptors: Vec<ActionDescriptor>,

    /// Reservation snapshots owned by this compilation.  Snapshot 0 is the
    /// to-be-committed itinerary; each lock references the snapshot taken
    /// at its boundary.  A snapshot is truncated when the *next* boundary
    /// is found, so none of them carries samples beyond its lock point.
    pub snapshots: Vec<Itinerary>,
}

// ── Partitioner ───────────────────────────────────────────────────────────────

pub(crate) fn partition_waypoints(input: PartitionInput<'_>) -> PartitionOutput {
    let PartitionInput {
        waypoints,
        full_itinerary,
        graph,
        plan_id,
        finish_time,
        requester_id,
        config,
        log,
    } = input;

    let mut descriptors: Vec<ActionDescriptor> = Vec::new();
    let mut snapshots: Vec<Itinerary> = vec![full_itinerary.clone()];
    let mut prev_snapshot = 0usize;

    let mut run: Vec<PlanWaypoint> = Vec::new();
    let mut current_lock: Option<MutexGroupLock> = None;

    let mut remaining = waypoints;
    while !remaining.is_empty() {
        let mut boundary_hit = false;

        let mut idx = 0;
        while idx < remaining.len() {
            let wp = &remaining[idx];

            // ── Mutex-group membership (lane wins over waypoint) ──────────
            let mut new_group = wp
                .graph_index
                .and_then(|g| graph.waypoint_mutex_group(g));
            for lane in &wp.approach_lanes {
                if let Some(g) = graph.lane_mutex_group(*lane) {
                    new_group = Some(g);
                    break;
                }
            }

            let group_change = match (&current_lock, new_group) {
                (Some(lock), Some(group)) => lock.group != group,
                (Some(_), None) => true,
                (None, Some(_)) => true,
                (None, None) => false,
            };

            if group_change {
                if let Some(group) = new_group {
                    // Entering (or switching) a mutex region.  Only a run
                    // with actual movement gets flushed; a shorter run
                    // keeps accumulating and triggers on a later waypoint.
                    if run.len() > 1 {
                        let last = &run[run.len() - 1];
                        let hold_time = last.time;
                        let hold_position = last.position;
                        let arrival = last.arrival_checkpoints.clone();
                        let deps = last.dependencies.clone();

                        let hold_map = match hold_map_for(last, remaining, graph) {
                            Some(map) => map,
                            None => {
                                tracing::error!(
                                    group,
                                    robot = requester_id,
                                    remaining = remaining.len(),
                                    "cannot find a map for a mutex group transition; \
                                     recording the hold with an empty map"
                                );
                                String::new()
                            }
                        };

                        // Cut the reservation behind us: nothing at or
                        // after the hold point may outlive the lock.
                        snapshots[prev_snapshot].truncate_at(&arrival);

                        descriptors.push(ActionDescriptor::new(
                            Some(ActionKind::Move { waypoints: run.clone() }),
                            hold_time,
                            deps,
                            current_lock.clone(),
                        ));
                        run.clear();

                        snapshots.push(full_itinerary.clone());
                        prev_snapshot = snapshots.len() - 1;
                        current_lock = Some(MutexGroupLock {
                            group: group.to_owned(),
                            hold_map,
                            hold_position,
                            hold_time,
                            plan_id,
                            resume_itinerary: SnapshotId(prev_snapshot as u32),
                        });

                        // Boundary: restart the scan from this waypoint,
                        // now inside the region.
                        remaining = &remaining[idx..];
                        boundary_hit = true;
                        break;
                    }
                } else {
                    // Leaving the region clears the lock without emitting
                    // anything; the clearing rides on the next descriptor.
                    current_lock = None;
                }
            }

            run.push(wp.clone());

            if let Some(event) = &wp.event {
                // Flush the approach to the event waypoint first.
                if run.len() > 1 {
                    descriptors.push(ActionDescriptor::new(
                        Some(ActionKind::Move { waypoints: run.clone() }),
                        wp.time,
                        wp.dependencies.clone(),
                        current_lock.clone(),
                    ));
                }
                run.clear();

                let mut lowering = EventLowering::new();
                let mut continuous = lowering.lower(wp, event, requester_id, &mut descriptors);

                // While the lift cabin is in transit, every subsequent
                // waypoint belongs to the lift, not to a move run.
                let mut last = idx;
                while lowering.moving_lift() {
                    if last + 1 >= remaining.len() {
                        // Plan ended mid-transit; the compactor will warn
                        // about the missing session end.
                        break;
                    }
                    let prev = &remaining[last];
                    last += 1;
                    let next = &remaining[last];

                    match &next.event {
                        Some(next_event) => {
                            continuous =
                                lowering.lower(next, next_event, requester_id, &mut descriptors);
                        }
                        None => {
                            let drift = prev.position.translation_distance(next.position);
                            if drift >= config.lift_drift_threshold {
                                log.warn(format!(
                                    "Plan involves a translation of [{drift:.2}m] while inside \
                                     a lift. This may indicate an error in the navigation \
                                     graph. Please report this to the system integrator."
                                ));
                            }
                            // Below the threshold this is map misalignment;
                            // either way the waypoint is consumed here.
                        }
                    }
                }

                if continuous {
                    // The next run begins where the event finished.
                    run.push(remaining[last].clone());
                }

                remaining = &remaining[last + 1..];
                boundary_hit = true;
                break;
            } else if !wp.dependencies.is_empty() {
                // No event, but traffic must clear here: flush the run (or
                // emit a pure wait point) carrying the dependency set.
                if run.len() > 1 {
                    descriptors.push(ActionDescriptor::new(
                        Some(ActionKind::Move { waypoints: run.clone() }),
                        wp.time,
                        wp.dependencies.clone(),
                        current_lock.clone(),
                    ));
                } else {
                    descriptors.push(ActionDescriptor::new(
                        None,
                        wp.time,
                        wp.dependencies.clone(),
                        current_lock.clone(),
                    ));
                }

                run.clear();
                run.push(wp.clone());

                remaining = &remaining[idx + 1..];
                boundary_hit = true;
                break;
            }

            idx += 1;
        }

        // A run that survives to the end of the list is the final move; it
        // reaches the plan's end, so it carries no dependencies.
        if !boundary_hit && run.len() > 1 {
            descriptors.push(ActionDescriptor::new(
                Some(ActionKind::Move {
                    waypoints: std::mem::take(&mut run),
                }),
                finish_time,
                Vec::new(),
                current_lock.clone(),
            ));
        }

        if !boundary_hit {
            break;
        }
    }

    PartitionOutput {
        descriptors,
        snapshots,
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map name for a hold point: the hold waypoint's own graph entry if it has
/// one, otherwise the first remaining waypoint that is on the graph.
fn hold_map_for(
    hold: &PlanWaypoint,
    remaining: &[PlanWaypoint],
    graph: &NavGraph,
) -> Option<String> {
    if let Some(map) = hold.graph_index.and_then(|g| graph.map_name(g)) {
        return Some(map.to_owned());
    }
    remaining
        .iter()
        .find_map(|wp| wp.graph_index.and_then(|g| graph.map_name(g)))
        .map(str::to_owned)
}
