//! Unit tests for fp-compiler.

use fp_actions::{
    ActionKind, EventLog, IdAssigner, LiftLocated, MutexGroupLock, PendingAction, RobotContext,
    Severity,
};
use fp_core::{CheckpointId, Duration, PlanId, Pose, RouteId, SnapshotId, Time, WaypointId};
use fp_graph::{NavGraph, NavGraphBuilder};
use fp_traffic::{
    ArrivalCheckpoint, InMemorySchedule, Itinerary, Plan, PlanEvent, PlanWaypoint, Route,
    ScheduleStore, Trajectory, TrajectorySample,
};

use crate::{compile_plan, CompileConfig, CompileError, CompiledPlan, CompileResult};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(secs: i64) -> Time {
    Time::from_secs(secs)
}

/// Plan waypoint at `(secs, 0)` arriving at `secs`, checkpointed at sample
/// `secs` of route 0.
fn wp(secs: i64) -> PlanWaypoint {
    PlanWaypoint::new(t(secs), Pose::new(secs as f64, 0.0, 0.0)).with_arrival_checkpoints(vec![
        ArrivalCheckpoint {
            route: RouteId(0),
            checkpoint: CheckpointId(secs as u32),
        },
    ])
}

/// One-route itinerary with per-second samples `t = 0 .. count-1`.
fn itinerary(count: i64) -> Itinerary {
    let samples = (0..count)
        .map(|s| TrajectorySample {
            time: t(s),
            position: Pose::new(s as f64, 0.0, 0.0),
        })
        .collect();
    Itinerary::new(vec![Route::new("L1", Trajectory::new(samples))])
}

fn plan(waypoints: Vec<PlanWaypoint>, itinerary_len: i64) -> Plan {
    Plan::new(waypoints, itinerary(itinerary_len))
}

fn compile(p: &Plan, graph: &NavGraph) -> (CompiledPlan, EventLog) {
    let mut ctx = RobotContext::new("r1", "fleet", InMemorySchedule::new()).with_task("deliver_1");
    let recommended = ctx.schedule.assign_plan_id();
    let (result, log) = compile_in(&mut ctx, recommended, p, graph, None);
    (result.unwrap(), log)
}

fn compile_in<S: ScheduleStore>(
    ctx: &mut RobotContext<S>,
    recommended: PlanId,
    p: &Plan,
    graph: &NavGraph,
    tail_period: Option<Duration>,
) -> (CompileResult<CompiledPlan>, EventLog) {
    let mut ids = IdAssigner::new();
    let mut log = EventLog::new();
    let result = compile_plan(
        ctx,
        recommended,
        p,
        graph,
        tail_period,
        &CompileConfig::default(),
        &mut ids,
        &mut log,
    );
    (result, log)
}

/// The move-run waypoint times of step `i`, which must be an `Execute(Move)`.
fn move_times(steps: &[PendingAction], i: usize) -> Vec<i64> {
    match &steps[i] {
        PendingAction::Execute(ActionKind::Move { waypoints }) => {
            waypoints.iter().map(|w| w.time.0 / 1_000_000_000).collect()
        }
        other => panic!("step {i} is not a move: {other:?}"),
    }
}

fn lock_steps(steps: &[PendingAction]) -> Vec<&MutexGroupLock> {
    steps
        .iter()
        .filter_map(|s| match s {
            PendingAction::LockMutexGroup(lock) => Some(lock),
            _ => None,
        })
        .collect()
}

fn group_labels(steps: &[PendingAction]) -> Vec<&str> {
    steps
        .iter()
        .filter_map(|s| match s {
            PendingAction::Group(g) => Some(g.label.as_str()),
            _ => None,
        })
        .collect()
}

fn door_open(name: &str, open_secs: i64) -> PlanEvent {
    PlanEvent::DoorOpen {
        door_name: name.into(),
        duration: Duration::from_secs(open_secs),
    }
}

fn door_close(name: &str) -> PlanEvent {
    PlanEvent::DoorClose {
        door_name: name.into(),
    }
}

fn lift_begin(lift: &str, floor: &str) -> PlanEvent {
    PlanEvent::LiftSessionBegin {
        lift_name: lift.into(),
        floor_name: floor.into(),
    }
}

fn lift_move(lift: &str, floor: &str, secs: i64) -> PlanEvent {
    PlanEvent::LiftMove {
        lift_name: lift.into(),
        floor_name: floor.into(),
        duration: Duration::from_secs(secs),
    }
}

fn lift_door_open(lift: &str, floor: &str, secs: i64) -> PlanEvent {
    PlanEvent::LiftDoorOpen {
        lift_name: lift.into(),
        floor_name: floor.into(),
        duration: Duration::from_secs(secs),
    }
}

fn lift_end(lift: &str, floor: &str) -> PlanEvent {
    PlanEvent::LiftSessionEnd {
        lift_name: lift.into(),
        floor_name: floor.into(),
    }
}

// ── Plain moves ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod moves {
    use super::*;

    #[test]
    fn event_free_plan_is_one_move() {
        let p = plan((0..5).map(wp).collect(), 5);
        let (compiled, log) = compile(&p, &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(move_times(steps, 0), vec![0, 1, 2, 3, 4]);
        assert_eq!(compiled.finish_time, t(4));
        assert!(log.is_empty());
    }

    #[test]
    fn single_waypoint_plan_produces_no_actions() {
        let p = plan(vec![wp(0)], 1);
        let (compiled, _) = compile(&p, &NavGraph::empty());
        assert!(compiled.sequence.is_empty());
    }

    #[test]
    fn empty_itinerary_fails_compilation() {
        let mut ctx = RobotContext::new("r1", "fleet", InMemorySchedule::new());
        let id = ctx.schedule.assign_plan_id();
        let p = Plan::new(vec![wp(0), wp(1)], Itinerary::default());
        let (result, _) = compile_in(&mut ctx, id, &p, &NavGraph::empty(), None);
        assert!(matches!(result, Err(CompileError::EmptyPlan)));
    }

    #[test]
    fn dependency_boundary_splits_moves_without_gaps() {
        let mut waypoints: Vec<PlanWaypoint> = (0..5).map(wp).collect();
        waypoints[2] = waypoints[2].clone().with_dependencies(vec![dep(7)]);
        let p = plan(waypoints, 5);
        let (compiled, _) = compile(&p, &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(move_times(steps, 0), vec![0, 1, 2]);
        assert!(matches!(steps[1], PendingAction::WaitForTraffic { .. }));
        // The next run re-includes the boundary waypoint: no timeline gap.
        assert_eq!(move_times(steps, 2), vec![2, 3, 4]);
    }

    #[test]
    fn dependency_only_waypoint_becomes_pure_wait() {
        let mut waypoints: Vec<PlanWaypoint> = (0..3).map(wp).collect();
        waypoints[0] = waypoints[0].clone().with_dependencies(vec![dep(9)]);
        let p = plan(waypoints, 3);
        let (compiled, _) = compile(&p, &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(steps.len(), 2);
        match &steps[0] {
            PendingAction::WaitForTraffic { dependencies, time } => {
                assert_eq!(dependencies.len(), 1);
                assert_eq!(*time, t(0));
            }
            other => panic!("expected a traffic wait, got {other:?}"),
        }
        assert_eq!(move_times(steps, 1), vec![0, 1, 2]);
    }

    #[test]
    fn tail_period_appends_wait_until_plan_end() {
        let p = plan((0..4).map(wp).collect(), 4);
        let mut ctx = RobotContext::new("r1", "fleet", InMemorySchedule::new());
        let id = ctx.schedule.assign_plan_id();
        let (result, _) = compile_in(&mut ctx, id, &p, &NavGraph::empty(), Some(Duration::from_secs(30)));

        let compiled = result.unwrap();
        let steps = compiled.sequence.steps();
        assert_eq!(steps.last(), Some(&PendingAction::WaitUntil(t(3))));
    }

    fn dep(participant: u64) -> fp_traffic::Dependency {
        fp_traffic::Dependency {
            on_participant: fp_core::ParticipantId(participant),
            on_plan: PlanId(1),
            on_route: RouteId(0),
            on_checkpoint: CheckpointId(0),
        }
    }
}

// ── Event lowering ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lowering {
    use super::*;
    use crate::lower::EventLowering;

    fn lower_one(event: PlanEvent) -> (Vec<fp_actions::ActionDescriptor>, bool) {
        let mut out = Vec::new();
        let mut lowering = EventLowering::new();
        let continuous = lowering.lower(&wp(10), &event, "fleet/r1", &mut out);
        (out, continuous)
    }

    #[test]
    fn dock_is_not_continuous() {
        let (out, continuous) = lower_one(PlanEvent::Dock {
            dock_name: "charger_1".into(),
            duration: Duration::from_secs(5),
        });
        assert_eq!(out.len(), 1);
        assert!(!continuous);
        assert!(matches!(
            out[0].action,
            Some(ActionKind::Dock { ref dock_name }) if dock_name == "charger_1"
        ));
    }

    #[test]
    fn wait_lowers_to_nothing() {
        let (out, continuous) = lower_one(PlanEvent::Wait {
            duration: Duration::from_secs(5),
        });
        assert!(out.is_empty());
        assert!(!continuous);
    }

    #[test]
    fn door_open_deadline_includes_duration() {
        let (out, continuous) = lower_one(door_open("main", 4));
        assert!(continuous);
        match &out[0].action {
            Some(ActionKind::DoorOpen {
                expected_finish,
                requester_id,
                ..
            }) => {
                assert_eq!(*expected_finish, t(14));
                assert_eq!(requester_id, "fleet/r1");
            }
            other => panic!("unexpected lowering: {other:?}"),
        }
    }

    #[test]
    fn lift_move_accumulates_into_lift_door_deadline() {
        let mut out = Vec::new();
        let mut lowering = EventLowering::new();

        lowering.lower(&wp(10), &lift_move("L1", "floor_2", 8), "fleet/r1", &mut out);
        assert!(lowering.moving_lift());
        assert!(out.is_empty());

        lowering.lower(&wp(20), &lift_move("L1", "floor_2", 7), "fleet/r1", &mut out);
        assert!(lowering.moving_lift());

        let continuous = lowering.lower(
            &wp(30),
            &lift_door_open("L1", "floor_2", 2),
            "fleet/r1",
            &mut out,
        );
        assert!(continuous);
        assert!(!lowering.moving_lift());
        match &out[0].action {
            Some(ActionKind::RequestLift {
                deadline, located, ..
            }) => {
                // event start (30) + door duration (2) + accumulated lift
                // travel (8 + 7)
                assert_eq!(*deadline, t(47));
                assert_eq!(*located, LiftLocated::Inside);
            }
            other => panic!("unexpected lowering: {other:?}"),
        }
    }

    #[test]
    fn session_begin_is_an_outside_request() {
        let (out, continuous) = lower_one(lift_begin("L1", "floor_2"));
        assert!(continuous);
        assert!(matches!(
            out[0].action,
            Some(ActionKind::RequestLift {
                located: LiftLocated::Outside,
                ..
            })
        ));
    }
}

// ── Door folding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod doors {
    use super::*;

    fn door_plan(close_secs: i64, close_name: &str) -> Plan {
        let waypoints = vec![
            wp(0),
            wp(10).with_event(door_open("main", 3)),
            wp(close_secs).with_event(door_close(close_name)),
            wp(close_secs + 1),
        ];
        plan(waypoints, close_secs + 2)
    }

    #[test]
    fn open_then_close_folds_into_one_group() {
        let (compiled, log) = compile(&door_plan(12, "main"), &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(group_labels(steps), vec!["Pass through [door:main]"]);
        assert!(log.is_empty());

        // approach move, group, departing move
        assert_eq!(steps.len(), 3);
        match &steps[1] {
            PendingAction::Group(g) => assert_eq!(g.steps.len(), 3),
            other => panic!("expected the door group, got {other:?}"),
        }
    }

    #[test]
    fn long_travel_between_open_and_close_prevents_folding() {
        // 70 s of driving between the open and the close.
        let (compiled, log) = compile(&door_plan(80, "main"), &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert!(group_labels(steps).is_empty());
        // open, move, close all emitted standalone
        assert_eq!(steps.len(), 5);
        assert!(log.is_empty());
    }

    #[test]
    fn different_door_close_prevents_folding() {
        let (compiled, log) = compile(&door_plan(12, "other"), &NavGraph::empty());
        assert!(group_labels(compiled.sequence.steps()).is_empty());
        // Door mismatches degrade silently; only lift mismatches warn.
        assert!(log.is_empty());
    }
}

// ── Lift folding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifts {
    use super::*;

    fn lift_plan(release: PlanEvent) -> Plan {
        let waypoints = vec![
            wp(0),
            wp(10).with_event(lift_begin("L1", "floor_2")),
            wp(12).with_event(lift_move("L1", "floor_2", 10)),
            wp(25).with_event(lift_door_open("L1", "floor_2", 2)),
            wp(30).with_event(release),
            wp(31),
        ];
        plan(waypoints, 32)
    }

    #[test]
    fn ride_folds_with_destination_floor_label() {
        let (compiled, log) = compile(&lift_plan(lift_end("L1", "floor_2")), &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(group_labels(steps), vec!["Take [lift:L1] to [floor:floor_2]"]);
        assert!(log.is_empty());

        match steps.iter().find(|s| matches!(s, PendingAction::Group(_))) {
            Some(PendingAction::Group(g)) => {
                // request-outside, move, request-inside, move, release
                assert_eq!(g.steps.len(), 5);
                assert!(matches!(
                    g.steps[0],
                    PendingAction::Execute(ActionKind::RequestLift {
                        located: LiftLocated::Outside,
                        ..
                    })
                ));
                assert!(matches!(
                    g.steps[4],
                    PendingAction::Execute(ActionKind::EndLiftSession { .. })
                ));
            }
            _ => panic!("lift ride did not fold"),
        }
    }

    #[test]
    fn mismatched_release_warns_and_falls_back_to_ungrouped() {
        let (compiled, log) = compile(&lift_plan(lift_end("L2", "floor_2")), &NavGraph::empty());

        assert!(group_labels(compiled.sequence.steps()).is_empty());
        let warnings: Vec<&str> = log.messages_at(Severity::Warning).collect();
        // Both lift requests independently discover the bad release.
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("ending a session with [lift:L2]"));
    }

    #[test]
    fn unterminated_session_warns() {
        let waypoints = vec![wp(0), wp(10).with_event(lift_begin("L1", "floor_2")), wp(11)];
        let p = plan(waypoints, 12);
        let (compiled, log) = compile(&p, &NavGraph::empty());

        assert!(group_labels(compiled.sequence.steps()).is_empty());
        let warnings: Vec<&str> = log.messages_at(Severity::Warning).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("neglects to end a session with [lift:L1]"));
    }

    #[test]
    fn small_drift_inside_moving_lift_is_silent() {
        let (log, step_count) = compile_drift_plan(0.2);
        assert!(log.is_empty());
        // The drifting waypoint was consumed by the lift, not partitioned
        // into a move.
        assert_eq!(step_count, 7);
    }

    #[test]
    fn large_drift_inside_moving_lift_warns_but_compiles() {
        let (log, step_count) = compile_drift_plan(3.0);
        let warnings: Vec<&str> = log.messages_at(Severity::Warning).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("translation of"));
        assert_eq!(step_count, 7);
    }

    /// Lift ride with one event-free waypoint while the cabin moves,
    /// displaced by `drift` metres.  Returns the log and the flattened
    /// step count of the compiled sequence.
    fn compile_drift_plan(drift: f64) -> (EventLog, usize) {
        let mut drifted = PlanWaypoint::new(t(20), Pose::new(12.0 + drift, 0.0, 0.0));
        drifted.arrival_checkpoints = vec![ArrivalCheckpoint {
            route: RouteId(0),
            checkpoint: CheckpointId(20),
        }];
        let waypoints = vec![
            wp(0),
            wp(10).with_event(lift_begin("L1", "floor_2")),
            wp(12).with_event(lift_move("L1", "floor_2", 10)),
            drifted,
            wp(25).with_event(lift_door_open("L1", "floor_2", 2)),
            wp(30).with_event(lift_end("L1", "floor_2")),
            wp(31),
        ];
        let p = plan(waypoints, 32);
        let (compiled, log) = compile(&p, &NavGraph::empty());

        let flattened = compiled.sequence.begin(|_, _| {}, || {});
        (log, flattened.step_count())
    }
}

// ── Mutex groups ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod mutex_groups {
    use super::*;

    /// Graph with waypoints 0..n; indices in `grouped` belong to the named
    /// mutex group.
    fn graph_with_groups(n: u32, grouped: &[(u32, &str)]) -> NavGraph {
        let mut b = NavGraphBuilder::new();
        for i in 0..n {
            b.add_waypoint("L1", i as f64, 0.0);
        }
        for (i, group) in grouped {
            b.set_waypoint_mutex_group(WaypointId(*i), *group);
        }
        b.build()
    }

    fn on_graph(secs: i64) -> PlanWaypoint {
        wp(secs).with_graph_index(WaypointId(secs as u32))
    }

    #[test]
    fn crossing_flushes_run_truncates_and_locks() {
        let graph = graph_with_groups(4, &[(2, "G"), (3, "G")]);
        let p = plan((0..4).map(on_graph).collect(), 6);
        let (compiled, _) = compile(&p, &graph);

        let steps = compiled.sequence.steps();
        // approach move, lock, in-region move
        assert_eq!(steps.len(), 3);
        assert_eq!(move_times(steps, 0), vec![0, 1]);

        let locks = lock_steps(steps);
        assert_eq!(locks.len(), 1);
        let lock = locks[0];
        assert_eq!(lock.group, "G");
        assert_eq!(lock.hold_time, t(1));
        assert_eq!(lock.hold_map, "L1");
        assert_eq!(lock.resume_itinerary, SnapshotId(1));

        // The committed snapshot was truncated at the hold point: nothing
        // at or after t=1 survives.
        assert_eq!(compiled.itinerary_snapshots.len(), 2);
        let committed = &compiled.itinerary_snapshots[0];
        assert!(committed
            .routes()
            .iter()
            .flat_map(|r| r.trajectory.samples())
            .all(|s| s.time < t(1)));
        // The lock's resume snapshot is the untouched full reservation.
        assert_eq!(compiled.itinerary_snapshots[1].finish_time(), Some(t(5)));
    }

    #[test]
    fn committed_reservation_matches_truncated_snapshot() {
        let graph = graph_with_groups(4, &[(2, "G"), (3, "G")]);
        let p = plan((0..4).map(on_graph).collect(), 6);

        let mut ctx = RobotContext::new("r1", "fleet", InMemorySchedule::new());
        let id = ctx.schedule.assign_plan_id();
        let (result, _) = compile_in(&mut ctx, id, &p, &graph, None);
        let compiled = result.unwrap();

        assert_eq!(
            ctx.schedule.registered(),
            Some(&compiled.itinerary_snapshots[0])
        );
    }

    #[test]
    fn leaving_a_region_emits_nothing() {
        // Enter G at waypoint 2, leave it at waypoint 4, keep driving.
        let graph = graph_with_groups(6, &[(2, "G"), (3, "G")]);
        let p = plan((0..6).map(on_graph).collect(), 6);
        let (compiled, _) = compile(&p, &graph);

        let steps = compiled.sequence.steps();
        // Clearing the group adds no standalone action: just the approach
        // move and the final move spanning the rest of the plan.
        assert_eq!(steps.len(), 2);
        assert_eq!(move_times(steps, 0), vec![0, 1]);
        assert_eq!(move_times(steps, 1), vec![2, 3, 4, 5]);
    }

    #[test]
    fn switching_groups_keeps_one_lock_active_at_a_time() {
        let graph = graph_with_groups(6, &[(2, "G1"), (3, "G1"), (4, "G2"), (5, "G2")]);
        let p = plan((0..6).map(on_graph).collect(), 8);
        let (compiled, _) = compile(&p, &graph);

        let steps = compiled.sequence.steps();
        let locks = lock_steps(steps);
        assert_eq!(locks.len(), 2);
        assert_eq!(locks[0].group, "G1");
        assert_eq!(locks[1].group, "G2");
        // Each boundary snapshots a fresh forward reservation.
        assert_eq!(locks[0].resume_itinerary, SnapshotId(1));
        assert_eq!(locks[1].resume_itinerary, SnapshotId(2));
        assert_eq!(compiled.itinerary_snapshots.len(), 3);

        // G1's snapshot was truncated when G2's boundary was found: its
        // samples all precede the G2 hold point at t=3.
        assert!(compiled.itinerary_snapshots[1]
            .routes()
            .iter()
            .flat_map(|r| r.trajectory.samples())
            .all(|s| s.time < t(3)));
    }

    #[test]
    fn lane_membership_overrides_waypoint_membership() {
        let mut b = NavGraphBuilder::new();
        for i in 0..4 {
            b.add_waypoint("L1", i as f64, 0.0);
        }
        b.set_waypoint_mutex_group(WaypointId(2), "from_waypoint");
        let lane = b.add_lane(WaypointId(1), WaypointId(2));
        b.set_lane_mutex_group(lane, "from_lane");
        let graph = b.build();

        let mut waypoints: Vec<PlanWaypoint> = (0..4).map(on_graph).collect();
        waypoints[2] = waypoints[2].clone().with_approach_lanes(vec![lane]);
        let p = plan(waypoints, 6);
        let (compiled, _) = compile(&p, &graph);

        let locks = lock_steps(compiled.sequence.steps());
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].group, "from_lane");
    }

    #[test]
    fn unmapped_hold_point_records_empty_map() {
        // Mutex membership comes from an approach lane, but no waypoint in
        // the plan is on the graph, so the hold map cannot be resolved.
        let mut b = NavGraphBuilder::new();
        let a = b.add_waypoint("L1", 0.0, 0.0);
        let c = b.add_waypoint("L1", 1.0, 0.0);
        let lane = b.add_lane(a, c);
        b.set_lane_mutex_group(lane, "G");
        let graph = b.build();

        let mut waypoints: Vec<PlanWaypoint> = (0..4).map(wp).collect();
        waypoints[2] = waypoints[2].clone().with_approach_lanes(vec![lane]);
        waypoints[3] = waypoints[3].clone().with_approach_lanes(vec![lane]);
        let p = plan(waypoints, 6);
        let (compiled, log) = compile(&p, &graph);

        let locks = lock_steps(compiled.sequence.steps());
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].hold_map, "");
        // Operator diagnostics go to tracing only; the plan's event log
        // stays clean.
        assert!(log.is_empty());
    }
}

// ── Commit retries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod commit {
    use super::*;

    /// Schedule store that rejects the first `fail_remaining` commits.
    struct FlakySchedule {
        fail_remaining: u32,
        commit_calls: u32,
        assigned: Vec<PlanId>,
        next: u64,
        current: PlanId,
        registered: Option<Itinerary>,
    }

    impl FlakySchedule {
        fn new(failures: u32) -> Self {
            Self {
                fail_remaining: failures,
                commit_calls: 0,
                assigned: Vec::new(),
                next: 1,
                current: PlanId(0),
                registered: None,
            }
        }
    }

    impl ScheduleStore for FlakySchedule {
        fn current_plan_id(&self) -> PlanId {
            self.current
        }

        fn assign_plan_id(&mut self) -> PlanId {
            let id = PlanId(self.next);
            self.next += 1;
            self.assigned.push(id);
            id
        }

        fn commit(&mut self, plan_id: PlanId, itinerary: Itinerary) -> bool {
            self.commit_calls += 1;
            if self.fail_remaining > 0 {
                self.fail_remaining -= 1;
                return false;
            }
            self.current = plan_id;
            self.registered = Some(itinerary);
            true
        }
    }

    #[test]
    fn retries_with_fresh_ids_until_accepted() {
        let mut ctx = RobotContext::new("r1", "fleet", FlakySchedule::new(3)).with_task("t1");
        let recommended = ctx.schedule.assign_plan_id();
        let p = plan((0..3).map(wp).collect(), 3);
        let (result, log) = compile_in(&mut ctx, recommended, &p, &NavGraph::empty(), None);

        let compiled = result.unwrap();
        assert_eq!(ctx.schedule.commit_calls, 4);
        // Three rejections → three fresh ids, each distinct; the last one
        // is what the plan committed under.
        assert_ne!(compiled.plan_id, recommended);
        assert_eq!(compiled.plan_id, *ctx.schedule.assigned.last().unwrap());
        let mut unique = ctx.schedule.assigned.clone();
        unique.dedup();
        assert_eq!(unique.len(), ctx.schedule.assigned.len());

        assert_eq!(log.messages_at(Severity::Error).count(), 3);
    }

    #[test]
    fn gives_up_after_five_retries() {
        let mut ctx = RobotContext::new("r1", "fleet", FlakySchedule::new(100)).with_task("t1");
        let recommended = ctx.schedule.assign_plan_id();
        let p = plan((0..3).map(wp).collect(), 3);
        let (result, log) = compile_in(&mut ctx, recommended, &p, &NavGraph::empty(), None);

        assert!(matches!(
            result,
            Err(CompileError::CommitRejected { attempts: 6 })
        ));
        // One initial attempt plus five retries.
        assert_eq!(ctx.schedule.commit_calls, 6);
        assert_eq!(log.messages_at(Severity::Error).count(), 6);
    }

    #[test]
    fn locks_are_rebound_to_the_committed_version() {
        let mut b = NavGraphBuilder::new();
        for i in 0..4 {
            b.add_waypoint("L1", i as f64, 0.0);
        }
        b.set_waypoint_mutex_group(WaypointId(2), "G");
        b.set_waypoint_mutex_group(WaypointId(3), "G");
        let graph = b.build();

        let waypoints = (0..4)
            .map(|i| wp(i).with_graph_index(WaypointId(i as u32)))
            .collect();
        let p = plan(waypoints, 6);

        let mut ctx = RobotContext::new("r1", "fleet", FlakySchedule::new(1));
        let recommended = ctx.schedule.assign_plan_id();
        let (result, _) = compile_in(&mut ctx, recommended, &p, &graph, None);

        let compiled = result.unwrap();
        assert_ne!(compiled.plan_id, recommended);
        let locks = lock_steps(compiled.sequence.steps());
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].plan_id, compiled.plan_id);
    }
}

// ── Continuity ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod continuity {
    use super::*;

    #[test]
    fn door_events_reseed_the_next_run() {
        let waypoints = vec![
            wp(0),
            wp(10).with_event(door_open("main", 3)),
            wp(80).with_event(door_close("main")),
            wp(81),
        ];
        let p = plan(waypoints, 82);
        let (compiled, _) = compile(&p, &NavGraph::empty());

        // Folding was prevented by the 70 s crossing, so the raw moves are
        // visible: each run begins at the previous event's waypoint.
        let steps = compiled.sequence.steps();
        assert_eq!(move_times(steps, 0), vec![0, 10]);
        assert_eq!(move_times(steps, 2), vec![10, 80]);
        assert_eq!(move_times(steps, 4), vec![80, 81]);
    }

    #[test]
    fn wait_event_does_not_reseed_the_next_run() {
        let waypoints = vec![wp(0), wp(5).with_event(PlanEvent::Wait {
            duration: Duration::from_secs(3),
        }), wp(10), wp(11)];
        let p = plan(waypoints, 12);
        let (compiled, _) = compile(&p, &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(move_times(steps, 0), vec![0, 5]);
        // The run after the wait starts at the next waypoint, not at the
        // wait point.
        assert_eq!(move_times(steps, 1), vec![10, 11]);
    }

    #[test]
    fn dock_event_does_not_reseed_the_next_run() {
        let waypoints = vec![
            wp(0),
            wp(5).with_event(PlanEvent::Dock {
                dock_name: "charger_1".into(),
                duration: Duration::from_secs(10),
            }),
            wp(20),
            wp(21),
        ];
        let p = plan(waypoints, 22);
        let (compiled, _) = compile(&p, &NavGraph::empty());

        let steps = compiled.sequence.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(move_times(steps, 0), vec![0, 5]);
        assert!(matches!(
            steps[1],
            PendingAction::Execute(ActionKind::Dock { .. })
        ));
        assert_eq!(move_times(steps, 2), vec![20, 21]);
    }
}
