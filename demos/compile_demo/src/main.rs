//! compile_demo — end-to-end example for the fleetplan compiler.
//!
//! Compiles a two-floor delivery plan for a single robot: out of the depot,
//! through a door, across a mutex-locked corridor, up a lift, and onto the
//! destination floor.  Prints the assembled action sequence, the plan's
//! event log, and the committed reservation, then drives the sequence to
//! completion with a trivial tick loop standing in for the execution
//! engine.

use std::io::Cursor;

use anyhow::Result;

use fp_actions::{
    ActionKind, EventLog, IdAssigner, PendingAction, RobotContext, StepStatus,
};
use fp_compiler::{compile_plan, CompileConfig};
use fp_core::{CheckpointId, Duration, ParticipantId, PlanId, Pose, RouteId, Time, WaypointId};
use fp_graph::load_graph_reader;
use fp_traffic::{
    ArrivalCheckpoint, Dependency, InMemorySchedule, Itinerary, Plan, PlanEvent, PlanWaypoint,
    Route, ScheduleStore, Trajectory, TrajectorySample,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROBOT_NAME: &str = "delivery_bot_1";
const FLEET_NAME: &str = "tugbots";
const TASK_ID: &str = "deliver_meds_07";

const DOOR: &str = "pharmacy_door";
const LIFT: &str = "lift_a";
const TAIL_HOLD_SECS: i64 = 30;

// ── Navigation graph CSV ──────────────────────────────────────────────────────

// Waypoints 3 and 4 sit inside a one-robot-wide corridor; 5 is the lift
// lobby on L1 and 6 is the lift cabin position on L2.
const WAYPOINTS_CSV: &str = "\
map_name,x,y,mutex_group
L1,0.0,0.0,
L1,5.0,0.0,
L1,10.0,0.0,
L1,15.0,0.0,narrow_corridor
L1,20.0,0.0,narrow_corridor
L1,25.0,0.0,
L2,25.0,0.0,
L2,30.0,0.0,
";

const LANES_CSV: &str = "\
from,to,mutex_group
0,1,
1,2,
2,3,
3,4,narrow_corridor
4,5,
5,6,
6,7,
";

// ── Plan fixture ──────────────────────────────────────────────────────────────

fn waypoint(secs: i64, x: f64, graph: u32, route: u32, checkpoint: u32) -> PlanWaypoint {
    PlanWaypoint::new(Time::from_secs(secs), Pose::new(x, 0.0, 0.0))
        .with_graph_index(WaypointId(graph))
        .with_arrival_checkpoints(vec![ArrivalCheckpoint {
            route: RouteId(route),
            checkpoint: CheckpointId(checkpoint),
        }])
}

/// The planner's output: waypoints with embedded door/lift events plus the
/// reserved itinerary backing them.
fn build_plan() -> Plan {
    let waypoints = vec![
        waypoint(0, 0.0, 0, 0, 0),
        waypoint(5, 5.0, 1, 0, 1).with_event(PlanEvent::DoorOpen {
            door_name: DOOR.into(),
            duration: Duration::from_secs(3),
        }),
        waypoint(8, 10.0, 2, 0, 2).with_event(PlanEvent::DoorClose {
            door_name: DOOR.into(),
        }),
        waypoint(12, 15.0, 3, 0, 3),
        // Another robot is scheduled through the corridor ahead of us; its
        // reservation must clear before we pass this point.
        waypoint(16, 20.0, 4, 0, 4).with_dependencies(vec![Dependency {
            on_participant: ParticipantId(7),
            on_plan: PlanId(3),
            on_route: RouteId(0),
            on_checkpoint: CheckpointId(2),
        }]),
        waypoint(20, 25.0, 5, 0, 5).with_event(PlanEvent::LiftSessionBegin {
            lift_name: LIFT.into(),
            floor_name: "L2".into(),
        }),
        waypoint(25, 25.0, 5, 0, 6).with_event(PlanEvent::LiftMove {
            lift_name: LIFT.into(),
            floor_name: "L2".into(),
            duration: Duration::from_secs(15),
        }),
        waypoint(40, 25.0, 6, 1, 0).with_event(PlanEvent::LiftDoorOpen {
            lift_name: LIFT.into(),
            floor_name: "L2".into(),
            duration: Duration::from_secs(2),
        }),
        waypoint(45, 25.0, 6, 1, 1).with_event(PlanEvent::LiftSessionEnd {
            lift_name: LIFT.into(),
            floor_name: "L2".into(),
        }),
        waypoint(50, 30.0, 7, 1, 2),
    ];

    let l1_samples = [0, 5, 8, 12, 16, 20, 25]
        .iter()
        .map(|&s| TrajectorySample {
            time: Time::from_secs(s),
            position: Pose::new(s as f64, 0.0, 0.0),
        })
        .collect();
    let l2_samples = [40, 45, 50]
        .iter()
        .map(|&s| TrajectorySample {
            time: Time::from_secs(s),
            position: Pose::new(25.0, 0.0, 0.0),
        })
        .collect();
    let itinerary = Itinerary::new(vec![
        Route::new("L1", Trajectory::new(l1_samples)),
        Route::new("L2", Trajectory::new(l2_samples)),
    ]);

    Plan::new(waypoints, itinerary)
}

// ── Pretty-printing ───────────────────────────────────────────────────────────

fn describe(step: &PendingAction) -> String {
    match step {
        PendingAction::Execute(kind) => kind.to_string(),
        PendingAction::WaitForTraffic { dependencies, time } => {
            format!("Wait for {} reservation(s) to clear at {time}", dependencies.len())
        }
        PendingAction::LockMutexGroup(lock) => format!(
            "Lock [mutex:{}] holding at {} on [{}]",
            lock.group, lock.hold_position, lock.hold_map
        ),
        PendingAction::WaitUntil(time) => format!("Hold position until {time}"),
        PendingAction::Group(group) => group.label.clone(),
    }
}

fn print_step(step: &PendingAction, indent: usize) {
    println!("{:indent$}- {}", "", describe(step), indent = indent);
    if let PendingAction::Group(group) = step {
        for member in &group.steps {
            print_step(member, indent + 2);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let graph = load_graph_reader(Cursor::new(WAYPOINTS_CSV), Cursor::new(LANES_CSV))?;
    let plan = build_plan();

    let mut ctx =
        RobotContext::new(ROBOT_NAME, FLEET_NAME, InMemorySchedule::new()).with_task(TASK_ID);
    let recommended = ctx.schedule.assign_plan_id();
    let mut ids = IdAssigner::new();
    let mut log = EventLog::new();

    let compiled = compile_plan(
        &mut ctx,
        recommended,
        &plan,
        &graph,
        Some(Duration::from_secs(TAIL_HOLD_SECS)),
        &CompileConfig::default(),
        &mut ids,
        &mut log,
    )?;

    println!(
        "Compiled plan for [{}/{}] under {}, estimated finish {}",
        FLEET_NAME, ROBOT_NAME, compiled.plan_id, compiled.finish_time
    );
    println!(
        "Committed reservation: {} route(s); {} snapshot(s) held for mutex resumption",
        ctx.schedule
            .registered()
            .map(Itinerary::route_count)
            .unwrap_or(0),
        compiled.itinerary_snapshots.len(),
    );

    println!("\nAction sequence:");
    for step in compiled.sequence.steps() {
        print_step(step, 2);
    }

    if !log.is_empty() {
        println!("\nEvent log:");
        for entry in log.entries() {
            println!("  [{:?}] {}", entry.severity, entry.message);
        }
    }

    // Stand-in for the execution engine: tick every step to completion.
    println!("\nExecuting:");
    let mut running = compiled.sequence.begin(
        |step, status| {
            if status == StepStatus::Finished {
                if let PendingAction::Execute(ActionKind::Move { waypoints }) = &step.action {
                    println!("  done: move ({} waypoints)", waypoints.len());
                } else {
                    println!("  done: {}", describe(&step.action));
                }
            }
        },
        || println!("  sequence complete"),
    );
    while !running.is_finished() {
        running.notify_started();
        running.notify_finished();
    }

    Ok(())
}
