//! Planner output consumed by the compiler: `Plan`, `PlanWaypoint`,
//! `PlanEvent`, `Dependency`.
//!
//! # Ordering invariant
//!
//! Waypoints arrive strictly in nondecreasing time order and the compiler
//! consumes them in that order.  The planner is responsible for producing a
//! well-ordered plan; the compiler asserts it only in debug builds.

use fp_core::{CheckpointId, Duration, LaneId, ParticipantId, PlanId, Pose, RouteId, Time, WaypointId};

use crate::itinerary::{ArrivalCheckpoint, Itinerary};

// ── Dependency ────────────────────────────────────────────────────────────────

/// A reservation checkpoint of another traffic participant that must clear
/// before the robot may proceed past the waypoint carrying this dependency.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dependency {
    pub on_participant: ParticipantId,
    pub on_plan: PlanId,
    pub on_route: RouteId,
    pub on_checkpoint: CheckpointId,
}

// ── PlanEvent ─────────────────────────────────────────────────────────────────

/// A graph event embedded in a plan waypoint.
///
/// The set is closed: the compiler lowers each variant with a single
/// exhaustive `match`, so adding a variant is a compile-time-visible change
/// everywhere it matters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanEvent {
    /// Dock at a named charger/station.  The duration is the planner's
    /// estimate of the docking maneuver.
    Dock {
        dock_name: String,
        duration: Duration,
    },

    /// Request a named door to open; `duration` is the expected opening time.
    DoorOpen {
        door_name: String,
        duration: Duration,
    },

    /// Request a named door to close behind the robot.
    DoorClose { door_name: String },

    /// Begin a lift session: summon `lift_name` to `floor_name` while the
    /// robot waits outside.
    LiftSessionBegin {
        lift_name: String,
        floor_name: String,
    },

    /// The lift cabin is moving between floors with the robot inside.
    /// Lowered to no action; its duration accumulates into the deadline of
    /// the next `LiftDoorOpen`.
    LiftMove {
        lift_name: String,
        floor_name: String,
        duration: Duration,
    },

    /// Request the lift doors to open at the destination floor while the
    /// robot is inside the cabin.
    LiftDoorOpen {
        lift_name: String,
        floor_name: String,
        duration: Duration,
    },

    /// End the lift session, releasing the lift at `floor_name`.
    LiftSessionEnd {
        lift_name: String,
        floor_name: String,
    },

    /// Hold position for `duration`.  Lowered to no action.
    Wait { duration: Duration },
}

// ── PlanWaypoint ──────────────────────────────────────────────────────────────

/// One waypoint of a navigation plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanWaypoint {
    /// Map-frame pose the robot should reach.
    pub position: Pose,

    /// Nominal arrival time.
    pub time: Time,

    /// The navigation-graph waypoint this plan waypoint sits on, if any.
    /// Off-graph waypoints (e.g. free-space docking approaches) have `None`.
    pub graph_index: Option<WaypointId>,

    /// Graph lanes the robot traverses to approach this waypoint, in order.
    pub approach_lanes: Vec<LaneId>,

    /// Embedded graph event to perform on arrival, if any.
    pub event: Option<PlanEvent>,

    /// Other participants' reservations that must clear before this point.
    pub dependencies: Vec<Dependency>,

    /// Where this waypoint lands in the robot's own reservation.
    pub arrival_checkpoints: Vec<ArrivalCheckpoint>,
}

impl PlanWaypoint {
    /// A bare move-through waypoint; attach events/dependencies with the
    /// `with_*` helpers.
    pub fn new(time: Time, position: Pose) -> Self {
        Self {
            position,
            time,
            graph_index: None,
            approach_lanes: Vec::new(),
            event: None,
            dependencies: Vec::new(),
            arrival_checkpoints: Vec::new(),
        }
    }

    pub fn with_graph_index(mut self, index: WaypointId) -> Self {
        self.graph_index = Some(index);
        self
    }

    pub fn with_approach_lanes(mut self, lanes: Vec<LaneId>) -> Self {
        self.approach_lanes = lanes;
        self
    }

    pub fn with_event(mut self, event: PlanEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_arrival_checkpoints(mut self, checkpoints: Vec<ArrivalCheckpoint>) -> Self {
        self.arrival_checkpoints = checkpoints;
        self
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// A full navigation plan: the waypoint list plus the itinerary the planner
/// reserved for it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    pub waypoints: Vec<PlanWaypoint>,
    pub itinerary: Itinerary,
}

impl Plan {
    pub fn new(waypoints: Vec<PlanWaypoint>, itinerary: Itinerary) -> Self {
        debug_assert!(
            waypoints.windows(2).all(|w| w[0].time <= w[1].time),
            "plan waypoints must be in nondecreasing time order"
        );
        Self { waypoints, itinerary }
    }
}
