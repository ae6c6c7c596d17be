//! Action descriptors — the intermediate unit between waypoint partitioning
//! and sequence assembly.
//!
//! A descriptor is one slot in the linear list the compiler builds while
//! walking the plan: an optional action payload (absent ⇒ a pure wait
//! point), the nominal time it anchors to, the traffic dependencies that
//! must clear at it, and — for descriptors emitted inside a mutex region —
//! the pending lock that must be acquired before it runs.

use std::fmt;

use fp_core::{Duration, PlanId, Pose, SnapshotId, Time};
use fp_traffic::{Dependency, PlanWaypoint};

// ── LiftLocated ───────────────────────────────────────────────────────────────

/// Where the robot is relative to the lift cabin when a lift request is
/// issued.  Outside requests summon the cabin; inside requests ask for the
/// destination-floor doors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiftLocated {
    Outside,
    Inside,
}

// ── ActionKind ────────────────────────────────────────────────────────────────

/// The closed set of low-level actions a plan lowers to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Drive through a run of contiguous plan waypoints.
    Move { waypoints: Vec<PlanWaypoint> },

    /// Dock at a named station.
    Dock { dock_name: String },

    /// Ask `door_name` to open on behalf of `requester_id`; the door is
    /// expected to be open by `expected_finish`.
    DoorOpen {
        door_name: String,
        requester_id: String,
        expected_finish: Time,
    },

    /// Ask `door_name` to close behind the robot.
    DoorClose {
        door_name: String,
        requester_id: String,
    },

    /// Hold a lift session with `lift_name`, asking for `floor_name`.
    /// `deadline` is when the lift is expected to have complied.
    RequestLift {
        lift_name: String,
        floor_name: String,
        deadline: Time,
        located: LiftLocated,
    },

    /// Release the session with `lift_name` at `floor_name`.
    EndLiftSession {
        lift_name: String,
        floor_name: String,
    },
}

impl ActionKind {
    /// Nominal duration of the action, used when budgeting how much travel
    /// may hide inside a folded door pass-through.  Only moves have a
    /// meaningful span; device actions are budgeted as instantaneous.
    pub fn estimated_duration(&self) -> Duration {
        match self {
            ActionKind::Move { waypoints } => match (waypoints.first(), waypoints.last()) {
                (Some(first), Some(last)) => last.time - first.time,
                _ => Duration::ZERO,
            },
            _ => Duration::ZERO,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Move { waypoints } => {
                write!(f, "Move through {} waypoints", waypoints.len())
            }
            ActionKind::Dock { dock_name } => write!(f, "Dock at [{dock_name}]"),
            ActionKind::DoorOpen { door_name, .. } => write!(f, "Open [door:{door_name}]"),
            ActionKind::DoorClose { door_name, .. } => write!(f, "Close [door:{door_name}]"),
            ActionKind::RequestLift {
                lift_name,
                floor_name,
                ..
            } => write!(f, "Request [lift:{lift_name}] to [floor:{floor_name}]"),
            ActionKind::EndLiftSession { lift_name, .. } => {
                write!(f, "Release [lift:{lift_name}]")
            }
        }
    }
}

// ── MutexGroupLock ────────────────────────────────────────────────────────────

/// A pending lock on a mutex group, created when the route crosses into a
/// mutually-exclusive segment.
///
/// The robot holds at `hold_position` (on `hold_map`, from `hold_time`)
/// until the group is exclusively acquired, then resumes under the
/// itinerary snapshot `resume_itinerary` — the forward-looking reservation
/// copy taken at the lock point.  At most one lock is active per
/// compilation at any time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutexGroupLock {
    /// Name of the mutex group to acquire.
    pub group: String,

    /// Map (floor) of the hold point.  Empty when no remaining waypoint was
    /// on the navigation graph — logged as an error at compile time but not
    /// fatal.
    pub hold_map: String,

    pub hold_position: Pose,
    pub hold_time: Time,

    /// The plan version active when the lock was created.
    pub plan_id: PlanId,

    /// Which compilation-owned itinerary snapshot to resume with once the
    /// group is acquired.
    pub resume_itinerary: SnapshotId,
}

// ── ActionDescriptor ──────────────────────────────────────────────────────────

/// One entry in the compiler's linear action list.
///
/// `action == None` means a pure wait point: nothing to execute, but the
/// dependencies must still clear before the sequence may advance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDescriptor {
    pub action: Option<ActionKind>,

    /// Nominal time this descriptor anchors to.
    pub time: Time,

    /// Other participants' checkpoints that must clear at this descriptor.
    pub dependencies: Vec<Dependency>,

    /// Lock to acquire before this descriptor runs, when it was emitted
    /// inside a mutex region.
    pub mutex_lock: Option<MutexGroupLock>,
}

impl ActionDescriptor {
    pub fn new(
        action: Option<ActionKind>,
        time: Time,
        dependencies: Vec<Dependency>,
        mutex_lock: Option<MutexGroupLock>,
    ) -> Self {
        Self {
            action,
            time,
            dependencies,
            mutex_lock,
        }
    }

    /// `true` for descriptors with no payload (dependency-only wait points).
    pub fn is_wait_point(&self) -> bool {
        self.action.is_none()
    }
}
