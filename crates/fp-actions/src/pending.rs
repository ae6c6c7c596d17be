//! Pending actions — explicit builder values handed to the execution engine.
//!
//! Each variant captures everything the engine needs to construct and run
//! the corresponding runtime action.  The engine consumes these at its own
//! scheduling step; the compiler never holds behavior, only data.

use fp_core::{EventStateId, Time};
use fp_traffic::Dependency;

use crate::descriptor::{ActionKind, MutexGroupLock};

// ── PendingAction ─────────────────────────────────────────────────────────────

/// One step of an assembled action sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PendingAction {
    /// Run a lowered action (move, dock, door, lift).
    Execute(ActionKind),

    /// Block until the referenced reservations are confirmed clear in the
    /// shared schedule.  `time` is the nominal plan time of the wait point.
    WaitForTraffic {
        dependencies: Vec<Dependency>,
        time: Time,
    },

    /// Block until the named mutex group is exclusively acquired, then
    /// resume under the lock's itinerary snapshot.  Acquiring a group the
    /// robot already holds completes immediately.
    LockMutexGroup(MutexGroupLock),

    /// Block until the given plan time has passed, even if the robot
    /// arrived early.
    WaitUntil(Time),

    /// A folded bundle of related steps presented as one observable action.
    Group(CompositeGroup),
}

// ── CompositeGroup ────────────────────────────────────────────────────────────

/// An ordered bundle of steps that executes as a single sequential
/// sub-sequence and reports as one labeled action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGroup {
    /// Human-readable label, e.g. `Pass through [door:main_entrance]`.
    pub label: String,

    /// Observable-state identifier assigned at compile time.
    pub state_id: EventStateId,

    /// Members, executed strictly in order.
    pub steps: Vec<PendingAction>,
}

impl CompositeGroup {
    pub fn new(label: impl Into<String>, state_id: EventStateId, steps: Vec<PendingAction>) -> Self {
        Self {
            label: label.into(),
            state_id,
            steps,
        }
    }
}

// ── IdAssigner ────────────────────────────────────────────────────────────────

/// Hands out observable-state identifiers for composite groups.
///
/// Identifiers are unique within one compilation; observers use them to
/// correlate progress updates with sequence structure.
#[derive(Debug, Default)]
pub struct IdAssigner {
    next: u32,
}

impl IdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self) -> EventStateId {
        let id = EventStateId(self.next);
        self.next += 1;
        id
    }
}
