//! Reserved trajectories: `Trajectory`, `Route`, `Itinerary`.
//!
//! # Reservation model
//!
//! A robot's claim on the shared traffic schedule is an ordered list of
//! routes, one per map it will traverse.  Each route is a time-stamped
//! trajectory; each sample in it is addressable by [`CheckpointId`], and a
//! plan waypoint records where it lands in the reservation as
//! [`ArrivalCheckpoint`]s.
//!
//! When the compiler pauses a route at a mutex-group boundary it truncates
//! the reservation at the arrival checkpoints of the pause point so that no
//! sample at or after the lock outlives it — see [`Itinerary::truncate_at`].

use fp_core::{CheckpointId, Pose, RouteId, Time};

// ── TrajectorySample ──────────────────────────────────────────────────────────

/// One time-stamped pose within a reserved route.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectorySample {
    pub time: Time,
    pub position: Pose,
}

// ── Trajectory ────────────────────────────────────────────────────────────────

/// A time-ordered sequence of samples.
///
/// Samples are expected in nondecreasing time order; the compiler never
/// reorders them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn new(samples: Vec<TrajectorySample>) -> Self {
        debug_assert!(
            samples.windows(2).all(|w| w[0].time <= w[1].time),
            "trajectory samples must be in nondecreasing time order"
        );
        Self { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Read-only slice of all samples.
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Time of the final sample, or `None` for an empty trajectory.
    pub fn finish_time(&self) -> Option<Time> {
        self.samples.last().map(|s| s.time)
    }

    /// Drop every sample at index `checkpoint` and after.
    pub fn truncate_from(&mut self, checkpoint: CheckpointId) {
        self.samples.truncate(checkpoint.index());
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One reserved route: a map (floor) name plus the trajectory across it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub map_name: String,
    pub trajectory: Trajectory,
}

impl Route {
    pub fn new(map_name: impl Into<String>, trajectory: Trajectory) -> Self {
        Self {
            map_name: map_name.into(),
            trajectory,
        }
    }
}

// ── ArrivalCheckpoint ─────────────────────────────────────────────────────────

/// Marks where a plan waypoint lands in the robot's own reservation: a
/// route plus the position within that route's trajectory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrivalCheckpoint {
    pub route: RouteId,
    pub checkpoint: CheckpointId,
}

// ── Itinerary ─────────────────────────────────────────────────────────────────

/// The full set of routes a robot holds in the shared schedule, versioned
/// externally by a [`PlanId`][fp_core::PlanId].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    routes: Vec<Route>,
}

impl Itinerary {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Read-only slice of all routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.index())
    }

    /// The latest trajectory finish time across all routes, or `None` if
    /// every route is empty.  An itinerary with no finish time is the
    /// "empty plan" hard-failure case for compilation.
    pub fn finish_time(&self) -> Option<Time> {
        self.routes
            .iter()
            .filter_map(|r| r.trajectory.finish_time())
            .max()
    }

    /// Truncate the reservation at a lock boundary.
    ///
    /// For each arrival checkpoint, every sample of the referenced route at
    /// or after the checkpoint is removed.  Routes past the last
    /// checkpointed route are dropped entirely, as are routes the
    /// truncation fully consumed: nothing at or after the lock point
    /// survives in this reservation.
    pub fn truncate_at(&mut self, checkpoints: &[ArrivalCheckpoint]) {
        let mut first_excluded = 0usize;
        for c in checkpoints {
            first_excluded = first_excluded.max(c.route.index() + 1);
            if let Some(route) = self.routes.get_mut(c.route.index()) {
                route.trajectory.truncate_from(c.checkpoint);
            }
        }
        self.routes.truncate(first_excluded);
        self.routes.retain(|r| !r.trajectory.is_empty());
    }
}
