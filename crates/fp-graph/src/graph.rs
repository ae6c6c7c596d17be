//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Waypoints and lanes live in flat `Vec`s indexed by [`WaypointId`] and
//! [`LaneId`].  The compiler's queries are all O(1) indexed lookups; there
//! is no adjacency structure because the graph is never traversed here —
//! the planner already chose the route.
//!
//! # Mutex groups
//!
//! A mutex group is a named route segment that only one robot may occupy at
//! a time.  Membership is a per-waypoint / per-lane property; an empty or
//! absent name means "not in any group".

use fp_core::{LaneId, WaypointId};

// ── GraphWaypoint ─────────────────────────────────────────────────────────────

/// One waypoint on the navigation graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphWaypoint {
    /// Name of the map (floor) this waypoint sits on.
    pub map_name: String,

    /// Map-frame position in metres.
    pub x: f64,
    pub y: f64,

    /// Mutex group this waypoint belongs to, if any.
    pub mutex_group: Option<String>,
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// One directed lane between two graph waypoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub from: WaypointId,
    pub to: WaypointId,

    /// Mutex group this lane belongs to, if any.
    pub mutex_group: Option<String>,
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// An immutable navigation graph.
///
/// Do not construct directly; use [`NavGraphBuilder`] or the CSV loader.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavGraph {
    waypoints: Vec<GraphWaypoint>,
    lanes: Vec<Lane>,
}

impl NavGraph {
    /// A graph with no waypoints or lanes.
    ///
    /// Useful when compiling plans that never touch the graph (pure
    /// free-space moves); every membership query returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The waypoint record for `id`, or `None` if `id` is off this graph.
    pub fn waypoint(&self, id: WaypointId) -> Option<&GraphWaypoint> {
        self.waypoints.get(id.index())
    }

    /// The lane record for `id`, or `None` if `id` is off this graph.
    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.index())
    }

    /// Mutex group of waypoint `id`.  `None` for unknown waypoints — a plan
    /// referencing a waypoint this graph doesn't know is treated as not
    /// being in any group.
    pub fn waypoint_mutex_group(&self, id: WaypointId) -> Option<&str> {
        self.waypoint(id).and_then(|w| w.mutex_group.as_deref())
    }

    /// Mutex group of lane `id`.  `None` for unknown lanes.
    pub fn lane_mutex_group(&self, id: LaneId) -> Option<&str> {
        self.lane(id).and_then(|l| l.mutex_group.as_deref())
    }

    /// Map (floor) name of waypoint `id`.
    pub fn map_name(&self, id: WaypointId) -> Option<&str> {
        self.waypoint(id).map(|w| w.map_name.as_str())
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fp_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_waypoint("L1", 0.0, 0.0);
/// let c = b.add_waypoint("L1", 5.0, 0.0);
/// b.set_waypoint_mutex_group(c, "corridor_east");
/// b.add_lanes_between(a, c);
/// let graph = b.build();
/// assert_eq!(graph.waypoint_count(), 2);
/// assert_eq!(graph.lane_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    waypoints: Vec<GraphWaypoint>,
    lanes: Vec<Lane>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of waypoints and lanes to reduce
    /// reallocations when bulk-loading from CSV.
    pub fn with_capacity(waypoints: usize, lanes: usize) -> Self {
        Self {
            waypoints: Vec::with_capacity(waypoints),
            lanes: Vec::with_capacity(lanes),
        }
    }

    /// Add a waypoint on map `map_name` and return its `WaypointId`
    /// (sequential from 0).
    pub fn add_waypoint(&mut self, map_name: impl Into<String>, x: f64, y: f64) -> WaypointId {
        let id = WaypointId(self.waypoints.len() as u32);
        self.waypoints.push(GraphWaypoint {
            map_name: map_name.into(),
            x,
            y,
            mutex_group: None,
        });
        id
    }

    /// Mark waypoint `id` as belonging to `group`.
    pub fn set_waypoint_mutex_group(&mut self, id: WaypointId, group: impl Into<String>) {
        self.waypoints[id.index()].mutex_group = Some(group.into());
    }

    /// Add a **directed** lane from `from` to `to` and return its `LaneId`.
    pub fn add_lane(&mut self, from: WaypointId, to: WaypointId) -> LaneId {
        let id = LaneId(self.lanes.len() as u32);
        self.lanes.push(Lane {
            from,
            to,
            mutex_group: None,
        });
        id
    }

    /// Convenience: add lanes in **both directions** between `a` and `b`.
    pub fn add_lanes_between(&mut self, a: WaypointId, b: WaypointId) -> (LaneId, LaneId) {
        (self.add_lane(a, b), self.add_lane(b, a))
    }

    /// Mark lane `id` as belonging to `group`.
    pub fn set_lane_mutex_group(&mut self, id: LaneId, group: impl Into<String>) {
        self.lanes[id.index()].mutex_group = Some(group.into());
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        NavGraph {
            waypoints: self.waypoints,
            lanes: self.lanes,
        }
    }
}
