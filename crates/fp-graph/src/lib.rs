//! `fp-graph` — the navigation graph consumed by the fleetplan compiler.
//!
//! A [`NavGraph`] is the static map the planner routed over: named-map
//! waypoints connected by directed lanes.  The compiler only reads two
//! properties from it: **mutex-group membership** (which waypoints/lanes
//! belong to a mutually-exclusive route segment) and **map names** (which
//! floor a hold point sits on).  Routing itself happens upstream in the
//! planner and is out of scope here.
//!
//! Graphs are immutable once built; construct them with [`NavGraphBuilder`]
//! or load them from CSV via [`load_graph_reader`].

pub mod error;
pub mod graph;
pub mod loader;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GraphError, GraphResult};
pub use graph::{GraphWaypoint, Lane, NavGraph, NavGraphBuilder};
pub use loader::{load_graph_csv, load_graph_reader};
