//! CSV navigation-graph loader.
//!
//! # CSV format
//!
//! Two files: one row per waypoint, one row per directed lane.  An empty
//! `mutex_group` cell means the waypoint/lane is not in any group.
//!
//! ```csv
//! map_name,x,y,mutex_group
//! L1,0.0,0.0,
//! L1,5.0,0.0,corridor_east
//! ```
//!
//! ```csv
//! from,to,mutex_group
//! 0,1,
//! 1,0,corridor_east
//! ```
//!
//! Lane `from`/`to` columns are waypoint row indices (0-based, in file
//! order).  Rows referencing a waypoint index that does not exist fail the
//! load with [`GraphError::UnknownWaypoint`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fp_core::WaypointId;

use crate::{GraphError, GraphResult, NavGraph, NavGraphBuilder};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaypointRecord {
    map_name: String,
    x: f64,
    y: f64,
    #[serde(default)]
    mutex_group: String,
}

#[derive(Deserialize)]
struct LaneRecord {
    from: u32,
    to: u32,
    #[serde(default)]
    mutex_group: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NavGraph`] from waypoint and lane CSV files.
pub fn load_graph_csv(waypoints: &Path, lanes: &Path) -> GraphResult<NavGraph> {
    let wp_file = std::fs::File::open(waypoints).map_err(GraphError::Io)?;
    let lane_file = std::fs::File::open(lanes).map_err(GraphError::Io)?;
    load_graph_reader(wp_file, lane_file)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from network
/// streams.
pub fn load_graph_reader<W: Read, L: Read>(waypoints: W, lanes: L) -> GraphResult<NavGraph> {
    let mut builder = NavGraphBuilder::new();

    // ── Waypoint rows ─────────────────────────────────────────────────────
    let mut wp_reader = csv::Reader::from_reader(waypoints);
    for result in wp_reader.deserialize::<WaypointRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        let id = builder.add_waypoint(row.map_name, row.x, row.y);
        if !row.mutex_group.trim().is_empty() {
            builder.set_waypoint_mutex_group(id, row.mutex_group.trim());
        }
    }

    // ── Lane rows ─────────────────────────────────────────────────────────
    let waypoint_count = builder.waypoint_count() as u32;
    let mut lane_reader = csv::Reader::from_reader(lanes);
    for result in lane_reader.deserialize::<LaneRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        for endpoint in [row.from, row.to] {
            if endpoint >= waypoint_count {
                return Err(GraphError::UnknownWaypoint(WaypointId(endpoint)));
            }
        }
        let id = builder.add_lane(WaypointId(row.from), WaypointId(row.to));
        if !row.mutex_group.trim().is_empty() {
            builder.set_lane_mutex_group(id, row.mutex_group.trim());
        }
    }

    Ok(builder.build())
}
