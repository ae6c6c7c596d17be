use thiserror::Error;

use fp_core::WaypointId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("lane references unknown waypoint {0}")]
    UnknownWaypoint(WaypointId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
