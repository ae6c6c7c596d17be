//! `fp-core` — foundational types for the `fleetplan` plan compiler.
//!
//! This crate is a dependency of every other `fp-*` crate.  It intentionally
//! has no `fp-*` dependencies and only one (optional) external one: `serde`.
//! Fallible operations live in the higher layers, which each define their
//! own error enums.
//!
//! # What lives here
//!
//! | Module   | Contents                                                     |
//! |----------|--------------------------------------------------------------|
//! | [`ids`]  | `WaypointId`, `LaneId`, `RouteId`, `CheckpointId`, …         |
//! | [`pose`] | `Pose` (planar position + heading)                           |
//! | [`time`] | `Time`, `Duration`                                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.         |

pub mod ids;
pub mod pose;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{
    CheckpointId, EventStateId, LaneId, ParticipantId, PlanId, RouteId, SnapshotId, WaypointId,
};
pub use pose::Pose;
pub use time::{Duration, Time};
