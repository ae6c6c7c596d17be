//! `fp-traffic` — planner-facing inputs and the shared traffic schedule.
//!
//! Two halves live here:
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`plan`]      | What the planner hands the compiler: `Plan`,            |
//! |               | `PlanWaypoint`, `PlanEvent`, `Dependency`               |
//! | [`itinerary`] | What the robot reserves in the shared schedule:         |
//! |               | `Itinerary`, `Route`, `Trajectory`, `ArrivalCheckpoint` |
//! | [`schedule`]  | The versioned schedule store: `ScheduleStore`,          |
//! |               | `InMemorySchedule`                                      |
//!
//! The schedule store is the one externally-shared mutable resource in the
//! whole compiler: reservations are versioned by [`PlanId`][fp_core::PlanId]
//! and a commit under a stale id is rejected, which is what drives the
//! committer's bounded retry loop.

pub mod itinerary;
pub mod plan;
pub mod schedule;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use itinerary::{ArrivalCheckpoint, Itinerary, Route, Trajectory, TrajectorySample};
pub use plan::{Dependency, Plan, PlanEvent, PlanWaypoint};
pub use schedule::{InMemorySchedule, ScheduleStore};
