//! Event lowering — pass 1.
//!
//! Converts one graph-embedded [`PlanEvent`] into zero or one
//! [`ActionDescriptor`]s.  The original executor here was a double-dispatch
//! visitor over an open event hierarchy; with a closed enum a single
//! exhaustive `match` does the same job and the compiler checks coverage.
//!
//! Lowering is stateful across one event boundary: `LiftMove` produces no
//! action but accumulates cabin travel time into the deadline of the next
//! `LiftDoorOpen`, and raises the `moving_lift` flag that makes the
//! partitioner keep feeding waypoints here instead of treating them as
//! ordinary move waypoints.

use fp_actions::{ActionDescriptor, ActionKind, LiftLocated};
use fp_core::Duration;
use fp_traffic::{PlanEvent, PlanWaypoint};

/// Per-event-boundary lowering state.
///
/// A fresh instance is created each time the partitioner meets an event
/// waypoint; it stays alive while `moving_lift` holds so consecutive lift
/// sub-events share the accumulated duration.
pub(crate) struct EventLowering {
    moving_lift: bool,
    lifting_duration: Duration,
}

impl EventLowering {
    pub fn new() -> Self {
        Self {
            moving_lift: false,
            lifting_duration: Duration::ZERO,
        }
    }

    /// `true` while the lift cabin is in transit and the partitioner must
    /// not resume ordinary move accumulation.
    pub fn moving_lift(&self) -> bool {
        self.moving_lift
    }

    /// Lower `event` at waypoint `wp`, appending to `out`.
    ///
    /// Returns the `continuous` flag: whether the next move run should
    /// re-include this waypoint as its starting point.
    pub fn lower(
        &mut self,
        wp: &PlanWaypoint,
        event: &PlanEvent,
        requester_id: &str,
        out: &mut Vec<ActionDescriptor>,
    ) -> bool {
        let start = wp.time;
        match event {
            PlanEvent::Dock { dock_name, .. } => {
                debug_assert!(!self.moving_lift);
                out.push(ActionDescriptor::new(
                    Some(ActionKind::Dock {
                        dock_name: dock_name.clone(),
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                false
            }

            PlanEvent::DoorOpen {
                door_name,
                duration,
            } => {
                debug_assert!(!self.moving_lift);
                out.push(ActionDescriptor::new(
                    Some(ActionKind::DoorOpen {
                        door_name: door_name.clone(),
                        requester_id: requester_id.to_owned(),
                        expected_finish: start + *duration,
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                true
            }

            PlanEvent::DoorClose { door_name } => {
                debug_assert!(!self.moving_lift);
                out.push(ActionDescriptor::new(
                    Some(ActionKind::DoorClose {
                        door_name: door_name.clone(),
                        requester_id: requester_id.to_owned(),
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                true
            }

            PlanEvent::LiftSessionBegin {
                lift_name,
                floor_name,
            } => {
                debug_assert!(!self.moving_lift);
                out.push(ActionDescriptor::new(
                    Some(ActionKind::RequestLift {
                        lift_name: lift_name.clone(),
                        floor_name: floor_name.clone(),
                        deadline: start,
                        located: LiftLocated::Outside,
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                true
            }

            PlanEvent::LiftMove { duration, .. } => {
                self.lifting_duration += *duration;
                self.moving_lift = true;
                true
            }

            PlanEvent::LiftDoorOpen {
                lift_name,
                floor_name,
                duration,
            } => {
                out.push(ActionDescriptor::new(
                    Some(ActionKind::RequestLift {
                        lift_name: lift_name.clone(),
                        floor_name: floor_name.clone(),
                        deadline: start + *duration + self.lifting_duration,
                        located: LiftLocated::Inside,
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                self.moving_lift = false;
                true
            }

            PlanEvent::LiftSessionEnd {
                lift_name,
                floor_name,
            } => {
                debug_assert!(!self.moving_lift);
                out.push(ActionDescriptor::new(
                    Some(ActionKind::EndLiftSession {
                        lift_name: lift_name.clone(),
                        floor_name: floor_name.clone(),
                    }),
                    start,
                    wp.dependencies.clone(),
                    None,
                ));
                true
            }

            PlanEvent::Wait { .. } => false,
        }
    }
}
