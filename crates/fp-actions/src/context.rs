//! Robot context — the identity and shared-schedule handle a compilation
//! runs against.
//!
//! The clock and the asynchronous work queue that tick compiled actions
//! belong to the execution engine, not here: compilation itself is
//! synchronous and anchors everything to plan times.

use fp_traffic::ScheduleStore;

/// Per-robot state threaded through compilation and commit.
///
/// # Type parameter
///
/// `S` is the schedule store implementation (e.g.
/// [`InMemorySchedule`][fp_traffic::InMemorySchedule], or a mirror of the
/// fleet's schedule database).  Swapping it is a compile-time choice with
/// no runtime overhead.
pub struct RobotContext<S: ScheduleStore> {
    /// Robot name, unique within its group.
    pub name: String,

    /// Fleet/group the robot belongs to.
    pub group: String,

    /// Task the robot is currently performing, if any.  Included in
    /// schedule-conflict diagnostics.
    pub current_task_id: Option<String>,

    /// Handle to the shared traffic schedule.
    pub schedule: S,
}

impl<S: ScheduleStore> RobotContext<S> {
    pub fn new(name: impl Into<String>, group: impl Into<String>, schedule: S) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            current_task_id: None,
            schedule,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.current_task_id = Some(task_id.into());
        self
    }

    /// Identity string used when requesting shared infrastructure (doors),
    /// so device supervisors can attribute the request.
    pub fn requester_id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }

    /// Task id for diagnostics, with the conventional placeholder when no
    /// task is active.
    pub fn task_id_or_none(&self) -> &str {
        self.current_task_id.as_deref().unwrap_or("<none>")
    }
}
