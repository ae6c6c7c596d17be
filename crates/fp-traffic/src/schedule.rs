//! The shared traffic schedule store.
//!
//! # Versioning contract
//!
//! Every reservation the store holds is tagged with the [`PlanId`] it was
//! committed under.  `PlanId`s assigned by the store are strictly
//! increasing, and a commit is accepted only when its id is strictly newer
//! than the registered one.  A rejected commit means some other planning
//! activity registered a newer reservation in the meantime; the caller must
//! obtain a fresh id via [`ScheduleStore::assign_plan_id`] and try again.
//!
//! No lock is held across a retry: each attempt re-reads the current
//! version and re-attempts a full replace.

use fp_core::PlanId;

use crate::Itinerary;

// ── ScheduleStore ─────────────────────────────────────────────────────────────

/// Seam between the compiler and whatever holds the fleet's shared traffic
/// state (a schedule database, a mirror of a remote schedule node, or the
/// in-memory store below for tests and demos).
pub trait ScheduleStore {
    /// The version of the reservation currently registered for this robot.
    fn current_plan_id(&self) -> PlanId;

    /// Hand out a fresh version token, strictly greater than any handed out
    /// or committed before.
    fn assign_plan_id(&mut self) -> PlanId;

    /// Replace this robot's reservation, tagging it with `plan_id`.
    ///
    /// Returns `false` (leaving the store untouched) when `plan_id` is not
    /// strictly newer than the registered version.
    fn commit(&mut self, plan_id: PlanId, itinerary: Itinerary) -> bool;
}

// ── InMemorySchedule ──────────────────────────────────────────────────────────

/// A process-local [`ScheduleStore`] with the same versioning semantics as
/// the fleet-wide schedule.  Used by tests and demos.
#[derive(Debug, Clone)]
pub struct InMemorySchedule {
    current: PlanId,
    next: u64,
    registered: Option<Itinerary>,
}

impl InMemorySchedule {
    pub fn new() -> Self {
        Self {
            current: PlanId(0),
            next: 1,
            registered: None,
        }
    }

    /// The reservation registered by the most recent successful commit.
    pub fn registered(&self) -> Option<&Itinerary> {
        self.registered.as_ref()
    }
}

impl Default for InMemorySchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore for InMemorySchedule {
    fn current_plan_id(&self) -> PlanId {
        self.current
    }

    fn assign_plan_id(&mut self) -> PlanId {
        let id = PlanId(self.next);
        self.next += 1;
        id
    }

    fn commit(&mut self, plan_id: PlanId, itinerary: Itinerary) -> bool {
        if plan_id.0 <= self.current.0 {
            return false;
        }
        self.current = plan_id;
        self.next = self.next.max(plan_id.0 + 1);
        self.registered = Some(itinerary);
        true
    }
}
