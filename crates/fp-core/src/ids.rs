//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into storage `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a waypoint on the navigation graph.
    pub struct WaypointId(u32);
}

typed_id! {
    /// Index of a directed lane on the navigation graph.
    pub struct LaneId(u32);
}

typed_id! {
    /// Index of a route within a reserved itinerary.
    pub struct RouteId(u32);
}

typed_id! {
    /// Index of a trajectory sample within one reserved route.
    pub struct CheckpointId(u32);
}

typed_id! {
    /// Another traffic participant registered in the shared schedule.
    pub struct ParticipantId(u64);
}

typed_id! {
    /// Version token for a robot's reservation in the shared schedule.
    ///
    /// Acts as an optimistic-concurrency token: a commit under a stale
    /// `PlanId` is rejected and the committer must re-try under a freshly
    /// assigned one.
    pub struct PlanId(u64);
}

typed_id! {
    /// Index of an itinerary snapshot owned by one compilation.
    pub struct SnapshotId(u32);
}

typed_id! {
    /// Observable-state identifier assigned to composite action groups.
    pub struct EventStateId(u32);
}
