//! Plan time model.
//!
//! # Design
//!
//! Time is represented as a signed nanosecond count from an arbitrary epoch
//! (whatever epoch the planner used — the compiler only ever compares and
//! subtracts).  Using integer nanoseconds as the canonical unit means all
//! schedule arithmetic is exact (no floating-point drift) and comparisons
//! are O(1).
//!
//! `Duration` is the signed span between two `Time`s.  Negative durations
//! are representable but nothing in the compiler produces one from a
//! well-ordered plan.

use std::fmt;

const NANOS_PER_SEC: i64 = 1_000_000_000;

// ── Duration ──────────────────────────────────────────────────────────────────

/// A signed span of time in nanoseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration(pub i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    #[inline]
    pub const fn from_secs(secs: i64) -> Duration {
        Duration(secs * NANOS_PER_SEC)
    }

    #[inline]
    pub const fn from_millis(millis: i64) -> Duration {
        Duration(millis * 1_000_000)
    }

    #[inline]
    pub const fn from_mins(mins: i64) -> Duration {
        Duration::from_secs(mins * 60)
    }

    /// Whole nanoseconds as a float second count (display / estimation only).
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;
    #[inline]
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Duration {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

/// An absolute timestamp: nanoseconds since the planner's epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub i64);

impl Time {
    pub const ZERO: Time = Time(0);

    #[inline]
    pub const fn from_secs(secs: i64) -> Time {
        Time(secs * NANOS_PER_SEC)
    }

    /// Span from `earlier` to `self`.  Negative if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Time) -> Duration {
        Duration(self.0 - earlier.0)
    }
}

impl std::ops::Add<Duration> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: Duration) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl std::ops::Sub<Duration> for Time {
    type Output = Time;
    #[inline]
    fn sub(self, rhs: Duration) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl std::ops::Sub for Time {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Time) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{:.3}s", self.0 as f64 / NANOS_PER_SEC as f64)
    }
}
