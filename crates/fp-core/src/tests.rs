//! Unit tests for fp-core.

use crate::{Duration, LaneId, PlanId, Pose, Time, WaypointId};

// ── Time arithmetic ───────────────────────────────────────────────────────────

#[cfg(test)]
mod time {
    use super::*;

    #[test]
    fn add_duration() {
        let t = Time::from_secs(10) + Duration::from_secs(5);
        assert_eq!(t, Time::from_secs(15));
    }

    #[test]
    fn subtract_times_gives_duration() {
        assert_eq!(
            Time::from_secs(90) - Time::from_secs(30),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn since_is_signed() {
        let early = Time::from_secs(5);
        let late = Time::from_secs(8);
        assert_eq!(late.since(early), Duration::from_secs(3));
        assert_eq!(early.since(late), Duration(-3_000_000_000));
    }

    #[test]
    fn duration_constructors_agree() {
        assert_eq!(Duration::from_mins(1), Duration::from_secs(60));
        assert_eq!(Duration::from_millis(1_500).as_secs_f64(), 1.5);
    }

    #[test]
    fn ordering() {
        assert!(Time::from_secs(1) < Time::from_secs(2));
        assert!(Duration::from_secs(59) < Duration::from_mins(1));
    }
}

// ── IDs ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use super::*;

    #[test]
    fn default_is_invalid() {
        assert_eq!(WaypointId::default(), WaypointId::INVALID);
        assert_eq!(LaneId::default(), LaneId::INVALID);
        assert_eq!(PlanId::default(), PlanId::INVALID);
    }

    #[test]
    fn index_round_trip() {
        let id = WaypointId(7);
        assert_eq!(id.index(), 7);
        assert_eq!(WaypointId::try_from(7usize).unwrap(), id);
    }

    #[test]
    fn display_names_the_type() {
        assert_eq!(format!("{}", PlanId(3)), "PlanId(3)");
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pose {
    use super::*;

    #[test]
    fn translation_distance_ignores_heading() {
        let a = Pose::new(0.0, 0.0, 0.0);
        let b = Pose::new(3.0, 4.0, 1.57);
        assert!((a.translation_distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_distance_to_self() {
        let p = Pose::new(1.0, 2.0, 0.5);
        assert_eq!(p.translation_distance(p), 0.0);
    }
}
