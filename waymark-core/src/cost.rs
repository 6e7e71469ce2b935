//! Edge traversal costs.
//!
//! Distance mode charges an edge its length in metres. Time mode charges
//! traversal seconds: edges without a speed profile cost their average time,
//! while profiled edges are walked slot by slot from the moment the search
//! reaches them.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{Edge, SpeedProfile};

const SLOT_MINUTES: f64 = 15.0;
const EPSILON: f64 = 1e-6;

/// Quantity minimised by a path search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CostMode {
    /// Edge length in metres.
    #[default]
    Distance,
    /// Traversal time in seconds, honouring speed profiles.
    Time,
}

impl CostMode {
    /// Lower-case name used in query and result documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`CostMode`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cost mode `{0}`; expected `distance` or `time`")]
pub struct ParseCostModeError(pub String);

impl FromStr for CostMode {
    type Err = ParseCostModeError;

    /// Parse a mode name, ignoring ASCII case.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::CostMode;
    ///
    /// assert_eq!("TIME".parse::<CostMode>(), Ok(CostMode::Time));
    /// assert!("walking".parse::<CostMode>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("distance") {
            Ok(Self::Distance)
        } else if value.eq_ignore_ascii_case("time") {
            Ok(Self::Time)
        } else {
            Err(ParseCostModeError(value.to_owned()))
        }
    }
}

/// Cost of traversing `edge` when the search reaches its tail after
/// `elapsed_seconds` of accumulated cost.
///
/// Elapsed time is measured from midnight and keeps growing past 24 hours;
/// profile slots wrap around the daily cycle.
///
/// # Examples
/// ```
/// use waymark_core::{CostMode, Edge, SPEED_PROFILE_SLOTS, SpeedProfile, traversal_cost};
///
/// let profile = SpeedProfile::new(vec![10.0; SPEED_PROFILE_SLOTS])?;
/// let edge = Edge::new(1, 1, 2, 600.0)
///     .with_average_time(45.0)
///     .with_speed_profile(profile);
///
/// assert_eq!(traversal_cost(&edge, CostMode::Distance, 0.0), 600.0);
/// assert!((traversal_cost(&edge, CostMode::Time, 0.0) - 60.0).abs() < 1e-9);
/// # Ok::<(), waymark_core::SpeedProfileError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "search costs are accumulated seconds converted to minutes"
)]
pub fn traversal_cost(edge: &Edge, mode: CostMode, elapsed_seconds: f64) -> f64 {
    match (mode, &edge.speed_profile) {
        (CostMode::Distance, _) => edge.length,
        (CostMode::Time, None) => edge.average_time,
        (CostMode::Time, Some(profile)) => profiled_seconds(edge, profile, elapsed_seconds / 60.0),
    }
}

/// Walk the edge through consecutive 15-minute slots until its length is
/// consumed.
///
/// Slots whose speed is not positive fall back to the edge's average speed.
#[expect(
    clippy::float_arithmetic,
    reason = "slot-by-slot traversal integrates speed over time"
)]
fn profiled_seconds(edge: &Edge, profile: &SpeedProfile, entry_minute: f64) -> f64 {
    let mut remaining = edge.length;
    let mut clock = entry_minute;
    let mut minutes = 0.0;

    while remaining > EPSILON {
        let left_in_slot = SLOT_MINUTES - clock % SLOT_MINUTES;
        let mut speed = profile.speed_at(slot_of(clock));
        if speed <= EPSILON {
            speed = edge.length / edge.average_time;
        }

        let reachable = speed * left_in_slot * 60.0;
        if reachable >= remaining - EPSILON {
            minutes += remaining / speed / 60.0;
            break;
        }
        minutes += left_in_slot;
        remaining -= reachable;
        clock += left_in_slot;
    }

    minutes * 60.0
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "minute offsets are non-negative and reduced to a slot index"
)]
fn slot_of(minute: f64) -> usize {
    (minute / SLOT_MINUTES).floor().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SPEED_PROFILE_SLOTS;
    use rstest::{fixture, rstest};

    fn profile_with(slot_speed: impl Fn(usize) -> f64) -> SpeedProfile {
        SpeedProfile::new((0..SPEED_PROFILE_SLOTS).map(slot_speed).collect())
            .expect("96 finite slots")
    }

    #[fixture]
    fn plain() -> Edge {
        Edge::new(1, 1, 2, 900.0).with_average_time(90.0)
    }

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-6
    }

    #[rstest]
    #[case("distance", CostMode::Distance)]
    #[case("Distance", CostMode::Distance)]
    #[case("TIME", CostMode::Time)]
    fn parses_mode_names_case_insensitively(#[case] raw: &str, #[case] expected: CostMode) {
        assert_eq!(raw.parse::<CostMode>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_mode() {
        assert_eq!(
            "fastest".parse::<CostMode>(),
            Err(ParseCostModeError("fastest".to_owned()))
        );
    }

    #[rstest]
    fn distance_mode_ignores_clock(plain: Edge) {
        assert!(close(traversal_cost(&plain, CostMode::Distance, 12_345.0), 900.0));
    }

    #[rstest]
    fn time_mode_without_profile_uses_average(plain: Edge) {
        assert!(close(traversal_cost(&plain, CostMode::Time, 3_600.0), 90.0));
    }

    #[rstest]
    fn uniform_profile_divides_length_by_speed(plain: Edge) {
        let edge = plain.with_speed_profile(profile_with(|_| 5.0));
        assert!(close(traversal_cost(&edge, CostMode::Time, 0.0), 180.0));
    }

    #[rstest]
    fn crossing_a_slot_boundary_changes_speed(plain: Edge) {
        // 14 minutes in: one minute left at 10 m/s covers 600 m, the
        // remaining 300 m run at 1 m/s.
        let edge = plain.with_speed_profile(profile_with(|slot| if slot == 0 { 10.0 } else { 1.0 }));
        assert!(close(traversal_cost(&edge, CostMode::Time, 14.0 * 60.0), 60.0 + 300.0));
    }

    #[rstest]
    fn non_positive_slot_falls_back_to_average_speed(plain: Edge) {
        let edge = plain.with_speed_profile(profile_with(|_| 0.0));
        assert!(close(traversal_cost(&edge, CostMode::Time, 0.0), 90.0));
    }

    #[rstest]
    fn slots_wrap_after_midnight(plain: Edge) {
        let edge = plain.with_speed_profile(profile_with(|slot| if slot == 0 { 9.0 } else { 3.0 }));
        let next_day = 24.0 * 3_600.0;
        assert!(close(traversal_cost(&edge, CostMode::Time, next_day), 100.0));
    }
}
