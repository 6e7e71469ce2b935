//! Road segments, their time-of-day speed profiles and partial patches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::GraphError;
use super::node::NodeId;

/// Identifier of a logical edge. Both directions of a two-way road share it.
pub type EdgeId = u64;

/// Number of 15-minute slots in a 24-hour speed profile.
pub const SPEED_PROFILE_SLOTS: usize = 96;

/// Errors returned by [`SpeedProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeedProfileError {
    /// The profile did not contain exactly one speed per slot.
    #[error("speed profile must have {expected} slots, found {found}")]
    WrongSlotCount {
        /// Required number of slots.
        expected: usize,
        /// Number of slots supplied.
        found: usize,
    },
    /// A slot held `NaN` or an infinite speed.
    #[error("speed profile slot {slot} is not a finite number")]
    NonFiniteSpeed {
        /// Offending slot index.
        slot: usize,
    },
}

/// Speeds in metres per second for each 15-minute slot of a day.
///
/// Slot `0` covers 00:00–00:14. Non-positive slots are allowed; the cost
/// model substitutes the edge's average speed for them.
///
/// # Examples
/// ```
/// use waymark_core::{SPEED_PROFILE_SLOTS, SpeedProfile};
///
/// let profile = SpeedProfile::new(vec![10.0; SPEED_PROFILE_SLOTS])?;
/// assert_eq!(profile.speed_at(95), 10.0);
/// assert!(SpeedProfile::new(vec![10.0; 4]).is_err());
/// # Ok::<(), waymark_core::SpeedProfileError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct SpeedProfile(Vec<f64>);

impl SpeedProfile {
    /// Validate and wrap a 96-slot speed table.
    pub fn new(slots: Vec<f64>) -> Result<Self, SpeedProfileError> {
        if slots.len() != SPEED_PROFILE_SLOTS {
            return Err(SpeedProfileError::WrongSlotCount {
                expected: SPEED_PROFILE_SLOTS,
                found: slots.len(),
            });
        }
        if let Some(slot) = slots.iter().position(|speed| !speed.is_finite()) {
            return Err(SpeedProfileError::NonFiniteSpeed { slot });
        }
        Ok(Self(slots))
    }

    /// Speed for `slot`, wrapping around the 24-hour cycle.
    pub fn speed_at(&self, slot: usize) -> f64 {
        slot.checked_rem(SPEED_PROFILE_SLOTS)
            .and_then(|wrapped| self.0.get(wrapped))
            .copied()
            .unwrap_or_default()
    }

    /// Raw slot speeds.
    pub fn slots(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for SpeedProfile {
    type Error = SpeedProfileError;

    fn try_from(slots: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<SpeedProfile> for Vec<f64> {
    fn from(profile: SpeedProfile) -> Self {
        profile.0
    }
}

/// A directed road segment.
///
/// Two-way roads are stored once in the edge index and materialised as two
/// adjacency entries that share `id`; the reverse entry has `from` and `to`
/// swapped.
///
/// # Examples
/// ```
/// use waymark_core::Edge;
///
/// let edge = Edge::new(3, 1, 2, 120.0)
///     .with_average_time(14.0)
///     .with_road_type("primary")
///     .one_way();
///
/// assert!(edge.oneway);
/// assert_eq!(edge.road_type, "primary");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Stable identifier of the logical edge.
    pub id: EdgeId,
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
    /// Length in metres.
    pub length: f64,
    /// Typical traversal time in seconds.
    pub average_time: f64,
    /// Optional time-of-day speed table.
    pub speed_profile: Option<SpeedProfile>,
    /// Whether the road only runs `from → to`.
    pub oneway: bool,
    /// Free-form road classification used for filtering.
    pub road_type: String,
}

impl Edge {
    /// Construct a two-way edge with no average time, profile or road type.
    pub const fn new(id: EdgeId, from: NodeId, to: NodeId, length: f64) -> Self {
        Self {
            id,
            from,
            to,
            length,
            average_time: 0.0,
            speed_profile: None,
            oneway: false,
            road_type: String::new(),
        }
    }

    /// Set the average traversal time in seconds.
    #[must_use]
    pub const fn with_average_time(mut self, seconds: f64) -> Self {
        self.average_time = seconds;
        self
    }

    /// Attach a speed profile.
    #[must_use]
    pub fn with_speed_profile(mut self, profile: SpeedProfile) -> Self {
        self.speed_profile = Some(profile);
        self
    }

    /// Set the road classification.
    #[must_use]
    pub fn with_road_type(mut self, road_type: impl Into<String>) -> Self {
        self.road_type = road_type.into();
        self
    }

    /// Mark the edge as one-way.
    #[must_use]
    pub const fn one_way(mut self) -> Self {
        self.oneway = true;
        self
    }

    /// Copy of this edge running in the opposite direction.
    pub(crate) fn reversed(&self) -> Self {
        let mut reverse = self.clone();
        std::mem::swap(&mut reverse.from, &mut reverse.to);
        reverse
    }
}

/// Partial attribute update for [`RoadGraph::modify_edge`](crate::RoadGraph::modify_edge).
///
/// Absent fields are left untouched. An empty `speed_profile` clears the
/// profile; any other profile must have exactly 96 slots.
///
/// # Examples
/// ```
/// use waymark_core::EdgePatch;
///
/// let patch = EdgePatch::default().with_length(10.0).with_road_type("service");
/// assert!(!patch.is_empty());
/// assert!(EdgePatch::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EdgePatch {
    /// Replacement length in metres; must be positive.
    pub length: Option<f64>,
    /// Replacement average time in seconds; must be positive.
    pub average_time: Option<f64>,
    /// Replacement speed profile; empty clears it.
    pub speed_profile: Option<Vec<f64>>,
    /// Replacement road classification.
    pub road_type: Option<String>,
    /// Replacement one-way flag.
    pub oneway: Option<bool>,
}

impl EdgePatch {
    /// Return `true` when the patch names no attribute at all.
    pub const fn is_empty(&self) -> bool {
        self.length.is_none()
            && self.average_time.is_none()
            && self.speed_profile.is_none()
            && self.road_type.is_none()
            && self.oneway.is_none()
    }

    /// Set the replacement length.
    #[must_use]
    pub const fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the replacement average time.
    #[must_use]
    pub const fn with_average_time(mut self, seconds: f64) -> Self {
        self.average_time = Some(seconds);
        self
    }

    /// Set the replacement speed profile.
    #[must_use]
    pub fn with_speed_profile(mut self, slots: Vec<f64>) -> Self {
        self.speed_profile = Some(slots);
        self
    }

    /// Set the replacement road classification.
    #[must_use]
    pub fn with_road_type(mut self, road_type: impl Into<String>) -> Self {
        self.road_type = Some(road_type.into());
        self
    }

    /// Set the replacement one-way flag.
    #[must_use]
    pub const fn with_oneway(mut self, oneway: bool) -> Self {
        self.oneway = Some(oneway);
        self
    }

    /// Apply the patch to a copy of `edge`, rejecting invalid values before
    /// anything is changed.
    pub(crate) fn apply_to(&self, edge: &Edge) -> Result<Edge, GraphError> {
        let id = edge.id;
        if let Some(value) = self.length
            && !(value > 0.0 && value.is_finite())
        {
            return Err(GraphError::NonPositiveLength { id, value });
        }
        if let Some(value) = self.average_time
            && !(value > 0.0 && value.is_finite())
        {
            return Err(GraphError::NonPositiveAverageTime { id, value });
        }
        let profile = match &self.speed_profile {
            None => edge.speed_profile.clone(),
            Some(slots) if slots.is_empty() => None,
            Some(slots) => Some(
                SpeedProfile::new(slots.clone())
                    .map_err(|source| GraphError::InvalidSpeedProfile { id, source })?,
            ),
        };

        let mut patched = edge.clone();
        patched.speed_profile = profile;
        if let Some(length) = self.length {
            patched.length = length;
        }
        if let Some(seconds) = self.average_time {
            patched.average_time = seconds;
        }
        if let Some(road_type) = &self.road_type {
            patched.road_type.clone_from(road_type);
        }
        if let Some(oneway) = self.oneway {
            patched.oneway = oneway;
        }
        Ok(patched)
    }
}
