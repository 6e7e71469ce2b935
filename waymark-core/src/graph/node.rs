//! Road-network junctions and their point-of-interest tags.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a node in the road network.
pub type NodeId = u64;

/// A junction in the road network.
///
/// Coordinates are planar with `x = longitude` and `y = latitude`. Category
/// tags may repeat and carry no ordering semantics.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::Node;
///
/// let node = Node::new(7, Coord { x: 77.2, y: 28.6 }, vec!["cafe".into()]);
///
/// assert_eq!(node.id, 7);
/// assert!(node.has_poi("cafe"));
/// assert!(!node.has_poi("fuel"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Planar position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Point-of-interest categories present at this junction.
    pub pois: Vec<String>,
}

impl Node {
    /// Construct a node with the provided POI tags.
    pub const fn new(id: NodeId, location: Coord<f64>, pois: Vec<String>) -> Self {
        Self { id, location, pois }
    }

    /// Construct a node without POI tags.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use waymark_core::Node;
    ///
    /// let node = Node::untagged(1, Coord { x: 0.0, y: 0.0 });
    /// assert!(node.pois.is_empty());
    /// ```
    pub const fn untagged(id: NodeId, location: Coord<f64>) -> Self {
        Self::new(id, location, Vec::new())
    }

    /// Return `true` when the node carries `tag` at least once.
    pub fn has_poi(&self, tag: &str) -> bool {
        self.pois.iter().any(|poi| poi == tag)
    }
}
