//! Point-to-point path searches over a [`RoadGraph`](crate::RoadGraph).
//!
//! [`shortest_path`] is an exact, constraint-aware Dijkstra search in either
//! cost mode. [`approx_batch`] runs weighted A* over many pairs under one
//! wall-clock budget.

mod astar;
mod dijkstra;
mod frontier;

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{Edge, NodeId};

pub use astar::{ApproxDistance, approx_batch, approx_shortest_path};
pub use dijkstra::{network_distances, shortest_path};
pub(crate) use frontier::Frontier;

/// A route through the graph and its accumulated cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    /// Visited nodes from source to target inclusive.
    pub nodes: Vec<NodeId>,
    /// Total cost in metres or seconds, depending on the search mode.
    pub cost: f64,
}

impl Path {
    /// Zero-cost path consisting of a single node.
    pub fn trivial(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            cost: 0.0,
        }
    }

    /// Consecutive node pairs, one per traversed edge.
    pub fn hops(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).filter_map(|pair| match *pair {
            [from, to] => Some((from, to)),
            _ => None,
        })
    }

    /// First node of the path.
    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Last node of the path.
    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// Best known costs and parent pointers of one search.
#[derive(Debug, Default)]
pub(crate) struct SearchTree {
    pub(crate) cost: HashMap<NodeId, f64>,
    pub(crate) parent: HashMap<NodeId, NodeId>,
}

impl SearchTree {
    pub(crate) fn rooted_at(source: NodeId) -> Self {
        let mut tree = Self::default();
        tree.cost.insert(source, 0.0);
        tree
    }

    /// Record `cost` for `node` via `parent` when it beats the best so far.
    pub(crate) fn relax(&mut self, node: NodeId, parent: NodeId, cost: f64) -> bool {
        if self.cost.get(&node).is_some_and(|&best| cost >= best) {
            return false;
        }
        self.cost.insert(node, cost);
        self.parent.insert(node, parent);
        true
    }

    /// Follow parent pointers back from `target`.
    pub(crate) fn path_to(&self, source: NodeId, target: NodeId) -> Option<Path> {
        let cost = *self.cost.get(&target)?;
        let mut nodes = vec![target];
        let mut cursor = target;
        while cursor != source {
            cursor = *self.parent.get(&cursor)?;
            nodes.push(cursor);
        }
        nodes.reverse();
        Some(Path { nodes, cost })
    }
}

/// Nodes and road types a search must avoid.
///
/// # Examples
/// ```
/// use waymark_core::{Constraints, Edge};
///
/// let constraints = Constraints::default()
///     .forbid_node(4)
///     .forbid_road_type("motorway");
///
/// assert!(constraints.forbids_node(4));
/// assert!(!constraints.permits(&Edge::new(1, 1, 2, 5.0).with_road_type("motorway")));
/// assert!(!constraints.permits(&Edge::new(2, 1, 4, 5.0)));
/// assert!(constraints.permits(&Edge::new(3, 1, 2, 5.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Constraints {
    /// Nodes that may not appear on the path.
    pub forbidden_nodes: BTreeSet<NodeId>,
    /// Road classifications that may not be traversed.
    pub forbidden_road_types: BTreeSet<String>,
}

impl Constraints {
    /// Add a forbidden node.
    #[must_use]
    pub fn forbid_node(mut self, node: NodeId) -> Self {
        self.forbidden_nodes.insert(node);
        self
    }

    /// Add a forbidden road classification.
    #[must_use]
    pub fn forbid_road_type(mut self, road_type: impl Into<String>) -> Self {
        self.forbidden_road_types.insert(road_type.into());
        self
    }

    /// Return `true` when `node` is forbidden.
    pub fn forbids_node(&self, node: NodeId) -> bool {
        self.forbidden_nodes.contains(&node)
    }

    /// Return `true` when the search may traverse `edge`.
    pub fn permits(&self, edge: &Edge) -> bool {
        !self.forbids_node(edge.to) && !self.forbidden_road_types.contains(&edge.road_type)
    }
}

/// Reasons a path search produced no route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An endpoint is not part of the graph.
    #[error("node {id} is not in the graph")]
    UnknownNode {
        /// Missing node.
        id: NodeId,
    },
    /// An endpoint is on the forbidden-node list.
    #[error("endpoint {id} is forbidden")]
    ForbiddenEndpoint {
        /// Forbidden endpoint.
        id: NodeId,
    },
    /// No permitted route joins the endpoints.
    #[error("no route from {from} to {to}")]
    Unreachable {
        /// Search origin.
        from: NodeId,
        /// Search destination.
        to: NodeId,
    },
    /// The wall-clock budget ran out mid-search.
    #[error("search budget exhausted")]
    BudgetExhausted,
}
