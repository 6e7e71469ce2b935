//! Mutable road-network store.
//!
//! [`RoadGraph`] owns the node table, the live edge index, per-node adjacency
//! lists and a tombstone table of removed edges. Two-way edges appear once in
//! the edge index and twice in adjacency (forward and swapped reverse), and
//! every mutation keeps both directions in step.
//!
//! Nodes are immutable after load and live behind an [`Arc`], so cloning a
//! graph for exploratory search copies edges and adjacency while sharing the
//! node table and its spatial index.

mod edge;
mod error;
mod node;
mod spatial_index;

use std::collections::{BTreeMap, HashMap, btree_map};
use std::sync::Arc;

use geo::Coord;

pub use edge::{Edge, EdgeId, EdgePatch, SPEED_PROFILE_SLOTS, SpeedProfile, SpeedProfileError};
pub use error::{GraphBuildError, GraphError};
pub use node::{Node, NodeId};

use spatial_index::NodeIndex;

/// Result of a successful [`RoadGraph::modify_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// A live edge was updated in place.
    Updated,
    /// A removed edge was restored from the tombstone table.
    Restored,
}

#[derive(Debug, Default)]
struct NodeTable {
    nodes: BTreeMap<NodeId, Node>,
    index: NodeIndex,
}

/// Mutable weighted road network.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Edge, EdgePatch, Node, RoadGraph};
///
/// let nodes = vec![
///     Node::untagged(1, Coord { x: 0.0, y: 0.0 }),
///     Node::untagged(2, Coord { x: 1.0, y: 0.0 }),
/// ];
/// let mut graph = RoadGraph::from_parts(nodes, vec![Edge::new(10, 1, 2, 50.0)])?;
///
/// assert_eq!(graph.outgoing(2).len(), 1);
/// graph.remove_edge(10)?;
/// assert!(graph.outgoing(1).is_empty());
/// graph.modify_edge(10, &EdgePatch::default().with_length(40.0))?;
/// assert_eq!(graph.edge(10).map(|edge| edge.length), Some(40.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: Arc<NodeTable>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    edges: HashMap<EdgeId, Edge>,
    tombstones: HashMap<EdgeId, Edge>,
}

impl RoadGraph {
    /// Build a graph from loaded nodes and edges.
    ///
    /// Node and edge ids must be unique, edge endpoints must be loaded
    /// nodes, and lengths and average times must be finite and non-negative.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphBuildError> {
        let mut table = BTreeMap::new();
        for node in nodes {
            match table.entry(node.id) {
                btree_map::Entry::Occupied(_) => {
                    return Err(GraphBuildError::DuplicateNode { id: node.id });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
        }

        let mut graph = Self {
            adjacency: table.keys().map(|&id| (id, Vec::new())).collect(),
            nodes: Arc::new(NodeTable {
                index: NodeIndex::build(table.values()),
                nodes: table,
            }),
            edges: HashMap::new(),
            tombstones: HashMap::new(),
        };

        for edge in edges {
            graph.validate_loaded_edge(&edge)?;
            if graph.edges.contains_key(&edge.id) {
                return Err(GraphBuildError::DuplicateEdge { id: edge.id });
            }
            graph.link(&edge);
            graph.edges.insert(edge.id, edge);
        }

        log::debug!(
            "built road graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn validate_loaded_edge(&self, edge: &Edge) -> Result<(), GraphBuildError> {
        for node in [edge.from, edge.to] {
            if !self.contains_node(node) {
                return Err(GraphBuildError::UnknownEndpoint {
                    edge: edge.id,
                    node,
                });
            }
        }
        for (field, value) in [("length", edge.length), ("average_time", edge.average_time)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(GraphBuildError::InvalidWeight {
                    edge: edge.id,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Insert the forward entry and, for two-way edges, the swapped reverse.
    fn link(&mut self, edge: &Edge) {
        self.adjacency
            .entry(edge.from)
            .or_default()
            .push(edge.clone());
        if !edge.oneway {
            let reverse = edge.reversed();
            self.adjacency.entry(reverse.from).or_default().push(reverse);
        }
    }

    /// Drop every adjacency entry carrying `id` from both endpoints' lists.
    fn unlink(&mut self, edge: &Edge) {
        for endpoint in [edge.from, edge.to] {
            if let Some(entries) = self.adjacency.get_mut(&endpoint) {
                entries.retain(|entry| entry.id != edge.id);
            }
        }
    }

    /// Remove a live edge, moving its attributes to the tombstone table.
    ///
    /// Fails with [`GraphError::EdgeNotFound`] for unknown ids and
    /// [`GraphError::AlreadyRemoved`] for tombstoned ones.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let Some(edge) = self.edges.remove(&id) else {
            return Err(if self.tombstones.contains_key(&id) {
                GraphError::AlreadyRemoved { id }
            } else {
                GraphError::EdgeNotFound { id }
            });
        };
        self.unlink(&edge);
        self.tombstones.insert(id, edge);
        Ok(())
    }

    /// Patch a live edge in place, or restore a removed edge with the patch
    /// applied.
    ///
    /// The patch is validated before any state changes. An empty patch is
    /// rejected for live edges but restores a removed edge unchanged.
    pub fn modify_edge(&mut self, id: EdgeId, patch: &EdgePatch) -> Result<PatchOutcome, GraphError> {
        let (current, outcome) = match (self.edges.get(&id), self.tombstones.get(&id)) {
            (Some(_), _) if patch.is_empty() => return Err(GraphError::EmptyPatch { id }),
            (Some(edge), _) => (edge, PatchOutcome::Updated),
            (None, Some(edge)) => (edge, PatchOutcome::Restored),
            (None, None) => return Err(GraphError::EdgeNotFound { id }),
        };
        let patched = patch.apply_to(current)?;
        let stale = current.clone();

        self.tombstones.remove(&id);
        self.unlink(&stale);
        self.link(&patched);
        self.edges.insert(id, patched);
        Ok(outcome)
    }

    /// Remove every adjacency entry `from → to`.
    ///
    /// Only the forward list of `from` is touched; the reverse direction and
    /// the edge index stay as they were. Working copies use this to prune
    /// candidate paths.
    pub fn remove_edges_between(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(entries) = self.adjacency.get_mut(&from) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.to != to);
        entries.len() != before
    }

    /// Cut `node` out of the adjacency lists in both directions.
    pub(crate) fn isolate_node(&mut self, node: NodeId) {
        if let Some(entries) = self.adjacency.get_mut(&node) {
            entries.clear();
        }
        for entries in self.adjacency.values_mut() {
            entries.retain(|entry| entry.to != node);
        }
    }

    /// Multiply the length of every adjacency entry of edge `id` by `factor`.
    #[expect(
        clippy::float_arithmetic,
        reason = "edge penalties scale lengths multiplicatively"
    )]
    pub(crate) fn scale_length(&mut self, id: EdgeId, factor: f64) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        for endpoint in [edge.from, edge.to] {
            if let Some(entries) = self.adjacency.get_mut(&endpoint) {
                for entry in entries.iter_mut().filter(|entry| entry.id == id) {
                    entry.length *= factor;
                }
            }
        }
    }

    /// Closest node to `location` by planar distance in coordinate space.
    ///
    /// This is not a geodesic distance. Ties resolve to the smallest id.
    /// Returns `None` only for an empty graph.
    pub fn nearest_node(&self, location: Coord<f64>) -> Option<NodeId> {
        self.nodes.index.nearest(location)
    }

    /// Nodes ordered by squared planar distance from `location`.
    pub(crate) fn nodes_by_distance(
        &self,
        location: Coord<f64>,
    ) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.nodes.index.by_distance(location)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.nodes.get(&id)
    }

    /// Return `true` when `id` names a loaded node.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.nodes.contains_key(&id)
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.nodes.values()
    }

    /// Look up a live edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Look up a removed edge in the tombstone table.
    pub fn removed_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.tombstones.get(&id)
    }

    /// Traversable entries leaving `node`, in insertion order.
    pub fn outgoing(&self, node: NodeId) -> &[Edge] {
        self.adjacency.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Shortest traversable entry `from → to`, if any.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.outgoing(from)
            .iter()
            .filter(|entry| entry.to == to)
            .min_by(|lhs, rhs| lhs.length.total_cmp(&rhs.length))
    }

    /// Number of loaded nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.nodes.len()
    }

    /// Number of live logical edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges in the tombstone table.
    pub fn removed_count(&self) -> usize {
        self.tombstones.len()
    }
}
