//! R\*-tree over node positions.
//!
//! Nodes never move after load, so the tree is built once and shared by every
//! working copy of the graph.

use geo::Coord;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::node::{Node, NodeId};

/// Entry stored inside the node index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexedNode {
    id: NodeId,
    location: Coord<f64>,
}

impl From<&Node> for IndexedNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            location: node.location,
        }
    }
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}

impl PointDistance for IndexedNode {
    #[expect(
        clippy::float_arithmetic,
        reason = "squared planar distance needs floating-point arithmetic"
    )]
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [x, y] = *point;
        let dx = self.location.x - x;
        let dy = self.location.y - y;
        dx * dx + dy * dy
    }
}

/// Planar nearest-neighbour index over node positions.
#[derive(Debug, Default)]
pub(crate) struct NodeIndex {
    tree: RTree<IndexedNode>,
}

impl NodeIndex {
    pub(crate) fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        Self {
            tree: RTree::bulk_load(nodes.into_iter().map(IndexedNode::from).collect()),
        }
    }

    /// Nodes in ascending order of squared planar distance from `point`.
    ///
    /// Equal distances come back in no particular order; callers that need a
    /// stable answer must break ties themselves.
    pub(crate) fn by_distance(&self, point: Coord<f64>) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.tree
            .nearest_neighbor_iter_with_distance_2(&[point.x, point.y])
            .map(|(entry, distance_2)| (entry.id, distance_2))
    }

    /// Closest node to `point`, breaking ties by the smallest id.
    #[expect(
        clippy::float_cmp,
        reason = "ties are exact repeats of the same squared distance"
    )]
    pub(crate) fn nearest(&self, point: Coord<f64>) -> Option<NodeId> {
        let mut ranked = self.by_distance(point);
        let (first_id, best) = ranked.next()?;
        Some(
            ranked
                .take_while(|&(_, distance_2)| distance_2 == best)
                .fold(first_id, |lowest, (id, _)| lowest.min(id)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn node(id: NodeId, x: f64, y: f64) -> Node {
        Node::untagged(id, Coord { x, y })
    }

    #[rstest]
    fn nearest_returns_closest_node() {
        let nodes = [node(1, 0.0, 0.0), node(2, 5.0, 5.0), node(3, 1.0, 1.0)];
        let index = NodeIndex::build(&nodes);
        assert_eq!(index.nearest(Coord { x: 0.9, y: 0.8 }), Some(3));
        assert_eq!(index.tree.size(), 3);
    }

    #[rstest]
    fn nearest_breaks_ties_by_lowest_id() {
        let nodes = [node(9, 1.0, 0.0), node(4, -1.0, 0.0), node(6, 0.0, 1.0)];
        let index = NodeIndex::build(&nodes);
        assert_eq!(index.nearest(Coord { x: 0.0, y: 0.0 }), Some(4));
    }

    #[rstest]
    fn empty_index_has_no_nearest_node() {
        let index = NodeIndex::build(&Vec::<Node>::new());
        assert_eq!(index.nearest(Coord { x: 0.0, y: 0.0 }), None);
    }

    #[rstest]
    fn by_distance_is_sorted() {
        let nodes = [node(1, 3.0, 0.0), node(2, 1.0, 0.0), node(3, 2.0, 0.0)];
        let index = NodeIndex::build(&nodes);
        let order: Vec<_> = index
            .by_distance(Coord { x: 0.0, y: 0.0 })
            .map(|(id, _)| id)
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
