//! Sample road graphs shared by unit tests, behaviour tests, doctests and
//! benchmarks.
//!
//! Builders panic if their fixed input fails validation, which would be a bug
//! in this module rather than in the caller.

use std::collections::BTreeSet;

use geo::Coord;

use crate::graph::{Edge, Node, NodeId, RoadGraph};

fn assemble(nodes: Vec<Node>, edges: Vec<Edge>) -> RoadGraph {
    match RoadGraph::from_parts(nodes, edges) {
        Ok(graph) => graph,
        Err(err) => panic!("sample graph must be valid: {err}"),
    }
}

/// Four junctions with roads 1–2 (10 m), 2–3 (10 m), 1–3 (25 m) and
/// 3–4 (5 m), all two-way, with edge ids 1 to 4 in that order.
///
/// Coordinates are a few metres apart in degrees, so planar distances
/// never exceed road lengths.
pub fn diamond() -> RoadGraph {
    let nodes = vec![
        Node::untagged(1, Coord { x: 0.0, y: 0.0 }),
        Node::untagged(2, Coord { x: 0.000_1, y: 0.0 }),
        Node::untagged(3, Coord { x: 0.000_2, y: 0.0 }),
        Node::untagged(4, Coord { x: 0.000_25, y: 0.0 }),
    ];
    let edges = vec![
        Edge::new(1, 1, 2, 10.0).with_average_time(2.0),
        Edge::new(2, 2, 3, 10.0).with_average_time(2.0),
        Edge::new(3, 1, 3, 25.0).with_average_time(3.0),
        Edge::new(4, 3, 4, 5.0).with_average_time(1.0),
    ];
    assemble(nodes, edges)
}

/// Untagged nodes `1..=count` placed along the x axis at `x = id`.
pub fn line_nodes(count: u32) -> Vec<Node> {
    (1..=count)
        .map(|id| {
            Node::untagged(
                NodeId::from(id),
                Coord {
                    x: f64::from(id),
                    y: 0.0,
                },
            )
        })
        .collect()
}

/// Graph whose edges are `(from, to, length)` hops, numbered from 1 in
/// order. Nodes are created for every endpoint at the origin.
pub fn from_hops(hops: &[(NodeId, NodeId, f64)], oneway: bool) -> RoadGraph {
    let ids: BTreeSet<NodeId> = hops.iter().flat_map(|&(from, to, _)| [from, to]).collect();
    let nodes = ids
        .into_iter()
        .map(|id| Node::untagged(id, Coord { x: 0.0, y: 0.0 }))
        .collect();
    let edges = (1..)
        .zip(hops)
        .map(|(id, &(from, to, length))| {
            let edge = Edge::new(id, from, to, length).with_average_time(length);
            if oneway { edge.one_way() } else { edge }
        })
        .collect();
    assemble(nodes, edges)
}

/// Id of the grid node in `row`, `col` for a grid `width` nodes wide.
pub fn grid_id(width: u32, row: u32, col: u32) -> NodeId {
    NodeId::from(row) * NodeId::from(width) + NodeId::from(col) + 1
}

/// Two-way grid of `width × height` nodes one unit apart.
///
/// Road lengths are at least the planar distance between their endpoints
/// and vary between 1 and 2 units, so shortest paths are not all equal.
/// Node ids run row by row from 1.
#[expect(
    clippy::float_arithmetic,
    reason = "grid lengths are derived from row and column parity"
)]
pub fn grid(width: u32, height: u32) -> RoadGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut next_edge = 1;
    for row in 0..height {
        for col in 0..width {
            let id = grid_id(width, row, col);
            nodes.push(Node::untagged(
                id,
                Coord {
                    x: f64::from(col),
                    y: f64::from(row),
                },
            ));
            if col + 1 < width {
                let length = 1.0 + f64::from((row + col) & 1);
                edges.push(Edge::new(next_edge, id, grid_id(width, row, col + 1), length));
                next_edge += 1;
            }
            if row + 1 < height {
                let length = 1.0 + 0.5 * f64::from((row * col) & 1);
                edges.push(Edge::new(next_edge, id, grid_id(width, row + 1, col), length));
                next_edge += 1;
            }
        }
    }
    assemble(nodes, edges)
}

/// [`grid`] with every node whose id is a multiple of `every` tagged `tag`.
pub fn tagged_grid(width: u32, height: u32, tag: &str, every: NodeId) -> RoadGraph {
    let base = grid(width, height);
    let nodes = base
        .nodes()
        .map(|node| {
            let mut tagged = node.clone();
            if every > 0 && node.id.is_multiple_of(every) {
                tagged.pois.push(tag.to_owned());
            }
            tagged
        })
        .collect();
    let mut edges: Vec<Edge> = base
        .nodes()
        .flat_map(|node| base.outgoing(node.id))
        .filter(|edge| edge.from < edge.to)
        .cloned()
        .collect();
    edges.sort_by_key(|edge| edge.id);
    assemble(nodes, edges)
}
