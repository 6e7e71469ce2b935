//! Multiple alternative routes between one pair of nodes.
//!
//! [`k_shortest_paths`] is Yen's exact algorithm: loopless paths in
//! non-decreasing length order. [`k_shortest_paths_heuristic`] trades
//! optimality for diversity by penalising edges already used and rejecting
//! routes that overlap too much with those already accepted.
//!
//! Both run in distance mode and explore private copies of the graph.

mod diverse;
mod yen;

use std::collections::HashSet;

use crate::graph::{NodeId, RoadGraph};

pub use diverse::k_shortest_paths_heuristic;
pub use yen::k_shortest_paths;

/// Length of the route through `nodes`, charging each hop its shortest live
/// edge. Hops without an edge contribute nothing.
pub(crate) fn route_length(graph: &RoadGraph, nodes: &[NodeId]) -> f64 {
    nodes
        .windows(2)
        .filter_map(|hop| match *hop {
            [from, to] => graph.edge_between(from, to).map(|edge| edge.length),
            _ => None,
        })
        .sum()
}

fn hop_set(nodes: &[NodeId]) -> HashSet<(NodeId, NodeId)> {
    nodes
        .windows(2)
        .filter_map(|hop| match *hop {
            [from, to] => Some((from, to)),
            _ => None,
        })
        .collect()
}

/// Percentage of directed hops shared by two routes, relative to the route
/// with fewer distinct hops.
///
/// Routes with fewer than two nodes share nothing.
///
/// # Examples
/// ```
/// use waymark_core::edge_overlap;
///
/// assert_eq!(edge_overlap(&[1, 2, 3], &[1, 2, 4]), 50.0);
/// assert_eq!(edge_overlap(&[1, 2], &[1, 2, 3, 4]), 100.0);
/// assert_eq!(edge_overlap(&[1], &[1, 2]), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "overlap is a percentage of hop counts"
)]
pub fn edge_overlap(first: &[NodeId], second: &[NodeId]) -> f64 {
    if first.len() <= 1 || second.len() <= 1 {
        return 0.0;
    }
    let lhs = hop_set(first);
    let rhs = hop_set(second);
    let smaller = lhs.len().min(rhs.len());
    if smaller == 0 {
        return 0.0;
    }
    let common = lhs.intersection(&rhs).count();
    100.0 * common as f64 / smaller as f64
}
