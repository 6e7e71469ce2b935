//! Constraint-aware Dijkstra search.

use std::collections::BTreeMap;

use super::{Constraints, Frontier, Path, PathError, SearchTree};
use crate::cost::{CostMode, traversal_cost};
use crate::graph::{NodeId, RoadGraph};

#[expect(
    clippy::float_arithmetic,
    reason = "path costs accumulate edge costs"
)]
fn explore(
    graph: &RoadGraph,
    source: NodeId,
    mode: CostMode,
    constraints: &Constraints,
    target: Option<NodeId>,
) -> SearchTree {
    let mut tree = SearchTree::rooted_at(source);
    let mut frontier = Frontier::default();
    frontier.push(0.0, source);

    while let Some((cost, node)) = frontier.pop() {
        if tree.cost.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }
        if Some(node) == target {
            break;
        }
        if constraints.forbids_node(node) {
            continue;
        }
        for edge in graph.outgoing(node) {
            if !constraints.permits(edge) {
                continue;
            }
            let candidate = cost + traversal_cost(edge, mode, cost);
            if tree.relax(edge.to, node, candidate) {
                frontier.push(candidate, edge.to);
            }
        }
    }
    tree
}

/// Cheapest route from `source` to `target` that avoids `constraints`.
///
/// In time mode each edge is costed at the moment the search reaches it,
/// with the departure taken as midnight.
///
/// # Errors
/// - [`PathError::ForbiddenEndpoint`] when either endpoint is forbidden.
/// - [`PathError::UnknownNode`] when either endpoint is missing. A search
///   from a node to itself succeeds before this check.
/// - [`PathError::Unreachable`] when no permitted route exists.
///
/// # Examples
/// ```
/// use waymark_core::{Constraints, CostMode, shortest_path, test_support::diamond};
///
/// let graph = diamond();
/// let path = shortest_path(&graph, 1, 3, CostMode::Distance, &Constraints::default())?;
/// assert_eq!(path.nodes, vec![1, 2, 3]);
/// assert_eq!(path.cost, 20.0);
/// # Ok::<(), waymark_core::PathError>(())
/// ```
pub fn shortest_path(
    graph: &RoadGraph,
    source: NodeId,
    target: NodeId,
    mode: CostMode,
    constraints: &Constraints,
) -> Result<Path, PathError> {
    for id in [source, target] {
        if constraints.forbids_node(id) {
            return Err(PathError::ForbiddenEndpoint { id });
        }
    }
    if source == target {
        return Ok(Path::trivial(source));
    }
    for id in [source, target] {
        if !graph.contains_node(id) {
            return Err(PathError::UnknownNode { id });
        }
    }

    explore(graph, source, mode, constraints, Some(target))
        .path_to(source, target)
        .ok_or(PathError::Unreachable {
            from: source,
            to: target,
        })
}

/// Unconstrained one-to-all costs from `source`, keyed by node id.
///
/// The source itself is included with cost zero.
///
/// # Errors
/// Returns [`PathError::UnknownNode`] when `source` is not in the graph.
pub fn network_distances(
    graph: &RoadGraph,
    source: NodeId,
    mode: CostMode,
) -> Result<BTreeMap<NodeId, f64>, PathError> {
    if !graph.contains_node(source) {
        return Err(PathError::UnknownNode { id: source });
    }
    let tree = explore(graph, source, mode, &Constraints::default(), None);
    Ok(tree.cost.into_iter().collect())
}
