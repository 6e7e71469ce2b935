//! Yen's k-shortest loopless paths.

use std::collections::HashSet;

use super::route_length;
use crate::cost::CostMode;
use crate::graph::{NodeId, RoadGraph};
use crate::search::{Constraints, Frontier, Path, PathError, shortest_path};

fn distance_path(graph: &RoadGraph, source: NodeId, target: NodeId) -> Result<Path, PathError> {
    shortest_path(graph, source, target, CostMode::Distance, &Constraints::default())
}

/// Working copy for one spur: the next hop of every accepted path sharing
/// `root` is cut, and every root node before the spur is isolated.
fn spur_graph(graph: &RoadGraph, accepted: &[Path], root: &[NodeId]) -> RoadGraph {
    let spur_index = root.len().saturating_sub(1);
    let mut working = graph.clone();
    for path in accepted.iter().filter(|path| path.nodes.starts_with(root)) {
        if let (Some(&from), Some(&to)) = (
            path.nodes.get(spur_index),
            path.nodes.get(spur_index + 1),
        ) {
            working.remove_edges_between(from, to);
        }
    }
    for &node in root.iter().take(spur_index) {
        working.isolate_node(node);
    }
    working
}

/// Up to `k` loopless routes from `source` to `target` in non-decreasing
/// length order.
///
/// The first route equals [`shortest_path`] in distance mode. Every further
/// route is the cheapest deviation not yet seen from the route accepted
/// before it. Each spur node costs one full copy of the graph.
///
/// # Errors
/// Fails with the [`PathError`] of the initial shortest-path search. Running
/// out of candidates is not an error; fewer than `k` routes come back.
///
/// # Examples
/// ```
/// use waymark_core::{k_shortest_paths, test_support::diamond};
///
/// let routes = k_shortest_paths(&diamond(), 1, 4, 3)?;
/// let nodes: Vec<_> = routes.iter().map(|route| route.nodes.clone()).collect();
/// assert_eq!(nodes, vec![vec![1, 2, 3, 4], vec![1, 3, 4]]);
/// # Ok::<(), waymark_core::PathError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "candidate cost joins root and spur lengths"
)]
pub fn k_shortest_paths(
    graph: &RoadGraph,
    source: NodeId,
    target: NodeId,
    k: usize,
) -> Result<Vec<Path>, PathError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let first = distance_path(graph, source, target)?;
    let mut seen: HashSet<Vec<NodeId>> = HashSet::from([first.nodes.clone()]);
    let mut accepted = vec![first];
    let mut candidates = Frontier::default();

    while accepted.len() < k {
        let Some(previous) = accepted.last().map(|path| path.nodes.clone()) else {
            break;
        };
        for spur_index in 0..previous.len().saturating_sub(1) {
            let Some(root) = previous.get(..=spur_index) else {
                continue;
            };
            let Some(&spur) = root.last() else {
                continue;
            };
            let working = spur_graph(graph, &accepted, root);
            let Ok(deviation) = distance_path(&working, spur, target) else {
                continue;
            };

            let mut nodes = root.to_vec();
            nodes.extend(deviation.nodes.iter().skip(1));
            if seen.insert(nodes.clone()) {
                candidates.push(route_length(graph, root) + deviation.cost, nodes);
            }
        }

        let Some((cost, nodes)) = candidates.pop() else {
            log::debug!(
                "exhausted candidates from {source} to {target} after {} routes",
                accepted.len()
            );
            break;
        };
        accepted.push(Path { nodes, cost });
    }
    Ok(accepted)
}
