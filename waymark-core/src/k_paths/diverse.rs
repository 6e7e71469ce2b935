//! Diverse alternatives by repeated edge penalisation.

use std::collections::HashMap;

use super::{edge_overlap, route_length};
use crate::cost::CostMode;
use crate::graph::{EdgeId, NodeId, RoadGraph};
use crate::search::{Constraints, Path, PathError, shortest_path};

/// Length multiplier added per recorded use of an edge.
const PENALTY_STEP: f64 = 0.3;
/// Uses recorded for an edge of a rejected route.
const REJECTION_WEIGHT: u32 = 2;

/// Add `weight` uses to the shortest live edge of every hop in `nodes`.
fn record_usage(
    graph: &RoadGraph,
    nodes: &[NodeId],
    usage: &mut HashMap<EdgeId, u32>,
    weight: u32,
) {
    for hop in nodes.windows(2) {
        if let [from, to] = *hop
            && let Some(edge) = graph.edge_between(from, to)
        {
            let count = usage.entry(edge.id).or_default();
            *count = count.saturating_add(weight);
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "penalties grow linearly with recorded use"
)]
fn penalised_copy(graph: &RoadGraph, usage: &HashMap<EdgeId, u32>) -> RoadGraph {
    let mut working = graph.clone();
    for (&id, &count) in usage {
        working.scale_length(id, 1.0 + PENALTY_STEP * f64::from(count));
    }
    working
}

/// Up to `k` mutually dissimilar routes from `source` to `target`.
///
/// The first route is the plain shortest path. Each of the following
/// `k - 1` rounds reruns the search on a copy whose used edges are
/// lengthened by 30% per recorded use. A route is accepted when its
/// [`edge_overlap`] with every accepted route is at most
/// `overlap_threshold` percent; its edges then gain one use. An overlapping
/// route has its edges gain two uses instead, and a route already accepted is
/// skipped unchanged. Either way the round is spent.
///
/// Reported costs are unpenalised lengths. Routes are not ordered by cost.
///
/// # Errors
/// Fails with the [`PathError`] of the initial shortest-path search.
///
/// # Examples
/// ```
/// use waymark_core::{k_shortest_paths_heuristic, test_support::diamond};
///
/// let routes = k_shortest_paths_heuristic(&diamond(), 1, 4, 2, 60.0)?;
/// let nodes: Vec<_> = routes.iter().map(|route| route.nodes.clone()).collect();
/// assert_eq!(nodes, vec![vec![1, 2, 3, 4], vec![1, 3, 4]]);
/// assert_eq!(routes.last().map(|route| route.cost), Some(30.0));
/// # Ok::<(), waymark_core::PathError>(())
/// ```
pub fn k_shortest_paths_heuristic(
    graph: &RoadGraph,
    source: NodeId,
    target: NodeId,
    k: usize,
    overlap_threshold: f64,
) -> Result<Vec<Path>, PathError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let base = shortest_path(graph, source, target, CostMode::Distance, &Constraints::default())?;
    let mut usage = HashMap::new();
    record_usage(graph, &base.nodes, &mut usage, 1);
    let mut accepted = vec![base];

    for round in 1..k {
        let working = penalised_copy(graph, &usage);
        let Ok(found) =
            shortest_path(&working, source, target, CostMode::Distance, &Constraints::default())
        else {
            break;
        };

        let overlapping = accepted
            .iter()
            .any(|path| edge_overlap(&path.nodes, &found.nodes) > overlap_threshold);
        if overlapping {
            log::debug!("round {round} rejected a route overlapping accepted alternatives");
            record_usage(graph, &found.nodes, &mut usage, REJECTION_WEIGHT);
            continue;
        }
        if accepted.iter().any(|path| path.nodes == found.nodes) {
            log::debug!("round {round} found an accepted route again");
            continue;
        }

        record_usage(graph, &found.nodes, &mut usage, 1);
        let cost = route_length(graph, &found.nodes);
        accepted.push(Path {
            nodes: found.nodes,
            cost,
        });
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diamond, from_hops, grid};
    use rstest::rstest;

    #[rstest]
    fn zero_k_returns_nothing() {
        assert_eq!(k_shortest_paths_heuristic(&diamond(), 1, 4, 0, 50.0), Ok(Vec::new()));
    }

    #[rstest]
    fn single_route_when_k_is_one() {
        let routes = k_shortest_paths_heuristic(&diamond(), 1, 4, 1, 50.0).expect("reachable");
        assert_eq!(routes.len(), 1);
    }

    #[rstest]
    fn strict_threshold_rejects_overlapping_routes() {
        // Every alternative to 1-2-3-4 shares the 3-4 hop.
        let routes = k_shortest_paths_heuristic(&diamond(), 1, 4, 4, 0.0).expect("reachable");
        assert_eq!(routes.len(), 1);
    }

    #[rstest]
    fn repeated_routes_are_skipped_without_penalty() {
        // 1-2-3 stays shorter than the direct 1-3 hop at one recorded use,
        // so with a permissive threshold every round finds it again.
        let graph = from_hops(&[(1, 2, 10.0), (2, 3, 10.0), (1, 3, 30.0)], false);
        let routes = k_shortest_paths_heuristic(&graph, 1, 3, 3, 100.0).expect("reachable");
        let nodes: Vec<_> = routes.iter().map(|route| route.nodes.clone()).collect();
        assert_eq!(nodes, vec![vec![1, 2, 3]]);
    }

    #[rstest]
    fn usage_counts_follow_acceptance_and_rejection() {
        let graph = diamond();
        let mut usage = HashMap::new();
        record_usage(&graph, &[1, 2, 3], &mut usage, 1);
        record_usage(&graph, &[2, 3, 4], &mut usage, REJECTION_WEIGHT);
        assert_eq!(usage.get(&1), Some(&1));
        assert_eq!(usage.get(&2), Some(&3));
        assert_eq!(usage.get(&4), Some(&2));
    }

    #[rstest]
    fn accepted_routes_respect_threshold_on_grid() {
        let threshold = 40.0;
        let routes = k_shortest_paths_heuristic(&grid(5, 5), 1, 25, 5, threshold).expect("reachable");
        for (index, route) in routes.iter().enumerate() {
            for earlier in routes.iter().take(index) {
                assert!(edge_overlap(&earlier.nodes, &route.nodes) <= threshold);
                assert_ne!(earlier.nodes, route.nodes);
            }
        }
    }
}
