//! Weighted A* and the time-budgeted batch driver.
//!
//! The heuristic is planar distance between node coordinates. It only bounds
//! edge lengths from below, so these searches always run in distance mode.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Frontier, Path, PathError, SearchTree};
use crate::graph::{NodeId, RoadGraph};

/// Share of the batch budget after which a running search gives up.
const SEARCH_BUDGET_SHARE: f64 = 0.95;

/// Approximate network distance between one source/target pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApproxDistance {
    /// Search origin.
    pub source: NodeId,
    /// Search destination.
    pub target: NodeId,
    /// Length of the route found, in metres.
    pub distance: f64,
}

/// Heuristic weight `1 + ε` for an acceptable error percentage.
///
/// Negative and non-finite percentages are treated as zero.
#[expect(
    clippy::float_arithmetic,
    reason = "the error percentage maps linearly onto the heuristic weight"
)]
fn inflation(acceptable_error_pct: f64) -> f64 {
    if acceptable_error_pct.is_finite() && acceptable_error_pct > 0.0 {
        1.0 + acceptable_error_pct / 100.0
    } else {
        1.0
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "planar distance between coordinates"
)]
fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let delta = a - b;
    delta.x.hypot(delta.y)
}

#[expect(
    clippy::float_arithmetic,
    reason = "A* priorities add weighted heuristic estimates to path costs"
)]
fn weighted_astar(
    graph: &RoadGraph,
    source: NodeId,
    target: NodeId,
    weight: f64,
    mut expired: impl FnMut() -> bool,
) -> Result<Path, PathError> {
    if !graph.contains_node(source) {
        return Err(PathError::UnknownNode { id: source });
    }
    let goal = graph
        .node(target)
        .ok_or(PathError::UnknownNode { id: target })?
        .location;
    if source == target {
        return Ok(Path::trivial(source));
    }
    let estimate = |id: NodeId| {
        graph
            .node(id)
            .map_or(0.0, |node| weight * planar_distance(node.location, goal))
    };

    let mut tree = SearchTree::rooted_at(source);
    let mut closed = HashSet::new();
    let mut frontier = Frontier::default();
    frontier.push(estimate(source), source);

    while let Some((_, node)) = frontier.pop() {
        if expired() {
            return Err(PathError::BudgetExhausted);
        }
        if !closed.insert(node) {
            continue;
        }
        if node == target {
            break;
        }
        let Some(&reached) = tree.cost.get(&node) else {
            continue;
        };
        for edge in graph.outgoing(node) {
            if closed.contains(&edge.to) {
                continue;
            }
            let candidate = reached + edge.length;
            if tree.relax(edge.to, node, candidate) {
                frontier.push(candidate + estimate(edge.to), edge.to);
            }
        }
    }

    tree.path_to(source, target).ok_or(PathError::Unreachable {
        from: source,
        to: target,
    })
}

/// Distance-mode route within `1 + acceptable_error_pct / 100` of optimal.
///
/// With a zero error percentage the result matches [`super::shortest_path`]
/// in distance mode whenever coordinates never overstate road lengths.
///
/// # Errors
/// Returns [`PathError::UnknownNode`] for missing endpoints and
/// [`PathError::Unreachable`] when no route exists.
///
/// # Examples
/// ```
/// use waymark_core::{approx_shortest_path, test_support::diamond};
///
/// let path = approx_shortest_path(&diamond(), 1, 4, 10.0)?;
/// assert!(path.cost <= 25.0 * 1.1);
/// # Ok::<(), waymark_core::PathError>(())
/// ```
pub fn approx_shortest_path(
    graph: &RoadGraph,
    source: NodeId,
    target: NodeId,
    acceptable_error_pct: f64,
) -> Result<Path, PathError> {
    weighted_astar(graph, source, target, inflation(acceptable_error_pct), || false)
}

/// Approximate distances for `pairs` under one shared wall-clock `budget`.
///
/// A pair is started only while the elapsed time is below the budget, and a
/// running search is abandoned once 95% of the budget has elapsed. Pairs
/// naming unknown nodes, unreachable pairs and abandoned searches are left
/// out of the result, as are pairs never started. A zero budget yields an
/// empty result.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use waymark_core::{approx_batch, test_support::diamond};
///
/// let graph = diamond();
/// let pairs = [(1, 4), (1, 99), (2, 3)];
/// let found = approx_batch(&graph, &pairs, Duration::from_secs(5), 0.0);
/// assert_eq!(found.len(), 2);
/// assert!(approx_batch(&graph, &pairs, Duration::ZERO, 0.0).is_empty());
/// ```
pub fn approx_batch(
    graph: &RoadGraph,
    pairs: &[(NodeId, NodeId)],
    budget: Duration,
    acceptable_error_pct: f64,
) -> Vec<ApproxDistance> {
    let started = Instant::now();
    let search_limit = budget.mul_f64(SEARCH_BUDGET_SHARE);
    let weight = inflation(acceptable_error_pct);
    let mut found = Vec::new();

    for (started_pairs, &(source, target)) in pairs.iter().enumerate() {
        if started.elapsed() >= budget {
            log::warn!(
                "approximate batch budget of {budget:?} exhausted after {started_pairs} of {} pairs",
                pairs.len()
            );
            break;
        }
        match weighted_astar(graph, source, target, weight, || {
            started.elapsed() >= search_limit
        }) {
            Ok(path) => found.push(ApproxDistance {
                source,
                target,
                distance: path.cost,
            }),
            Err(err) => log::debug!("skipping approximate pair {source} -> {target}: {err}"),
        }
    }
    found
}
