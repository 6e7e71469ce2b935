//! Typed query dispatch over a mutable road graph.
//!
//! [`Engine`] owns the [`RoadGraph`] and executes one [`Query`] at a time.
//! Every query takes `&mut self`, so a mutation is visible to every later
//! query and never overlaps a read. Failures are folded into the returned
//! [`QueryOutcome`]: a rejected mutation reports `done: false`, a failed
//! search reports no path, and empty collections stand in for everything
//! else. No query can fail the caller's batch.

use std::time::Duration;

use geo::Coord;

use crate::cost::CostMode;
use crate::graph::{EdgeId, EdgePatch, NodeId, RoadGraph};
use crate::k_paths::{k_shortest_paths, k_shortest_paths_heuristic};
use crate::nearest::{KnnMetric, k_nearest};
use crate::search::{ApproxDistance, Constraints, Path, approx_batch, shortest_path};

/// One request against the road network.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Move an edge to the tombstone table.
    RemoveEdge {
        /// Edge to remove.
        edge_id: EdgeId,
    },
    /// Patch a live edge or restore a removed one.
    ModifyEdge {
        /// Edge to patch.
        edge_id: EdgeId,
        /// Attributes to replace.
        patch: EdgePatch,
    },
    /// Constrained single-pair shortest path.
    ShortestPath {
        /// Search origin.
        source: NodeId,
        /// Search destination.
        target: NodeId,
        /// Quantity to minimise.
        mode: CostMode,
        /// Nodes and road types to avoid.
        constraints: Constraints,
    },
    /// Nearest nodes carrying a point-of-interest tag.
    Knn {
        /// Query location (`x = longitude`, `y = latitude`).
        point: Coord<f64>,
        /// Required point-of-interest tag.
        poi: String,
        /// Maximum number of results.
        k: usize,
        /// Ranking distance.
        metric: KnnMetric,
    },
    /// Exact k shortest loopless paths.
    KShortestPaths {
        /// Search origin.
        source: NodeId,
        /// Search destination.
        target: NodeId,
        /// Maximum number of paths.
        k: usize,
    },
    /// Diverse alternatives with bounded pairwise overlap.
    KShortestPathsHeuristic {
        /// Search origin.
        source: NodeId,
        /// Search destination.
        target: NodeId,
        /// Maximum number of paths.
        k: usize,
        /// Highest acceptable edge overlap in percent.
        overlap_threshold: f64,
    },
    /// Approximate distances for many pairs under one time budget.
    ApproxShortestPathBatch {
        /// Source/target pairs in processing order.
        pairs: Vec<(NodeId, NodeId)>,
        /// Wall-clock budget for the whole batch.
        time_budget: Duration,
        /// Acceptable error in percent of the optimal distance.
        acceptable_error_pct: f64,
    },
}

impl Query {
    /// Wire name of the query kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RemoveEdge { .. } => "remove_edge",
            Self::ModifyEdge { .. } => "modify_edge",
            Self::ShortestPath { .. } => "shortest_path",
            Self::Knn { .. } => "knn",
            Self::KShortestPaths { .. } => "k_shortest_paths",
            Self::KShortestPathsHeuristic { .. } => "k_shortest_paths_heuristic",
            Self::ApproxShortestPathBatch { .. } => "approx_shortest_path",
        }
    }
}

/// Result of executing a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Outcome of [`Query::RemoveEdge`] or [`Query::ModifyEdge`].
    Mutation {
        /// Whether the graph changed.
        done: bool,
    },
    /// Outcome of [`Query::ShortestPath`].
    ShortestPath {
        /// Mode the cost is expressed in.
        mode: CostMode,
        /// The route, or `None` when none is possible.
        path: Option<Path>,
    },
    /// Outcome of [`Query::Knn`], closest first.
    Nodes(Vec<NodeId>),
    /// Outcome of either k-shortest-paths query.
    Paths(Vec<Path>),
    /// Outcome of [`Query::ApproxShortestPathBatch`].
    Distances(Vec<ApproxDistance>),
}

/// Single-writer query executor owning the road graph.
///
/// # Examples
/// ```
/// use waymark_core::{Constraints, CostMode, Engine, Query, QueryOutcome, test_support::diamond};
///
/// let mut engine = Engine::new(diamond());
/// let query = Query::ShortestPath {
///     source: 1,
///     target: 3,
///     mode: CostMode::Distance,
///     constraints: Constraints::default(),
/// };
///
/// engine.execute(&Query::RemoveEdge { edge_id: 1 });
/// let QueryOutcome::ShortestPath { path: Some(path), .. } = engine.execute(&query) else {
///     panic!("a route remains");
/// };
/// assert_eq!(path.nodes, vec![1, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    graph: RoadGraph,
}

impl Engine {
    /// Take ownership of `graph`.
    pub const fn new(graph: RoadGraph) -> Self {
        Self { graph }
    }

    /// Current state of the graph.
    pub const fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Release the graph.
    pub fn into_graph(self) -> RoadGraph {
        self.graph
    }

    /// Run `query` to completion against the current graph.
    pub fn execute(&mut self, query: &Query) -> QueryOutcome {
        match query {
            Query::RemoveEdge { edge_id } => {
                let result = self.graph.remove_edge(*edge_id);
                if let Err(err) = &result {
                    log::debug!("remove_edge rejected: {err}");
                }
                QueryOutcome::Mutation {
                    done: result.is_ok(),
                }
            }
            Query::ModifyEdge { edge_id, patch } => {
                let result = self.graph.modify_edge(*edge_id, patch);
                match &result {
                    Ok(outcome) => log::debug!("modify_edge {edge_id}: {outcome:?}"),
                    Err(err) => log::debug!("modify_edge rejected: {err}"),
                }
                QueryOutcome::Mutation {
                    done: result.is_ok(),
                }
            }
            Query::ShortestPath {
                source,
                target,
                mode,
                constraints,
            } => {
                let path = shortest_path(&self.graph, *source, *target, *mode, constraints)
                    .inspect_err(|err| log::debug!("shortest_path impossible: {err}"))
                    .ok();
                QueryOutcome::ShortestPath { mode: *mode, path }
            }
            Query::Knn {
                point,
                poi,
                k,
                metric,
            } => QueryOutcome::Nodes(k_nearest(&self.graph, *point, poi, *k, *metric)),
            Query::KShortestPaths { source, target, k } => QueryOutcome::Paths(
                k_shortest_paths(&self.graph, *source, *target, *k)
                    .inspect_err(|err| log::debug!("k_shortest_paths found nothing: {err}"))
                    .unwrap_or_default(),
            ),
            Query::KShortestPathsHeuristic {
                source,
                target,
                k,
                overlap_threshold,
            } => QueryOutcome::Paths(
                k_shortest_paths_heuristic(&self.graph, *source, *target, *k, *overlap_threshold)
                    .inspect_err(|err| {
                        log::debug!("k_shortest_paths_heuristic found nothing: {err}");
                    })
                    .unwrap_or_default(),
            ),
            Query::ApproxShortestPathBatch {
                pairs,
                time_budget,
                acceptable_error_pct,
            } => QueryOutcome::Distances(approx_batch(
                &self.graph,
                pairs,
                *time_budget,
                *acceptable_error_pct,
            )),
        }
    }
}
