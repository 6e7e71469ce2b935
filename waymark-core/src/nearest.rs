//! K-nearest points of interest around a query location.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cost::CostMode;
use crate::graph::{NodeId, RoadGraph};
use crate::search::network_distances;

/// Distance used to rank candidate nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum KnnMetric {
    /// Planar distance in coordinate space.
    #[default]
    Euclidean,
    /// Road length from the node nearest the query point.
    Network,
}

impl fmt::Display for KnnMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Euclidean => "euclidean",
            Self::Network => "network",
        })
    }
}

/// Error returned when parsing an unknown [`KnnMetric`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown distance metric `{0}`; expected `euclidean` or `network`")]
pub struct ParseKnnMetricError(pub String);

impl FromStr for KnnMetric {
    type Err = ParseKnnMetricError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("euclidean") {
            Ok(Self::Euclidean)
        } else if value.eq_ignore_ascii_case("network") {
            Ok(Self::Network)
        } else {
            Err(ParseKnnMetricError(value.to_owned()))
        }
    }
}

fn tagged(graph: &RoadGraph, id: NodeId, poi: &str) -> bool {
    graph.node(id).is_some_and(|node| node.has_poi(poi))
}

/// Sort by distance then id and keep the first `k`.
fn closest(mut ranked: Vec<(f64, NodeId)>, k: usize) -> Vec<NodeId> {
    ranked.sort_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0).then(lhs.1.cmp(&rhs.1)));
    ranked.into_iter().take(k).map(|(_, id)| id).collect()
}

/// Up to `k` nodes tagged `poi`, closest first by planar distance.
///
/// Equal distances are ordered by ascending id.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{nearest_by_euclid, test_support::tagged_grid};
///
/// // Every third node of a 3x3 grid is a cafe: ids 3, 6 and 9.
/// let graph = tagged_grid(3, 3, "cafe", 3);
/// assert_eq!(nearest_by_euclid(&graph, Coord { x: 2.0, y: 0.0 }, "cafe", 2), vec![3, 6]);
/// ```
pub fn nearest_by_euclid(
    graph: &RoadGraph,
    point: Coord<f64>,
    poi: &str,
    k: usize,
) -> Vec<NodeId> {
    if k == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(f64, NodeId)> = Vec::new();
    for (id, distance_2) in graph.nodes_by_distance(point) {
        let full = ranked.len() >= k;
        if full && ranked.last().is_some_and(|&(worst, _)| distance_2 > worst) {
            break;
        }
        if tagged(graph, id, poi) {
            ranked.push((distance_2, id));
        }
    }
    closest(ranked, k)
}

/// Up to `k` nodes tagged `poi`, closest first by road length from the node
/// nearest `point`.
///
/// Unreachable nodes are never returned, and an empty graph yields nothing.
/// Equal distances are ordered by ascending id.
pub fn nearest_by_network(
    graph: &RoadGraph,
    point: Coord<f64>,
    poi: &str,
    k: usize,
) -> Vec<NodeId> {
    if k == 0 {
        return Vec::new();
    }
    let Some(start) = graph.nearest_node(point) else {
        return Vec::new();
    };
    let Ok(distances) = network_distances(graph, start, CostMode::Distance) else {
        return Vec::new();
    };
    let ranked = distances
        .into_iter()
        .filter(|&(id, _)| tagged(graph, id, poi))
        .map(|(id, distance)| (distance, id))
        .collect();
    closest(ranked, k)
}

/// Dispatch to [`nearest_by_euclid`] or [`nearest_by_network`].
pub fn k_nearest(
    graph: &RoadGraph,
    point: Coord<f64>,
    poi: &str,
    k: usize,
    metric: KnnMetric,
) -> Vec<NodeId> {
    match metric {
        KnnMetric::Euclidean => nearest_by_euclid(graph, point, poi, k),
        KnnMetric::Network => nearest_by_network(graph, point, poi, k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};
    use crate::test_support::tagged_grid;
    use rstest::{fixture, rstest};

    fn shop(id: NodeId, x: f64) -> Node {
        Node::new(id, Coord { x, y: 0.0 }, vec!["shop".to_owned()])
    }

    /// Shops spread along a line; the road detours so that network order
    /// differs from planar order.
    #[fixture]
    fn detour() -> RoadGraph {
        let nodes = vec![
            Node::untagged(1, Coord { x: 0.0, y: 0.0 }),
            shop(2, 1.0),
            shop(3, 2.0),
            shop(4, -1.5),
        ];
        let edges = vec![
            Edge::new(1, 1, 2, 50.0),
            Edge::new(2, 1, 3, 10.0),
            Edge::new(3, 1, 4, 20.0),
        ];
        RoadGraph::from_parts(nodes, edges).expect("valid graph")
    }

    #[rstest]
    fn euclidean_ranks_by_planar_distance(detour: RoadGraph) {
        let origin = Coord { x: 0.0, y: 0.0 };
        assert_eq!(nearest_by_euclid(&detour, origin, "shop", 3), vec![2, 4, 3]);
    }

    #[rstest]
    fn network_ranks_by_road_length(detour: RoadGraph) {
        let origin = Coord { x: 0.1, y: 0.0 };
        assert_eq!(nearest_by_network(&detour, origin, "shop", 2), vec![3, 4]);
    }

    #[rstest]
    fn missing_tag_returns_nothing(detour: RoadGraph) {
        let origin = Coord { x: 0.0, y: 0.0 };
        assert!(k_nearest(&detour, origin, "fuel", 3, KnnMetric::Euclidean).is_empty());
        assert!(k_nearest(&detour, origin, "fuel", 3, KnnMetric::Network).is_empty());
    }

    #[rstest]
    fn zero_k_returns_nothing(detour: RoadGraph) {
        let origin = Coord { x: 0.0, y: 0.0 };
        assert!(nearest_by_euclid(&detour, origin, "shop", 0).is_empty());
        assert!(nearest_by_network(&detour, origin, "shop", 0).is_empty());
    }

    #[rstest]
    fn equal_distances_prefer_lower_ids() {
        // Ids 2, 4, 6 and 8 surround the centre node 5 at distance one.
        let graph = tagged_grid(3, 3, "stop", 2);
        let centre = Coord { x: 1.0, y: 1.0 };
        assert_eq!(nearest_by_euclid(&graph, centre, "stop", 3), vec![2, 4, 6]);
    }

    #[rstest]
    fn empty_graph_yields_nothing() {
        let graph = RoadGraph::default();
        let origin = Coord { x: 0.0, y: 0.0 };
        assert!(nearest_by_network(&graph, origin, "shop", 2).is_empty());
        assert!(nearest_by_euclid(&graph, origin, "shop", 2).is_empty());
    }

    #[rstest]
    #[case("Euclidean", KnnMetric::Euclidean)]
    #[case("NETWORK", KnnMetric::Network)]
    fn parses_metric_names(#[case] raw: &str, #[case] expected: KnnMetric) {
        assert_eq!(raw.parse::<KnnMetric>(), Ok(expected));
    }
}
