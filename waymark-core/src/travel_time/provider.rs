//! Travel-time provider trait and the road-network implementation.

use std::time::Duration;

use crate::cost::CostMode;
use crate::graph::{NodeId, RoadGraph};
use crate::search::network_distances;

use super::error::TravelTimeError;

/// Square matrix of travel times; `None` marks unreachable pairs.
pub type TravelTimeMatrix = Vec<Vec<Option<Duration>>>;

/// Fetch pairwise travel times for a set of nodes.
///
/// Implementers must return a square `n×n` matrix where `n == nodes.len()`.
/// `matrix[i][j]` is the travel time from `nodes[i]` to `nodes[j]`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use waymark_core::{NodeId, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};
///
/// struct UnitProvider;
///
/// impl TravelTimeProvider for UnitProvider {
///     fn travel_time_matrix(&self, nodes: &[NodeId]) -> Result<TravelTimeMatrix, TravelTimeError> {
///         if nodes.is_empty() {
///             return Err(TravelTimeError::EmptyInput);
///         }
///         Ok(nodes
///             .iter()
///             .map(|from| {
///                 nodes
///                     .iter()
///                     .map(|to| Some(if from == to { Duration::ZERO } else { Duration::from_secs(1) }))
///                     .collect()
///             })
///             .collect())
///     }
/// }
///
/// let matrix = UnitProvider.travel_time_matrix(&[1, 2])?;
/// assert_eq!(matrix.len(), 2);
/// # Ok::<(), TravelTimeError>(())
/// ```
pub trait TravelTimeProvider {
    /// Return a matrix of travel times for `nodes`.
    ///
    /// Implementations must return `Err(TravelTimeError::EmptyInput)` when
    /// `nodes` is empty.
    fn travel_time_matrix(&self, nodes: &[NodeId]) -> Result<TravelTimeMatrix, TravelTimeError>;
}

/// Travel times along the road network in time mode, departing at midnight.
///
/// Each row costs one single-source search, so the matrix is meant to be
/// precomputed offline rather than per query.
#[derive(Debug, Clone, Copy)]
pub struct NetworkTravelTimes<'graph> {
    graph: &'graph RoadGraph,
}

impl<'graph> NetworkTravelTimes<'graph> {
    /// Wrap `graph`.
    pub const fn new(graph: &'graph RoadGraph) -> Self {
        Self { graph }
    }
}

impl TravelTimeProvider for NetworkTravelTimes<'_> {
    fn travel_time_matrix(&self, nodes: &[NodeId]) -> Result<TravelTimeMatrix, TravelTimeError> {
        if nodes.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        if let Some(&id) = nodes.iter().find(|&&id| !self.graph.contains_node(id)) {
            return Err(TravelTimeError::UnknownNode { id });
        }

        let mut matrix = Vec::with_capacity(nodes.len());
        for &from in nodes {
            let seconds = network_distances(self.graph, from, CostMode::Time)
                .map_err(|_| TravelTimeError::UnknownNode { id: from })?;
            matrix.push(
                nodes
                    .iter()
                    .map(|to| {
                        seconds
                            .get(to)
                            .and_then(|&secs| Duration::try_from_secs_f64(secs).ok())
                    })
                    .collect(),
            );
        }
        log::info!("computed {0}x{0} travel-time matrix", nodes.len());
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diamond, from_hops};
    use rstest::rstest;

    #[rstest]
    fn returns_square_matrix() {
        let graph = diamond();
        let nodes = [1, 3, 4];
        let matrix = NetworkTravelTimes::new(&graph)
            .travel_time_matrix(&nodes)
            .expect("expected square matrix from the diamond graph");
        assert_eq!(matrix.len(), nodes.len());
        assert!(matrix.iter().all(|row| row.len() == nodes.len()));
        assert_eq!(matrix.first().and_then(|row| row.first()).copied(), Some(Some(Duration::ZERO)));
        assert_eq!(
            matrix.first().and_then(|row| row.get(2)).copied(),
            Some(Some(Duration::from_secs(4)))
        );
    }

    #[rstest]
    fn unreachable_pairs_are_none() {
        let graph = from_hops(&[(1, 2, 30.0)], true);
        let matrix = NetworkTravelTimes::new(&graph)
            .travel_time_matrix(&[1, 2])
            .expect("both nodes exist");
        assert_eq!(matrix, vec![
            vec![Some(Duration::ZERO), Some(Duration::from_secs(30))],
            vec![None, Some(Duration::ZERO)],
        ]);
    }

    #[rstest]
    fn errors_on_empty_input() {
        let graph = diamond();
        let err = NetworkTravelTimes::new(&graph)
            .travel_time_matrix(&[])
            .expect_err("expected EmptyInput for empty slice");
        assert_eq!(err, TravelTimeError::EmptyInput);
    }

    #[rstest]
    fn errors_on_unknown_node() {
        let graph = diamond();
        let err = NetworkTravelTimes::new(&graph)
            .travel_time_matrix(&[1, 8])
            .expect_err("node 8 is missing");
        assert_eq!(err, TravelTimeError::UnknownNode { id: 8 });
    }
}
