use thiserror::Error;

use crate::graph::NodeId;

/// Errors from [`crate::travel_time::TravelTimeProvider::travel_time_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    /// No nodes were provided.
    ///
    /// The provider requires at least one node to compute a matrix. Callers
    /// should pre-filter input to avoid this condition.
    #[error("at least one node is required")]
    EmptyInput,
    /// A requested node is not part of the graph.
    #[error("node {id} is not in the graph")]
    UnknownNode {
        /// Missing node.
        id: NodeId,
    },
}
