//! Errors raised while building or mutating a [`RoadGraph`](super::RoadGraph).

use thiserror::Error;

use super::edge::{EdgeId, SpeedProfileError};
use super::node::NodeId;

/// Errors returned by graph mutations.
///
/// Callers on the query path surface every variant as a plain `false`; the
/// variants exist so tests and logs can tell the causes apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The edge id is neither live nor in the tombstone table.
    #[error("edge {id} does not exist")]
    EdgeNotFound {
        /// Requested edge.
        id: EdgeId,
    },
    /// The edge is already in the tombstone table.
    #[error("edge {id} is already removed")]
    AlreadyRemoved {
        /// Requested edge.
        id: EdgeId,
    },
    /// A patch naming no attributes was sent to a live edge.
    #[error("patch for live edge {id} names no attributes")]
    EmptyPatch {
        /// Requested edge.
        id: EdgeId,
    },
    /// A patched length was zero, negative or not finite.
    #[error("edge {id} length must be positive, got {value}")]
    NonPositiveLength {
        /// Requested edge.
        id: EdgeId,
        /// Rejected length.
        value: f64,
    },
    /// A patched average time was zero, negative or not finite.
    #[error("edge {id} average time must be positive, got {value}")]
    NonPositiveAverageTime {
        /// Requested edge.
        id: EdgeId,
        /// Rejected average time.
        value: f64,
    },
    /// A patched speed profile was malformed.
    #[error("edge {id} speed profile is invalid: {source}")]
    InvalidSpeedProfile {
        /// Requested edge.
        id: EdgeId,
        /// Validation failure.
        #[source]
        source: SpeedProfileError,
    },
}

/// Errors returned by [`RoadGraph::from_parts`](super::RoadGraph::from_parts).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphBuildError {
    /// Two nodes shared an id.
    #[error("node {id} is defined more than once")]
    DuplicateNode {
        /// Repeated node id.
        id: NodeId,
    },
    /// Two edges shared an id.
    #[error("edge {id} is defined more than once")]
    DuplicateEdge {
        /// Repeated edge id.
        id: EdgeId,
    },
    /// An edge referenced a node that was not loaded.
    #[error("edge {edge} references unknown node {node}")]
    UnknownEndpoint {
        /// Offending edge.
        edge: EdgeId,
        /// Missing endpoint.
        node: NodeId,
    },
    /// A length or average time was negative or not finite.
    #[error("edge {edge} has invalid {field} {value}")]
    InvalidWeight {
        /// Offending edge.
        edge: EdgeId,
        /// Name of the attribute.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}
