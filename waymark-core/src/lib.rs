//! Core routing engine for Waymark.
//!
//! The crate holds a mutable road network ([`RoadGraph`]) and the searches
//! that run over it: constrained shortest paths in distance or
//! time-of-day-aware time mode, exact and diverse k-shortest paths,
//! budgeted approximate batches, and point-of-interest nearest-neighbour
//! lookup. [`Engine`] executes typed [`Query`] values one at a time.
//!
//! The crate performs no I/O. Loading graphs and query documents lives in
//! `waymark-data`.

pub mod cost;
pub mod graph;
pub mod k_paths;
pub mod nearest;
pub mod query;
pub mod search;
#[doc(hidden)]
pub mod test_support;
pub mod travel_time;

pub use cost::{CostMode, ParseCostModeError, traversal_cost};
pub use graph::{
    Edge, EdgeId, EdgePatch, GraphBuildError, GraphError, Node, NodeId, PatchOutcome, RoadGraph,
    SPEED_PROFILE_SLOTS, SpeedProfile, SpeedProfileError,
};
pub use k_paths::{edge_overlap, k_shortest_paths, k_shortest_paths_heuristic};
pub use nearest::{KnnMetric, ParseKnnMetricError, k_nearest, nearest_by_euclid, nearest_by_network};
pub use query::{Engine, Query, QueryOutcome};
pub use search::{
    ApproxDistance, Constraints, Path, PathError, approx_batch, approx_shortest_path,
    network_distances, shortest_path,
};
pub use travel_time::{NetworkTravelTimes, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};
