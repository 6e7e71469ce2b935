//! Facade crate for the Waymark road-network query engine.
//!
//! This crate re-exports the core routing types and, behind the `data`
//! feature, the document and artefact formats.

#![forbid(unsafe_code)]

pub use waymark_core::{
    ApproxDistance, Constraints, CostMode, Edge, EdgeId, EdgePatch, Engine, GraphBuildError,
    GraphError, KnnMetric, NetworkTravelTimes, Node, NodeId, Path, PathError, Query, QueryOutcome,
    RoadGraph, SpeedProfile, TravelTimeError, TravelTimeMatrix, TravelTimeProvider,
};

#[cfg(feature = "data")]
pub use waymark_data::{
    GraphDocument, QueryDocument, ResultDocument, TravelTimeArtefact, load_graph, load_queries,
    load_travel_times, write_results, write_travel_times,
};
