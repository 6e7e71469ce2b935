//! Document formats and persisted artefacts for the Waymark engine.
//!
//! Responsibilities:
//! - Load and validate road-network JSON documents into a
//!   [`waymark_core::RoadGraph`].
//! - Decode query-event documents into typed [`waymark_core::Query`] values,
//!   one event at a time.
//! - Render result documents for processed events.
//! - Persist and load precomputed travel-time matrices.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `waymark-core`).
//! - All file access goes through `waymark-fs`.
//!
//! Invariants:
//! - A malformed event never prevents the rest of a document from decoding.
//! - No global mutable state.

mod error;
mod graph_file;
mod matrix_file;
mod query_file;
mod report;

pub use error::{
    EventError, GraphDocumentError, GraphFileError, QueryFileError, ReportError,
    TravelTimeFileError, TravelTimeWriteError,
};
pub use graph_file::{EdgeRecord, GraphDocument, NodeRecord, load_graph};
pub use matrix_file::{
    TRAVEL_TIME_MAGIC, TRAVEL_TIME_VERSION, TravelTimeArtefact, load_travel_times,
    write_travel_times,
};
pub use query_file::{
    EventAction, QueryDocument, QueryEvent, RejectedEvent, decode_event, load_queries,
};
pub use report::{
    DistanceRecord, PathRecord, ResultBody, ResultDocument, ResultRecord, render_results,
    write_results,
};
