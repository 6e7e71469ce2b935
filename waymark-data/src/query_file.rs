//! Query-event JSON documents.
//!
//! A query document is `{"meta": ..., "events": [...]}`. Each event carries
//! an `id` that is echoed into its result and a `type` naming the query
//! kind. Events are decoded one at a time so a malformed event rejects only
//! itself.

use std::io::{BufReader, Read};
use std::time::Duration;

use camino::Utf8Path;
use geo::Coord;
use serde::Deserialize;
use serde_json::Value;
use waymark_core::{
    Constraints, CostMode, EdgeId, EdgePatch, Engine, KnnMetric, NodeId, Query, QueryOutcome,
};
use waymark_fs::open_utf8_file;

use crate::error::{EventError, QueryFileError};

/// Parsed query document with its events still undecoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryDocument {
    /// Free-form metadata copied into the result document.
    #[serde(default)]
    pub meta: Value,
    /// Raw events in processing order.
    #[serde(default)]
    pub events: Vec<Value>,
}

impl QueryDocument {
    /// Decode a document from JSON.
    ///
    /// # Errors
    /// Returns the decoder error when the input is not a JSON object of the
    /// expected shape.
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Decode every event, keeping rejected events in place.
    pub fn decode_events(&self) -> impl Iterator<Item = Result<QueryEvent, RejectedEvent>> + '_ {
        self.events.iter().map(decode_event)
    }
}

/// A decoded event ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEvent {
    /// Caller-supplied identifier.
    pub id: Value,
    /// What answering the event takes.
    pub action: EventAction,
}

/// How a decoded event is answered.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    /// Run the query against the engine.
    Execute(Query),
    /// The event names an id no graph can hold, so its answer is known
    /// without consulting the engine.
    Answered {
        /// Wire name of the query kind.
        kind: &'static str,
        /// The not-found answer.
        outcome: QueryOutcome,
    },
}

impl EventAction {
    /// Wire name of the query kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Execute(query) => query.kind(),
            Self::Answered { kind, .. } => *kind,
        }
    }

    /// Produce the event's outcome, executing against `engine` when needed.
    pub fn run(self, engine: &mut Engine) -> QueryOutcome {
        match self {
            Self::Execute(query) => engine.execute(&query),
            Self::Answered { outcome, .. } => outcome,
        }
    }
}

/// An event that could not be decoded.
#[derive(Debug)]
pub struct RejectedEvent {
    /// Caller-supplied identifier, or `null` when absent.
    pub id: Value,
    /// Why the event was rejected.
    pub error: EventError,
}

#[derive(Debug, Deserialize)]
struct QueryPoint {
    lat: f64,
    lon: f64,
}

/// An id as written in a document. Negative values are accepted so they
/// can be answered as unknown instead of rejecting the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum WireId {
    Valid(u64),
    Negative(i64),
}

impl WireId {
    const fn resolve(self) -> Option<u64> {
        match self {
            Self::Valid(id) => Some(id),
            Self::Negative(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PairRecord {
    source: WireId,
    target: WireId,
}

impl PairRecord {
    fn resolve(&self) -> Option<(NodeId, NodeId)> {
        Some((self.source.resolve()?, self.target.resolve()?))
    }
}

fn endpoints(source: WireId, target: WireId) -> Option<(NodeId, NodeId)> {
    PairRecord { source, target }.resolve()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventBody {
    RemoveEdge {
        edge_id: WireId,
    },
    ModifyEdge {
        edge_id: WireId,
        #[serde(default)]
        patch: EdgePatch,
    },
    ShortestPath {
        source: WireId,
        target: WireId,
        #[serde(default)]
        mode: Option<String>,
        #[serde(default)]
        constraints: Constraints,
    },
    Knn {
        query_point: QueryPoint,
        poi: String,
        k: usize,
        metric: String,
    },
    KShortestPaths {
        source: WireId,
        target: WireId,
        k: usize,
    },
    KShortestPathsHeuristic {
        source: WireId,
        target: WireId,
        k: usize,
        overlap_threshold: f64,
    },
    ApproxShortestPath {
        #[serde(default)]
        queries: Vec<PairRecord>,
        time_budget_ms: f64,
        #[serde(default)]
        acceptable_error_pct: f64,
    },
}

/// Convert a millisecond budget to a [`Duration`]; non-positive and `NaN`
/// budgets are zero and oversized ones saturate.
#[expect(
    clippy::float_arithmetic,
    reason = "budgets are given in fractional milliseconds"
)]
fn budget_from_millis(millis: f64) -> Duration {
    if millis.is_nan() || millis <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
}

const fn answered(kind: &'static str, outcome: QueryOutcome) -> EventAction {
    EventAction::Answered { kind, outcome }
}

fn edge_query(
    kind: &'static str,
    edge_id: WireId,
    query: impl FnOnce(EdgeId) -> Query,
) -> EventAction {
    match edge_id.resolve() {
        Some(id) => EventAction::Execute(query(id)),
        None => answered(kind, QueryOutcome::Mutation { done: false }),
    }
}

impl EventBody {
    fn into_action(self) -> Result<EventAction, EventError> {
        Ok(match self {
            Self::RemoveEdge { edge_id } => {
                edge_query("remove_edge", edge_id, |edge_id| Query::RemoveEdge { edge_id })
            }
            Self::ModifyEdge { edge_id, patch } => {
                edge_query("modify_edge", edge_id, |edge_id| Query::ModifyEdge { edge_id, patch })
            }
            Self::ShortestPath {
                source,
                target,
                mode,
                constraints,
            } => {
                let mode = mode
                    .as_deref()
                    .map(str::parse::<CostMode>)
                    .transpose()?
                    .unwrap_or_default();
                match endpoints(source, target) {
                    Some((source, target)) => EventAction::Execute(Query::ShortestPath {
                        source,
                        target,
                        mode,
                        constraints,
                    }),
                    None => answered(
                        "shortest_path",
                        QueryOutcome::ShortestPath { mode, path: None },
                    ),
                }
            }
            Self::Knn {
                query_point,
                poi,
                k,
                metric,
            } => EventAction::Execute(Query::Knn {
                point: Coord {
                    x: query_point.lon,
                    y: query_point.lat,
                },
                poi,
                k,
                metric: metric.parse::<KnnMetric>()?,
            }),
            Self::KShortestPaths { source, target, k } => match endpoints(source, target) {
                Some((source, target)) => {
                    EventAction::Execute(Query::KShortestPaths { source, target, k })
                }
                None => answered("k_shortest_paths", QueryOutcome::Paths(Vec::new())),
            },
            Self::KShortestPathsHeuristic {
                source,
                target,
                k,
                overlap_threshold,
            } => match endpoints(source, target) {
                Some((source, target)) => EventAction::Execute(Query::KShortestPathsHeuristic {
                    source,
                    target,
                    k,
                    overlap_threshold,
                }),
                None => answered("k_shortest_paths_heuristic", QueryOutcome::Paths(Vec::new())),
            },
            Self::ApproxShortestPath {
                queries,
                time_budget_ms,
                acceptable_error_pct,
            } => EventAction::Execute(Query::ApproxShortestPathBatch {
                pairs: queries
                    .iter()
                    .filter_map(|pair| {
                        let resolved = pair.resolve();
                        if resolved.is_none() {
                            log::debug!("skipping batch pair with a negative id: {pair:?}");
                        }
                        resolved
                    })
                    .collect(),
                time_budget: budget_from_millis(time_budget_ms),
                acceptable_error_pct,
            }),
        })
    }
}

/// Decode one raw event.
///
/// # Errors
/// Returns a [`RejectedEvent`] carrying the event's `id` when the event is
/// malformed or names an unknown mode or metric. Negative ids are not
/// errors: they name nothing, so the event is answered as not found and a
/// batch simply drops the affected pairs.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use waymark_core::{CostMode, Query};
/// use waymark_data::{EventAction, decode_event};
///
/// let event = json!({"id": 7, "type": "shortest_path", "source": 1, "target": 4, "mode": "TIME"});
/// let decoded = decode_event(&event).expect("well-formed event");
/// assert_eq!(decoded.id, json!(7));
/// assert!(matches!(
///     decoded.action,
///     EventAction::Execute(Query::ShortestPath { mode: CostMode::Time, .. })
/// ));
///
/// let rejected = decode_event(&json!({"id": 8, "type": "teleport"})).expect_err("unknown type");
/// assert_eq!(rejected.id, json!(8));
/// ```
pub fn decode_event(raw: &Value) -> Result<QueryEvent, RejectedEvent> {
    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let decoded = EventBody::deserialize(raw)
        .map_err(|source| EventError::Malformed { source })
        .and_then(EventBody::into_action);
    match decoded {
        Ok(action) => Ok(QueryEvent { id, action }),
        Err(error) => Err(RejectedEvent { id, error }),
    }
}

/// Load the query document at `path`.
///
/// # Errors
/// Returns [`QueryFileError`] when the file cannot be opened or is not a
/// query document. Individual events are decoded later.
pub fn load_queries(path: &Utf8Path) -> Result<QueryDocument, QueryFileError> {
    let file = open_utf8_file(path).map_err(|source| QueryFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let document =
        QueryDocument::from_reader(BufReader::new(file)).map_err(|source| QueryFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("loaded {} query events from {path}", document.events.len());
    Ok(document)
}
