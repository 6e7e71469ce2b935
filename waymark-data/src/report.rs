//! Result documents.
//!
//! Each processed event yields one [`ResultRecord`]: the event `id`, the
//! kind-specific fields and, when the driver measured it, the processing
//! time in milliseconds. The document is written as four-space indented
//! JSON followed by a newline.

use std::io::{BufWriter, Write};

use camino::Utf8Path;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use waymark_core::{ApproxDistance, CostMode, NodeId, Path, QueryOutcome};
use waymark_fs::create_utf8_file;

use crate::error::{EventError, ReportError};

/// One route inside a k-paths result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    /// Visited nodes from source to target.
    pub path: Vec<NodeId>,
    /// Route length in metres.
    pub length: f64,
}

impl From<Path> for PathRecord {
    fn from(path: Path) -> Self {
        Self {
            path: path.nodes,
            length: path.cost,
        }
    }
}

/// One answered pair inside an approximate batch result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRecord {
    /// Pair origin.
    pub source: NodeId,
    /// Pair destination.
    pub target: NodeId,
    /// Length of the route found, in metres.
    pub approx_shortest_distance: f64,
}

impl From<ApproxDistance> for DistanceRecord {
    fn from(found: ApproxDistance) -> Self {
        Self {
            source: found.source,
            target: found.target,
            approx_shortest_distance: found.distance,
        }
    }
}

/// Kind-specific fields of a result record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultBody {
    /// Edge removal or modification.
    Mutation {
        /// Whether the graph changed.
        done: bool,
    },
    /// Shortest path; cost and route are present only when possible.
    ShortestPath {
        /// Whether a route exists.
        possible: bool,
        /// Route cost in distance mode.
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum_distance: Option<f64>,
        /// Route cost in time mode.
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum_time: Option<f64>,
        /// Visited nodes.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<Vec<NodeId>>,
    },
    /// Nearest points of interest.
    Nodes {
        /// Node ids, closest first.
        nodes: Vec<NodeId>,
    },
    /// Exact or diverse alternatives.
    Paths {
        /// Routes in the order they were found.
        paths: Vec<PathRecord>,
    },
    /// Approximate batch.
    Distances {
        /// Pairs answered within the budget.
        distances: Vec<DistanceRecord>,
    },
    /// The event was rejected before execution.
    Error {
        /// Human-readable reason.
        error: String,
    },
}

impl ResultBody {
    /// Map an engine outcome onto the document fields.
    pub fn from_outcome(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Mutation { done } => Self::Mutation { done },
            QueryOutcome::ShortestPath { mode, path } => match path {
                None => Self::ShortestPath {
                    possible: false,
                    minimum_distance: None,
                    minimum_time: None,
                    path: None,
                },
                Some(path) => {
                    let (minimum_distance, minimum_time) = match mode {
                        CostMode::Distance => (Some(path.cost), None),
                        CostMode::Time => (None, Some(path.cost)),
                    };
                    Self::ShortestPath {
                        possible: true,
                        minimum_distance,
                        minimum_time,
                        path: Some(path.nodes),
                    }
                }
            },
            QueryOutcome::Nodes(nodes) => Self::Nodes { nodes },
            QueryOutcome::Paths(paths) => Self::Paths {
                paths: paths.into_iter().map(PathRecord::from).collect(),
            },
            QueryOutcome::Distances(found) => Self::Distances {
                distances: found.into_iter().map(DistanceRecord::from).collect(),
            },
        }
    }

    /// Describe a rejected event.
    pub fn from_error(error: &EventError) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }
}

/// One entry of the `results` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// Identifier echoed from the event.
    pub id: Value,
    /// Kind-specific fields.
    #[serde(flatten)]
    pub body: ResultBody,
    /// Wall-clock processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl ResultRecord {
    /// Record without a processing time.
    pub const fn new(id: Value, body: ResultBody) -> Self {
        Self {
            id,
            body,
            processing_time: None,
        }
    }

    /// Attach the measured processing time.
    #[must_use]
    pub fn with_processing_time(mut self, millis: f64) -> Self {
        self.processing_time = Some(millis);
        self
    }
}

/// The `{"meta", "results"}` document written after a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultDocument {
    /// Metadata copied from the query document.
    pub meta: Value,
    /// One record per event, in event order.
    pub results: Vec<ResultRecord>,
}

/// Render `document` to `writer` as indented JSON.
///
/// # Errors
/// Returns [`ReportError`] when encoding or writing fails.
///
/// # Examples
/// ```
/// use serde_json::{Value, json};
/// use waymark_data::{ResultBody, ResultDocument, ResultRecord, render_results};
///
/// let document = ResultDocument {
///     meta: json!({"phase": 1}),
///     results: vec![ResultRecord::new(json!(1), ResultBody::Mutation { done: true })],
/// };
/// let mut buffer = Vec::new();
/// render_results(&mut buffer, &document)?;
///
/// let parsed: Value = serde_json::from_slice(&buffer)?;
/// assert_eq!(parsed["results"][0], json!({"id": 1, "done": true}));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_results(writer: impl Write, document: &ResultDocument) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(writer);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(|source| ReportError::Write { source })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| ReportError::Flush { source })
}

/// Write `document` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns [`ReportError`] when the file cannot be created or written.
pub fn write_results(path: &Utf8Path, document: &ResultDocument) -> Result<(), ReportError> {
    let file = create_utf8_file(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    render_results(file, document)?;
    log::info!("wrote {} results to {path}", document.results.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn encode(body: ResultBody) -> Value {
        serde_json::to_value(ResultRecord::new(json!("q"), body)).expect("record encodes")
    }

    #[rstest]
    fn impossible_route_omits_cost_and_path() {
        let body = ResultBody::from_outcome(QueryOutcome::ShortestPath {
            mode: CostMode::Distance,
            path: None,
        });
        assert_eq!(encode(body), json!({"id": "q", "possible": false}));
    }

    #[rstest]
    #[case(CostMode::Distance, "minimum_distance")]
    #[case(CostMode::Time, "minimum_time")]
    fn route_cost_is_named_after_mode(#[case] mode: CostMode, #[case] field: &str) {
        let body = ResultBody::from_outcome(QueryOutcome::ShortestPath {
            mode,
            path: Some(Path {
                nodes: vec![1, 2],
                cost: 4.5,
            }),
        });
        let mut expected = json!({"id": "q", "possible": true, "path": [1, 2]});
        expected[field] = json!(4.5);
        assert_eq!(encode(body), expected);
    }

    #[rstest]
    fn alternatives_use_path_and_length() {
        let body = ResultBody::from_outcome(QueryOutcome::Paths(vec![Path {
            nodes: vec![1, 3],
            cost: 2.0,
        }]));
        assert_eq!(
            encode(body),
            json!({"id": "q", "paths": [{"path": [1, 3], "length": 2.0}]})
        );
    }

    #[rstest]
    fn batch_entries_use_document_field_names() {
        let body = ResultBody::from_outcome(QueryOutcome::Distances(vec![ApproxDistance {
            source: 1,
            target: 2,
            distance: 7.0,
        }]));
        assert_eq!(
            encode(body),
            json!({"id": "q", "distances": [{"source": 1, "target": 2, "approx_shortest_distance": 7.0}]})
        );
    }

    #[rstest]
    fn empty_collections_are_still_written() {
        assert_eq!(
            encode(ResultBody::from_outcome(QueryOutcome::Nodes(Vec::new()))),
            json!({"id": "q", "nodes": []})
        );
        assert_eq!(
            encode(ResultBody::from_outcome(QueryOutcome::Paths(Vec::new()))),
            json!({"id": "q", "paths": []})
        );
    }

    #[rstest]
    fn processing_time_is_appended_when_measured() {
        let record = ResultRecord::new(json!(9), ResultBody::Mutation { done: false })
            .with_processing_time(0.25);
        assert_eq!(
            serde_json::to_value(record).expect("record encodes"),
            json!({"id": 9, "done": false, "processing_time": 0.25})
        );
    }

    #[rstest]
    fn rendering_indents_with_four_spaces() {
        let document = ResultDocument {
            meta: json!(null),
            results: Vec::new(),
        };
        let mut buffer = Vec::new();
        render_results(&mut buffer, &document).expect("render document");
        let text = String::from_utf8(buffer).expect("utf-8 output");
        assert_eq!(text, "{\n    \"meta\": null,\n    \"results\": []\n}\n");
    }
}
