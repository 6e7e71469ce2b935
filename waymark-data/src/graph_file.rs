//! Road-network JSON documents.
//!
//! A graph document is `{"nodes": [...], "edges": [...]}`. Absent optional
//! fields take loader defaults: coordinates and weights
//! are zero, edges are two-way, and road type and tags are empty.

use std::io::{BufReader, Read};

use camino::Utf8Path;
use geo::Coord;
use serde::{Deserialize, Serialize};
use waymark_core::{Edge, EdgeId, Node, NodeId, RoadGraph, SpeedProfile};
use waymark_fs::open_utf8_file;

use crate::error::{GraphDocumentError, GraphFileError};

/// A junction as written in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier.
    pub id: NodeId,
    /// Latitude; stored as the planar `y` coordinate.
    #[serde(default)]
    pub lat: f64,
    /// Longitude; stored as the planar `x` coordinate.
    #[serde(default)]
    pub lon: f64,
    /// Point-of-interest tags.
    #[serde(default)]
    pub pois: Vec<String>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self::new(
            record.id,
            Coord {
                x: record.lon,
                y: record.lat,
            },
            record.pois,
        )
    }
}

/// A road as written in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Unique identifier.
    pub id: EdgeId,
    /// Tail node.
    pub u: NodeId,
    /// Head node.
    pub v: NodeId,
    /// Length in metres.
    #[serde(default)]
    pub length: f64,
    /// Typical traversal time in seconds.
    #[serde(default)]
    pub average_time: f64,
    /// 96 speeds in metres per second; empty means no profile.
    #[serde(default)]
    pub speed_profile: Vec<f64>,
    /// Whether the road only runs `u → v`.
    #[serde(default)]
    pub oneway: bool,
    /// Road classification.
    #[serde(default)]
    pub road_type: String,
}

impl TryFrom<EdgeRecord> for Edge {
    type Error = GraphDocumentError;

    fn try_from(record: EdgeRecord) -> Result<Self, Self::Error> {
        let mut edge = Self::new(record.id, record.u, record.v, record.length)
            .with_average_time(record.average_time)
            .with_road_type(record.road_type);
        if !record.speed_profile.is_empty() {
            let profile = SpeedProfile::new(record.speed_profile).map_err(|source| {
                GraphDocumentError::SpeedProfile {
                    edge: record.id,
                    source,
                }
            })?;
            edge = edge.with_speed_profile(profile);
        }
        Ok(if record.oneway { edge.one_way() } else { edge })
    }
}

/// Parsed graph document.
///
/// # Examples
/// ```
/// use waymark_data::GraphDocument;
///
/// let json = r#"{
///     "nodes": [{"id": 1, "lat": 28.6, "lon": 77.2, "pois": ["cafe"]}, {"id": 2}],
///     "edges": [{"id": 10, "u": 1, "v": 2, "length": 120.0, "oneway": true}]
/// }"#;
/// let graph = GraphDocument::from_reader(json.as_bytes())?.into_graph()?;
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.outgoing(1).len(), 1);
/// assert!(graph.outgoing(2).is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Junctions.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Roads.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Decode a document from JSON.
    ///
    /// # Errors
    /// Returns the decoder error for malformed JSON or missing ids.
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Validate the document and build the road graph it describes.
    ///
    /// # Errors
    /// Returns [`GraphDocumentError`] for malformed speed profiles and for
    /// any [`waymark_core::GraphBuildError`].
    pub fn into_graph(self) -> Result<RoadGraph, GraphDocumentError> {
        let nodes = self.nodes.into_iter().map(Node::from).collect::<Vec<_>>();
        let edges = self
            .edges
            .into_iter()
            .map(Edge::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoadGraph::from_parts(nodes, edges)?)
    }
}

/// Load and validate the graph document at `path`.
///
/// # Errors
/// Returns [`GraphFileError`] when the file cannot be opened, is not a
/// graph document, or describes an invalid graph.
pub fn load_graph(path: &Utf8Path) -> Result<RoadGraph, GraphFileError> {
    let file = open_utf8_file(path).map_err(|source| GraphFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let document =
        GraphDocument::from_reader(BufReader::new(file)).map_err(|source| GraphFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let graph = document
        .into_graph()
        .map_err(|source| GraphFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "loaded graph from {path}: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
