//! Error types produced while reading and writing Waymark documents.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_core::{EdgeId, GraphBuildError, ParseCostModeError, ParseKnnMetricError, SpeedProfileError};

/// Errors raised while turning a parsed graph document into a road graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphDocumentError {
    /// An edge carried a speed profile of the wrong shape.
    #[error("edge {edge} has an invalid speed profile: {source}")]
    SpeedProfile {
        /// Offending edge.
        edge: EdgeId,
        /// Validation failure.
        #[source]
        source: SpeedProfileError,
    },
    /// The nodes and edges did not form a valid graph.
    #[error(transparent)]
    Build(#[from] GraphBuildError),
}

/// Errors raised by [`load_graph`](crate::load_graph).
#[derive(Debug, Error)]
pub enum GraphFileError {
    /// The graph file could not be opened.
    #[error("failed to open graph file at {path:?}: {source}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file was not a valid graph JSON document.
    #[error("failed to parse graph JSON at {path:?}: {source}")]
    Parse {
        /// Requested path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The document parsed but described an invalid graph.
    #[error("graph in {path:?} failed validation: {source}")]
    Invalid {
        /// Requested path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: GraphDocumentError,
    },
}

/// Errors raised by [`load_queries`](crate::load_queries).
#[derive(Debug, Error)]
pub enum QueryFileError {
    /// The query file could not be opened.
    #[error("failed to open query file at {path:?}: {source}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file was not a valid query JSON document.
    #[error("failed to parse query JSON at {path:?}: {source}")]
    Parse {
        /// Requested path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a single query event is rejected.
///
/// A rejected event becomes an error record in the result document; the
/// rest of the batch is still processed.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event was missing fields, had the wrong types or named an
    /// unknown query type.
    #[error("malformed event: {source}")]
    Malformed {
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The `mode` field named no known cost mode.
    #[error(transparent)]
    Mode(#[from] ParseCostModeError),
    /// The `metric` field named no known distance metric.
    #[error(transparent)]
    Metric(#[from] ParseKnnMetricError),
}

/// Errors raised while writing a result document.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output file could not be created.
    #[error("failed to create result file at {path:?}: {source}")]
    Create {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Serialising or writing the document failed.
    #[error("failed to write result document: {source}")]
    Write {
        /// Encoder or writer error.
        #[source]
        source: serde_json::Error,
    },
    /// Flushing the rendered document failed.
    #[error("failed to flush result document: {source}")]
    Flush {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised while loading a travel-time artefact.
#[derive(Debug, Error)]
pub enum TravelTimeFileError {
    /// The artefact could not be read from disk.
    #[error("failed to read travel-time artefact from {path:?}: {source}")]
    Io {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The payload could not be decoded.
    #[error("failed to decode travel-time artefact from {path:?}: {source}")]
    Decode {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not start with the artefact magic.
    #[error("invalid travel-time artefact magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected identifier.
        expected: [u8; 4],
        /// Bytes read from the file.
        found: [u8; 4],
    },
    /// The header named an unsupported format version.
    #[error("unsupported travel-time artefact version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version written by this build.
        supported: u16,
    },
    /// The matrix was not square over the listed nodes.
    #[error("travel-time matrix does not match its {nodes} nodes")]
    Shape {
        /// Number of nodes listed in the artefact.
        nodes: usize,
    },
}

/// Errors raised while writing a travel-time artefact.
#[derive(Debug, Error)]
pub enum TravelTimeWriteError {
    /// Creating or syncing the file failed.
    #[error("failed to write travel-time artefact to {path:?}: {source}")]
    Io {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The artefact could not be encoded.
    #[error("failed to encode travel-time artefact for {path:?}: {source}")]
    Encode {
        /// Destination path.
        path: Utf8PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
}
