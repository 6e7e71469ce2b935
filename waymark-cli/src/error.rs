//! Error types emitted by the Waymark CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::num::ParseIntError;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_core::TravelTimeError;
use waymark_data::{GraphFileError, QueryFileError, ReportError, TravelTimeWriteError};

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Loading the road network failed.
    #[error(transparent)]
    LoadGraph(#[from] GraphFileError),
    /// Loading the query document failed.
    #[error(transparent)]
    LoadQueries(#[from] QueryFileError),
    /// Writing the result document failed.
    #[error(transparent)]
    WriteResults(#[from] ReportError),
    /// A node list contained something other than node ids.
    #[error("invalid node id {value:?} in node list: {source}")]
    InvalidNodeList {
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// Reading the node list file failed.
    #[error("failed to read node list at {path:?}: {source}")]
    ReadNodeList {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Computing the travel-time matrix failed.
    #[error("failed to compute travel times: {0}")]
    TravelTimes(#[from] TravelTimeError),
    /// Writing the travel-time artefact failed.
    #[error(transparent)]
    WriteTravelTimes(#[from] TravelTimeWriteError),
}
