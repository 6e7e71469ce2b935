//! Precompute command implementation for the Waymark CLI.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{NetworkTravelTimes, NodeId, TravelTimeProvider};
use waymark_data::{TravelTimeArtefact, load_graph, write_travel_times};
use waymark_fs::open_utf8_file;

use crate::{
    ARG_GRAPH, ARG_NODES, ARG_NODES_FILE, ARG_OUTPUT, CliError, ENV_PRECOMPUTE_GRAPH,
    ENV_PRECOMPUTE_NODES, ENV_PRECOMPUTE_OUTPUT, require_existing,
};

/// CLI arguments for the `precompute` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "precompute",
    long_about = "Compute time-mode travel times between every ordered pair \
                 of the selected junctions, departing at midnight, and \
                 persist them as a binary artefact. Unreachable pairs are \
                 stored as gaps.",
    about = "Precompute a travel-time matrix"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct PrecomputeArgs {
    /// Path to the road-network JSON document.
    #[arg(long = ARG_GRAPH, value_name = "path")]
    #[serde(default)]
    pub(crate) graph: Option<Utf8PathBuf>,
    /// Comma-separated junction ids; takes precedence over `--nodes-file`.
    #[arg(long = ARG_NODES, value_name = "ids")]
    #[serde(default)]
    pub(crate) nodes: Option<String>,
    /// File listing junction ids separated by commas or whitespace.
    #[arg(long = ARG_NODES_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) nodes_file: Option<Utf8PathBuf>,
    /// Destination of the travel-time artefact.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PrecomputeArgs {
    pub(crate) fn into_config(self) -> Result<PrecomputeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PrecomputeConfig::try_from(merged)
    }
}

/// Where the junction ids come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeSelection {
    Listed(Vec<NodeId>),
    File(Utf8PathBuf),
}

/// Resolved `precompute` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrecomputeConfig {
    pub(crate) graph: Utf8PathBuf,
    pub(crate) nodes: NodeSelection,
    pub(crate) output: Utf8PathBuf,
}

impl PrecomputeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.graph, ARG_GRAPH)?;
        if let NodeSelection::File(path) = &self.nodes {
            require_existing(path, ARG_NODES_FILE)?;
        }
        Ok(())
    }

    fn resolve_nodes(&self) -> Result<Vec<NodeId>, CliError> {
        match &self.nodes {
            NodeSelection::Listed(nodes) => Ok(nodes.clone()),
            NodeSelection::File(path) => read_node_list(path),
        }
    }
}

impl TryFrom<PrecomputeArgs> for PrecomputeConfig {
    type Error = CliError;

    fn try_from(args: PrecomputeArgs) -> Result<Self, Self::Error> {
        let graph = args.graph.ok_or(CliError::MissingArgument {
            field: ARG_GRAPH,
            env: ENV_PRECOMPUTE_GRAPH,
        })?;
        let nodes = match (args.nodes, args.nodes_file) {
            (Some(listed), _) => NodeSelection::Listed(parse_node_list(&listed)?),
            (None, Some(path)) => NodeSelection::File(path),
            (None, None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_NODES,
                    env: ENV_PRECOMPUTE_NODES,
                });
            }
        };
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_PRECOMPUTE_OUTPUT,
        })?;
        Ok(Self {
            graph,
            nodes,
            output,
        })
    }
}

/// Parse junction ids separated by commas and/or whitespace.
pub(crate) fn parse_node_list(raw: &str) -> Result<Vec<NodeId>, CliError> {
    raw.split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<NodeId>()
                .map_err(|source| CliError::InvalidNodeList {
                    value: token.to_owned(),
                    source,
                })
        })
        .collect()
}

fn read_node_list(path: &Utf8Path) -> Result<Vec<NodeId>, CliError> {
    let mut contents = String::new();
    open_utf8_file(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|source| CliError::ReadNodeList {
            path: path.to_path_buf(),
            source,
        })?;
    parse_node_list(&contents)
}

pub(crate) fn run_precompute(args: PrecomputeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    precompute(&config)
}

/// Build the matrix for `config` and persist it.
pub(crate) fn precompute(config: &PrecomputeConfig) -> Result<(), CliError> {
    let graph = load_graph(&config.graph)?;
    let nodes = config.resolve_nodes()?;
    let matrix = NetworkTravelTimes::new(&graph).travel_time_matrix(&nodes)?;
    let artefact = TravelTimeArtefact::new(nodes, matrix);
    write_travel_times(&config.output, &artefact)?;
    tracing::info!(
        nodes = artefact.nodes.len(),
        output = %config.output,
        "persisted travel-time artefact"
    );
    Ok(())
}
