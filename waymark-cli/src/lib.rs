//! Command-line interface for the Waymark query engine.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
pub mod logging;
mod precompute;
mod run;

pub use error::CliError;

use precompute::{PrecomputeArgs, run_precompute};
use run::{RunArgs, run_queries};

const ARG_GRAPH: &str = "graph";
const ARG_QUERIES: &str = "queries";
const ARG_NODES: &str = "nodes";
const ARG_NODES_FILE: &str = "nodes-file";
const ARG_OUTPUT: &str = "output";
const ENV_RUN_GRAPH: &str = "WAYMARK_CMDS_RUN_GRAPH";
const ENV_RUN_QUERIES: &str = "WAYMARK_CMDS_RUN_QUERIES";
const ENV_PRECOMPUTE_GRAPH: &str = "WAYMARK_CMDS_PRECOMPUTE_GRAPH";
const ENV_PRECOMPUTE_NODES: &str = "WAYMARK_CMDS_PRECOMPUTE_NODES";
const ENV_PRECOMPUTE_OUTPUT: &str = "WAYMARK_CMDS_PRECOMPUTE_OUTPUT";

/// Run the Waymark CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, an input cannot be
/// loaded, or an output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Run(args) => run_queries(args),
        Command::Precompute(args) => run_precompute(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Answer road-network queries and precompute travel times",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a query-event document against a road network.
    Run(RunArgs),
    /// Precompute a travel-time matrix between selected junctions.
    Precompute(PrecomputeArgs),
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match waymark_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
