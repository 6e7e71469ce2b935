//! Run command implementation for the Waymark CLI.

use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waymark_core::Engine;
use waymark_data::{
    QueryDocument, ResultBody, ResultDocument, ResultRecord, decode_event, load_graph,
    load_queries, render_results, write_results,
};

use crate::{
    ARG_GRAPH, ARG_OUTPUT, ARG_QUERIES, CliError, ENV_RUN_GRAPH, ENV_RUN_QUERIES,
    require_existing,
};

/// CLI arguments for the `run` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "run",
    long_about = "Load a road network, answer every event of a query \
                 document in order and write the result document. Paths can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Answer a query-event document"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct RunArgs {
    /// Path to the road-network JSON document.
    #[arg(long = ARG_GRAPH, value_name = "path")]
    #[serde(default)]
    pub(crate) graph: Option<Utf8PathBuf>,
    /// Path to the query-event JSON document.
    #[arg(long = ARG_QUERIES, value_name = "path")]
    #[serde(default)]
    pub(crate) queries: Option<Utf8PathBuf>,
    /// Where to write the result document; stdout when omitted.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RunArgs {
    pub(crate) fn into_config(self) -> Result<RunConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RunConfig::try_from(merged)
    }
}

/// Resolved `run` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunConfig {
    pub(crate) graph: Utf8PathBuf,
    pub(crate) queries: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RunConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.graph, ARG_GRAPH)?;
        require_existing(&self.queries, ARG_QUERIES)?;
        Ok(())
    }
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = CliError;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let graph = args.graph.ok_or(CliError::MissingArgument {
            field: ARG_GRAPH,
            env: ENV_RUN_GRAPH,
        })?;
        let queries = args.queries.ok_or(CliError::MissingArgument {
            field: ARG_QUERIES,
            env: ENV_RUN_QUERIES,
        })?;
        Ok(Self {
            graph,
            queries,
            output: args.output,
        })
    }
}

pub(crate) fn run_queries(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_run_config(args)?;
    let document = answer_files(&config)?;
    match &config.output {
        Some(path) => write_results(path, &document)?,
        None => render_results(std::io::stdout().lock(), &document)?,
    }
    Ok(())
}

pub(crate) fn resolve_run_config(args: RunArgs) -> Result<RunConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Load both documents named by `config` and answer every event.
pub(crate) fn answer_files(config: &RunConfig) -> Result<ResultDocument, CliError> {
    let graph = load_graph(&config.graph)?;
    let queries = load_queries(&config.queries)?;
    Ok(answer_document(Engine::new(graph), queries))
}

/// Answer events in order; a rejected event becomes an error record.
pub(crate) fn answer_document(mut engine: Engine, document: QueryDocument) -> ResultDocument {
    let results = document
        .events
        .iter()
        .map(|raw| answer_event(&mut engine, raw))
        .collect::<Vec<_>>();
    tracing::info!(events = results.len(), "answered query document");
    ResultDocument {
        meta: document.meta,
        results,
    }
}

fn answer_event(engine: &mut Engine, raw: &Value) -> ResultRecord {
    let started = Instant::now();
    let record = match decode_event(raw) {
        Ok(event) => {
            let _span = tracing::debug_span!("query", kind = event.action.kind()).entered();
            let outcome = event.action.run(engine);
            ResultRecord::new(event.id, ResultBody::from_outcome(outcome))
        }
        Err(rejected) => {
            tracing::warn!(id = %rejected.id, error = %rejected.error, "rejected query event");
            ResultRecord::new(rejected.id, ResultBody::from_error(&rejected.error))
        }
    };
    record.with_processing_time(millis(started.elapsed()))
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
