//! Focused unit tests covering `run` configuration and event answering.

use super::helpers::{LINE_GRAPH, Workspace, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use crate::run::{RunArgs, RunConfig, answer_document, answer_files};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use waymark_core::Engine;
use waymark_data::{GraphDocument, QueryDocument};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn answered(workspace: &Workspace) -> Value {
    let config = RunConfig {
        graph: workspace.graph(),
        queries: workspace.queries(),
        output: None,
    };
    let document = answer_files(&config).expect("documents answer");
    serde_json::to_value(document).expect("results encode")
}

#[rstest]
#[case(None, Some("queries.json"), ARG_GRAPH, ENV_RUN_GRAPH)]
#[case(Some("graph.json"), None, ARG_QUERIES, ENV_RUN_QUERIES)]
fn converting_without_required_fields_errors(
    #[case] graph: Option<&str>,
    #[case] queries: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = RunArgs {
        graph: graph.map(Utf8PathBuf::from),
        queries: queries.map(Utf8PathBuf::from),
        ..RunArgs::default()
    };
    let err = RunConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn output_is_optional() {
    let args = RunArgs {
        graph: Some(Utf8PathBuf::from("graph.json")),
        queries: Some(Utf8PathBuf::from("queries.json")),
        output: None,
    };
    let config = RunConfig::try_from(args).expect("config should build");
    assert_eq!(config.output, None);
}

#[rstest]
fn validate_sources_reports_missing_files(workspace: Workspace) {
    let config = RunConfig {
        graph: workspace.graph(),
        queries: workspace.root().join("missing.json"),
        output: None,
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_QUERIES);
            assert_eq!(path, workspace.root().join("missing.json"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories(workspace: Workspace) {
    let config = RunConfig {
        graph: workspace.root().to_path_buf(),
        queries: workspace.queries(),
        output: None,
    };
    match config.validate_sources().expect_err("expected directory rejection") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_GRAPH),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn events_are_answered_in_order_against_the_mutated_graph(workspace: Workspace) {
    let results = answered(&workspace);
    let records = results["results"].as_array().expect("results array");
    assert_eq!(records.len(), 4);
    assert_eq!(results["meta"], json!({"suite": "line"}));

    let first = &records[0];
    assert_eq!(first["id"], json!("a"));
    assert_eq!(first["possible"], json!(true));
    assert_eq!(first["minimum_distance"], json!(150.0));
    assert_eq!(first["path"], json!([1, 2, 3]));

    assert_eq!(records[1]["done"], json!(true));

    let after_removal = &records[2];
    assert_eq!(after_removal["possible"], json!(false));
    assert!(after_removal.get("minimum_time").is_none());
    assert!(after_removal.get("path").is_none());
}

#[rstest]
fn malformed_events_become_error_records(workspace: Workspace) {
    let results = answered(&workspace);
    let rejected = &results["results"][3];
    assert_eq!(rejected["id"], json!("d"));
    let message = rejected["error"].as_str().expect("error message");
    assert!(message.contains("sideways"), "unexpected message {message}");
}

#[rstest]
fn every_record_carries_a_processing_time(workspace: Workspace) {
    let results = answered(&workspace);
    for record in results["results"].as_array().expect("results array") {
        let millis = record["processing_time"]
            .as_f64()
            .expect("processing time recorded");
        assert!(millis >= 0.0);
    }
}

#[rstest]
fn empty_documents_keep_their_metadata() {
    let graph = GraphDocument::from_reader(LINE_GRAPH.as_bytes())
        .expect("graph JSON")
        .into_graph()
        .expect("valid graph");
    let document = QueryDocument {
        meta: json!({"phase": 2}),
        events: Vec::new(),
    };
    let answered = answer_document(Engine::new(graph), document);
    assert_eq!(answered.meta, json!({"phase": 2}));
    assert!(answered.results.is_empty());
}

#[rstest]
fn unreadable_graph_is_reported(workspace: Workspace) {
    let broken = workspace.root().join("broken.json");
    write_utf8(&broken, b"{ not json");
    let config = RunConfig {
        graph: broken,
        queries: workspace.queries(),
        output: None,
    };
    let err = answer_files(&config).expect_err("broken graph should fail");
    assert!(matches!(err, CliError::LoadGraph(_)), "unexpected error {err:?}");
}

#[rstest]
fn negative_ids_are_answered_as_not_found() {
    let graph = GraphDocument::from_reader(LINE_GRAPH.as_bytes())
        .expect("graph JSON")
        .into_graph()
        .expect("valid graph");
    let document = QueryDocument {
        meta: Value::Null,
        events: vec![
            json!({"id": 1, "type": "shortest_path", "source": -5, "target": 3}),
            json!({
                "id": 2,
                "type": "approx_shortest_path",
                "queries": [{"source": -1, "target": 2}, {"source": 1, "target": 3}],
                "time_budget_ms": 1000.0
            }),
        ],
    };
    let answered = serde_json::to_value(answer_document(Engine::new(graph), document))
        .expect("results encode");

    let route = &answered["results"][0];
    assert_eq!(route["possible"], json!(false));
    assert!(route.get("error").is_none());

    let distances = answered["results"][1]["distances"]
        .as_array()
        .expect("batch distances");
    assert_eq!(distances.len(), 1);
    assert_eq!(distances[0]["source"], json!(1));
    assert_eq!(distances[0]["target"], json!(3));
    assert_eq!(distances[0]["approx_shortest_distance"], json!(150.0));
}
