//! Test helpers for laying out graph and query documents on disk.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use tempfile::TempDir;

/// Three junctions on a line, 1–2 (100 m) and 2–3 (50 m), two-way, with a
/// cafe at junction 3.
pub(super) const LINE_GRAPH: &str = r#"{
    "nodes": [
        {"id": 1, "lat": 0.0, "lon": 0.0},
        {"id": 2, "lat": 0.0, "lon": 0.001},
        {"id": 3, "lat": 0.0, "lon": 0.002, "pois": ["cafe"]}
    ],
    "edges": [
        {"id": 1, "u": 1, "v": 2, "length": 100.0, "average_time": 10.0},
        {"id": 2, "u": 2, "v": 3, "length": 50.0, "average_time": 5.0}
    ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding a graph and a query document.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("graph.json"), LINE_GRAPH.as_bytes());
        let queries = json!({
            "meta": {"suite": "line"},
            "events": [
                {"id": "a", "type": "shortest_path", "source": 1, "target": 3},
                {"id": "b", "type": "remove_edge", "edge_id": 2},
                {"id": "c", "type": "shortest_path", "source": 1, "target": 3, "mode": "time"},
                {"id": "d", "type": "knn", "query_point": {"lat": 0.0, "lon": 0.0}, "poi": "cafe", "k": 1, "metric": "sideways"}
            ]
        });
        write_utf8(&root.join("queries.json"), queries.to_string().as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn graph(&self) -> Utf8PathBuf {
        self.root.join("graph.json")
    }

    pub(super) fn queries(&self) -> Utf8PathBuf {
        self.root.join("queries.json")
    }
}
