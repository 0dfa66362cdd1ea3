//! Temporary workspaces holding graph and waypoint files.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Square road with 100 m sides around the equator/meridian crossing.
pub(super) const SQUARE_GRAPH: &str = r#"{
  "nodes": [
    { "id": 0, "lat": 0.0, "lon": 0.0 },
    { "id": 1, "lat": 0.0, "lon": 0.0009 },
    { "id": 2, "lat": 0.0009, "lon": 0.0009 },
    { "id": 3, "lat": 0.0009, "lon": 0.0 }
  ],
  "edges": [
    { "from": 0, "to": 1 },
    { "from": 1, "to": 2 },
    { "from": 2, "to": 3 },
    { "from": 3, "to": 0 }
  ]
}"#;

/// The four square corners plus a malformed line.
pub(super) const CORNER_POINTS: &str = "\
# corners, latitude first
0.0 0.0
0.0 0.0009
0.0009 0.0009
not a point
0.0009 0.0
";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

/// Temporary directory with `graph.json` and `points.txt`.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) graph: Utf8PathBuf,
    pub(super) points: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let graph = root.join("graph.json");
        let points = root.join("points.txt");
        Self {
            _dir: dir,
            root,
            graph,
            points,
        }
    }

    pub(super) fn with_square() -> Self {
        let workspace = Self::new();
        write_utf8(&workspace.graph, SQUARE_GRAPH.as_bytes());
        write_utf8(&workspace.points, CORNER_POINTS.as_bytes());
        workspace
    }
}
