//! JSON road-graph descriptions.
//!
//! A description lists nodes with WGS84 coordinates and undirected edges by
//! endpoint id:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lat": 4.65, "lon": -74.05 }],
//!   "edges": [{ "from": 1, "to": 2 }]
//! }
//! ```
//!
//! Edge weights are always recomputed from the coordinates. A `weight` field
//! on an edge, as written by [`GraphExport`](crate::GraphExport), is ignored.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;
use waypoint_core::{Graph, GraphError, Node, NodeId};

/// Errors returned while loading a graph description.
#[derive(Debug, Error)]
pub enum GraphFileError {
    /// The file could not be read.
    #[error("failed to read graph file {path}")]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not a valid description.
    #[error("failed to parse graph description")]
    Parse(#[source] serde_json::Error),
    /// A node could not be added.
    #[error("invalid node {id}")]
    Node {
        /// Node id as written in the description.
        id: NodeId,
        /// Rejection reason.
        #[source]
        source: GraphError,
    },
    /// A node lies outside the WGS84 latitude or longitude range.
    #[error("node {id} has out-of-range coordinates (lat {lat}, lon {lon})")]
    CoordinateOutOfRange {
        /// Node id as written in the description.
        id: NodeId,
        /// Latitude as written.
        lat: f64,
        /// Longitude as written.
        lon: f64,
    },
    /// An edge could not be added.
    #[error("invalid edge {from}-{to}")]
    Edge {
        /// First endpoint as written.
        from: NodeId,
        /// Second endpoint as written.
        to: NodeId,
        /// Rejection reason.
        #[source]
        source: GraphError,
    },
}

#[derive(Debug, Deserialize)]
struct GraphDescription {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: NodeId,
    to: NodeId,
}

/// Parse a graph description from `reader`.
///
/// Duplicate node ids, unknown edge endpoints and self loops are rejected.
/// Repeated edges collapse into one.
///
/// # Examples
/// ```
/// use waypoint_data::parse_graph_description;
///
/// # fn main() -> Result<(), waypoint_data::GraphFileError> {
/// let json = r#"{
///     "nodes": [
///         {"id": 1, "lat": 0.0, "lon": 0.0},
///         {"id": 2, "lat": 0.0, "lon": 0.001}
///     ],
///     "edges": [{"from": 1, "to": 2, "weight": 5.0}]
/// }"#;
/// let graph = parse_graph_description(json.as_bytes())?;
/// assert_eq!(graph.edge_count(), 1);
/// assert!(graph.weight(1, 2).is_some_and(|metres| metres > 100.0));
/// # Ok(())
/// # }
/// ```
pub fn parse_graph_description<R: Read>(reader: R) -> Result<Graph, GraphFileError> {
    let description: GraphDescription =
        serde_json::from_reader(reader).map_err(GraphFileError::Parse)?;
    build_graph(description)
}

/// Read and parse the graph description at `path`.
pub fn load_graph_file(path: &Utf8Path) -> Result<Graph, GraphFileError> {
    let contents = waypoint_fs::read_utf8_file(path).map_err(|source| GraphFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_graph_description(contents.as_bytes())?;
    debug!(
        "loaded {} nodes and {} edges from {path}",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn build_graph(description: GraphDescription) -> Result<Graph, GraphFileError> {
    let mut graph = Graph::new();
    for NodeRecord { id, lat, lon } in description.nodes {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GraphFileError::CoordinateOutOfRange { id, lat, lon });
        }
        graph
            .add_node(Node::new(id, Coord { x: lon, y: lat }))
            .map_err(|source| GraphFileError::Node { id, source })?;
    }

    let mut merged = 0_usize;
    for EdgeRecord { from, to } in description.edges {
        if graph.has_edge(from, to) {
            merged += 1;
            continue;
        }
        graph
            .add_edge(from, to)
            .map_err(|source| GraphFileError::Edge { from, to, source })?;
    }
    if merged > 0 {
        warn!("merged {merged} duplicate edges");
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(json: &str) -> Result<Graph, GraphFileError> {
        parse_graph_description(json.as_bytes())
    }

    #[rstest]
    fn coordinates_map_lon_to_x_and_lat_to_y() {
        let graph = parse(r#"{"nodes": [{"id": 7, "lat": 4.65, "lon": -74.05}], "edges": []}"#)
            .expect("valid description");
        assert_eq!(graph.location(7), Some(Coord { x: -74.05, y: 4.65 }));
    }

    #[rstest]
    fn edges_are_optional() {
        let graph = parse(r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}]}"#)
            .expect("valid description");
        assert_eq!(graph.summary().edges, 0);
    }

    #[rstest]
    fn duplicate_edges_are_merged() {
        let graph = parse(
            r#"{
                "nodes": [
                    {"id": 1, "lat": 0.0, "lon": 0.0},
                    {"id": 2, "lat": 0.0, "lon": 0.001}
                ],
                "edges": [{"from": 1, "to": 2}, {"from": 2, "to": 1}]
            }"#,
        )
        .expect("valid description");
        assert_eq!(graph.edge_count(), 1);
    }

    #[rstest]
    #[case::duplicate_node(
        r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}, {"id": 1, "lat": 1.0, "lon": 1.0}]}"#
    )]
    #[case::unknown_endpoint(
        r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}], "edges": [{"from": 1, "to": 9}]}"#
    )]
    #[case::self_loop(
        r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}], "edges": [{"from": 1, "to": 1}]}"#
    )]
    fn structural_errors_are_rejected(#[case] json: &str) {
        let err = parse(json).expect_err("invalid description");
        assert!(matches!(
            err,
            GraphFileError::Node { .. } | GraphFileError::Edge { .. }
        ));
    }

    #[rstest]
    #[case::latitude(r#"{"nodes": [{"id": 3, "lat": 90.5, "lon": 0.0}]}"#)]
    #[case::longitude(r#"{"nodes": [{"id": 3, "lat": 0.0, "lon": -181.0}]}"#)]
    fn out_of_range_coordinates_are_rejected(#[case] json: &str) {
        let err = parse(json).expect_err("coordinates out of range");
        assert!(
            matches!(err, GraphFileError::CoordinateOutOfRange { id: 3, .. }),
            "found {err:?}"
        );
    }

    #[rstest]
    fn boundary_coordinates_are_accepted() {
        let graph = parse(r#"{"nodes": [{"id": 1, "lat": -90.0, "lon": 180.0}]}"#)
            .expect("boundary values are valid");
        assert_eq!(graph.location(1), Some(Coord { x: 180.0, y: -90.0 }));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        let err = parse(r#"{"nodes": [{"id": "one"}]}"#).expect_err("bad id");
        assert!(matches!(err, GraphFileError::Parse(_)));
    }
}
