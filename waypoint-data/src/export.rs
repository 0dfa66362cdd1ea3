//! Serialisable snapshot of a graph.

use serde::Serialize;
use waypoint_core::{Graph, NodeId};

/// Node entry in a [`GraphExport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeExport {
    /// Node identifier.
    pub id: NodeId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Edge entry in a [`GraphExport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeExport {
    /// Lower endpoint identifier.
    pub from: NodeId,
    /// Higher endpoint identifier.
    pub to: NodeId,
    /// Geodesic length in metres.
    pub weight: f64,
}

/// Nodes and edges of a graph in id order, ready for JSON output.
///
/// The shape matches the graph description accepted by
/// [`parse_graph_description`](crate::parse_graph_description), so an export
/// can be loaded back. Inserted waypoint nodes and split edges are included.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Graph, Node};
/// use waypoint_data::GraphExport;
///
/// # fn main() -> Result<(), waypoint_core::GraphError> {
/// let mut graph = Graph::new();
/// graph.add_node(Node::new(1, Coord { x: -74.05, y: 4.65 }))?;
/// graph.add_node(Node::new(2, Coord { x: -74.06, y: 4.65 }))?;
/// graph.add_edge(2, 1)?;
///
/// let export = GraphExport::from_graph(&graph);
/// assert_eq!(export.nodes[0].lat, 4.65);
/// assert_eq!((export.edges[0].from, export.edges[0].to), (1, 2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphExport {
    /// Every node.
    pub nodes: Vec<NodeExport>,
    /// Every undirected edge once.
    pub edges: Vec<EdgeExport>,
}

impl GraphExport {
    /// Snapshot `graph`.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeExport {
                id: node.id,
                lat: node.location.y,
                lon: node.location.x,
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| EdgeExport {
                from: edge.from,
                to: edge.to,
                weight: edge.weight,
            })
            .collect();
        Self { nodes, edges }
    }
}
