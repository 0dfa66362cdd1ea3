//! Resolve caller waypoints to graph nodes.
//!
//! A waypoint whose coordinate matches an existing node exactly reuses that
//! node. Otherwise the waypoint is projected onto the nearest edge, the edge
//! is split at the projected point and the new node is returned. Inserting
//! the projection rather than the raw coordinate keeps imprecise input on
//! the road.

use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::ErrorKind;
use crate::geodesy::{Projection, project_onto_segment};
use crate::graph::{Edge, Graph, GraphError, Node, NodeId};

/// A coordinate submitted for planning.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::Waypoint;
///
/// let anonymous = Waypoint::new(Coord { x: -74.05, y: 4.65 });
/// let named = Waypoint::with_id(42, Coord { x: -74.05, y: 4.65 });
/// assert_eq!(anonymous.id, None);
/// assert_eq!(named.id, Some(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// WGS84 position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Identifier to use if the waypoint has to be inserted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<NodeId>,
}

impl Waypoint {
    /// A waypoint that takes the next free identifier when inserted.
    #[must_use]
    pub const fn new(location: Coord<f64>) -> Self {
        Self { location, id: None }
    }

    /// A waypoint carrying a caller-supplied identifier.
    #[must_use]
    pub const fn with_id(id: NodeId, location: Coord<f64>) -> Self {
        Self {
            location,
            id: Some(id),
        }
    }
}

/// Errors returned while resolving waypoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertionError {
    /// The graph has no edges to project onto.
    #[error("no edge available to insert the waypoint into")]
    NoInsertionTarget,
    /// The caller-supplied identifier belongs to another node.
    #[error("node id {0} is already in use")]
    IdInUse(NodeId),
    /// Waypoint coordinates must be finite.
    #[error("waypoint coordinate ({x}, {y}) is not finite")]
    NonFiniteCoordinate {
        /// Longitude as supplied.
        x: f64,
        /// Latitude as supplied.
        y: f64,
    },
    /// The structural edit failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl InsertionError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoInsertionTarget => ErrorKind::Topology,
            Self::IdInUse(_) | Self::NonFiniteCoordinate { .. } => ErrorKind::Input,
            Self::Graph(err) => err.kind(),
        }
    }
}

/// Resolve one waypoint, inserting it into `graph` when needed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Graph, Node, Waypoint, insert_waypoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = Graph::new();
/// graph.add_node(Node::new(0, Coord { x: 0.0, y: 0.0 }))?;
/// graph.add_node(Node::new(1, Coord { x: 0.002, y: 0.0 }))?;
/// graph.add_edge(0, 1)?;
///
/// let id = insert_waypoint(&mut graph, &Waypoint::new(Coord { x: 0.001, y: 0.0005 }))?;
/// assert_eq!(id, 2);
/// assert_eq!(graph.location(id), Some(Coord { x: 0.001, y: 0.0 }));
/// assert!(!graph.has_edge(0, 1));
/// # Ok(())
/// # }
/// ```
pub fn insert_waypoint(graph: &mut Graph, waypoint: &Waypoint) -> Result<NodeId, InsertionError> {
    let location = waypoint.location;
    if !(location.x.is_finite() && location.y.is_finite()) {
        return Err(InsertionError::NonFiniteCoordinate {
            x: location.x,
            y: location.y,
        });
    }
    if let Some(existing) = graph.find_node_at(location) {
        return Ok(existing);
    }

    let (edge, projection) =
        nearest_edge(graph, location).ok_or(InsertionError::NoInsertionTarget)?;
    // A projection clamped onto an endpoint is that endpoint.
    if let Some(existing) = graph.find_node_at(projection.point) {
        debug!(
            "waypoint ({}, {}) snapped onto existing node {existing}",
            location.x, location.y
        );
        return Ok(existing);
    }

    let id = match waypoint.id {
        Some(id) if graph.contains(id) => return Err(InsertionError::IdInUse(id)),
        Some(id) => id,
        None => graph.next_node_id(),
    };
    graph.split_edge(edge.from, edge.to, Node::new(id, projection.point))?;
    debug!(
        "inserted node {id} at ({}, {}) splitting edge {}-{}",
        projection.point.x, projection.point.y, edge.from, edge.to
    );
    Ok(id)
}

/// Resolve every waypoint in order.
///
/// The returned identifiers line up with `waypoints`. Repeated coordinates
/// resolve to the same identifier. On error the graph keeps the insertions
/// made before the failing waypoint.
pub fn resolve_waypoints(
    graph: &mut Graph,
    waypoints: &[Waypoint],
) -> Result<Vec<NodeId>, InsertionError> {
    waypoints
        .iter()
        .map(|waypoint| insert_waypoint(graph, waypoint))
        .collect()
}

/// The edge whose segment lies closest to `location`.
///
/// Ties keep the first edge in [`Graph::edges`] order.
fn nearest_edge(graph: &Graph, location: Coord<f64>) -> Option<(Edge, Projection)> {
    let mut best: Option<(Edge, Projection)> = None;
    for edge in graph.edges() {
        let (Some(start), Some(end)) = (graph.location(edge.from), graph.location(edge.to)) else {
            continue;
        };
        let Some(projection) = project_onto_segment(location, start, end) else {
            continue;
        };
        let closer = best
            .as_ref()
            .is_none_or(|(_, current)| projection.offset < current.offset);
        if closer {
            best = Some((edge, projection));
        }
    }
    best
}
