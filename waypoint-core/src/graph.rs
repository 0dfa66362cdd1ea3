//! Undirected road graph weighted by geodesic distance.
//!
//! Nodes live in an id-keyed arena and edges are stored as symmetric
//! adjacency maps. Weights are always derived from the endpoint coordinates,
//! so the graph cannot drift out of metric consistency. All containers are
//! ordered, which makes edge scans and tie-breaks deterministic.

use std::collections::BTreeMap;
use std::ops::Bound;

use geo::Coord;
use thiserror::Error;

use crate::ErrorKind;
use crate::geodesy::geodesic_distance;

/// Stable identifier of a graph node.
pub type NodeId = u64;

/// A graph vertex at a geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// WGS84 position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
}

impl Node {
    /// Construct a node.
    #[must_use]
    pub const fn new(id: NodeId, location: Coord<f64>) -> Self {
        Self { id, location }
    }
}

/// An undirected edge reported by [`Graph::edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Lower endpoint identifier.
    pub from: NodeId,
    /// Higher endpoint identifier.
    pub to: NodeId,
    /// Geodesic length in metres.
    pub weight: f64,
}

/// Node and edge counts for a loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSummary {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of undirected edges.
    pub edges: usize,
}

/// Errors returned by structural graph edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A node with this identifier already exists.
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    /// The referenced node does not exist.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// Edges must join two distinct nodes.
    #[error("edge would connect node {0} to itself")]
    SelfLoop(NodeId),
    /// The referenced edge does not exist.
    #[error("no edge between nodes {from} and {to}")]
    MissingEdge {
        /// First endpoint.
        from: NodeId,
        /// Second endpoint.
        to: NodeId,
    },
    /// Node coordinates must be finite.
    #[error("node {id} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// Offending node.
        id: NodeId,
        /// Longitude as supplied.
        x: f64,
        /// Latitude as supplied.
        y: f64,
    },
}

impl GraphError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEdge { .. } | Self::UnknownNode(_) => ErrorKind::Precondition,
            Self::DuplicateNode(_) | Self::SelfLoop(_) | Self::NonFiniteCoordinate { .. } => {
                ErrorKind::Input
            }
        }
    }
}

/// Weighted, undirected road graph.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Graph, Node};
///
/// # fn main() -> Result<(), waypoint_core::GraphError> {
/// let mut graph = Graph::new();
/// graph.add_node(Node::new(1, Coord { x: 0.0, y: 0.0 }))?;
/// graph.add_node(Node::new(2, Coord { x: 0.001, y: 0.0 }))?;
/// graph.add_edge(1, 2)?;
/// assert_eq!(graph.edge_count(), 1);
/// assert!(graph.weight(1, 2).is_some_and(|metres| metres > 100.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    edge_count: usize,
}

impl Graph {
    /// Construct an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    ///
    /// Fails when the identifier is taken or the coordinate is not finite.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        if !(node.location.x.is_finite() && node.location.y.is_finite()) {
            return Err(GraphError::NonFiniteCoordinate {
                id: node.id,
                x: node.location.x,
                y: node.location.y,
            });
        }
        self.nodes.insert(node.id, node);
        self.adjacency.insert(node.id, BTreeMap::new());
        Ok(())
    }

    /// Connect two nodes, weighting the edge by their geodesic distance.
    ///
    /// Adding an edge that already exists recomputes its weight and leaves
    /// the edge count unchanged. Returns the weight in metres.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<f64, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let from = self.location(a).ok_or(GraphError::UnknownNode(a))?;
        let to = self.location(b).ok_or(GraphError::UnknownNode(b))?;
        let weight = geodesic_distance(from, to);
        let previous = self
            .adjacency
            .entry(a)
            .or_default()
            .insert(b, weight);
        self.adjacency.entry(b).or_default().insert(a, weight);
        if previous.is_none() {
            self.edge_count += 1;
        }
        Ok(weight)
    }

    /// Remove the edge between `a` and `b`.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        let missing = GraphError::MissingEdge { from: a, to: b };
        let removed = self
            .adjacency
            .get_mut(&a)
            .and_then(|neighbours| neighbours.remove(&b));
        if removed.is_none() {
            return Err(missing);
        }
        if let Some(neighbours) = self.adjacency.get_mut(&b) {
            neighbours.remove(&a);
        }
        self.edge_count -= 1;
        Ok(())
    }

    /// Replace the edge `a`–`b` with `a`–`node`–`b` in one step.
    ///
    /// The graph is left untouched when any precondition fails.
    pub fn split_edge(&mut self, a: NodeId, b: NodeId, node: Node) -> Result<(), GraphError> {
        if !self.has_edge(a, b) {
            return Err(GraphError::MissingEdge { from: a, to: b });
        }
        self.add_node(node)?;
        self.remove_edge(a, b)?;
        self.add_edge(a, node.id)?;
        self.add_edge(node.id, b)?;
        Ok(())
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Coordinate of a node.
    #[must_use]
    pub fn location(&self, id: NodeId) -> Option<Coord<f64>> {
        self.nodes.get(&id).map(|node| node.location)
    }

    /// Whether the node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether an edge joins `a` and `b`.
    #[must_use]
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.weight(a, b).is_some()
    }

    /// Weight of the edge between `a` and `b`, in metres.
    #[must_use]
    pub fn weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency
            .get(&a)
            .and_then(|neighbours| neighbours.get(&b))
            .copied()
    }

    /// Neighbours of `id` with the connecting edge weights.
    pub fn neighbours(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|neighbours| neighbours.iter().map(|(&to, &weight)| (to, weight)))
    }

    /// Iterate nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Iterate each undirected edge once, ordered by `(from, to)` with
    /// `from < to`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().flat_map(|(&from, neighbours)| {
            neighbours
                .range((Bound::Excluded(from), Bound::Unbounded))
                .map(move |(&to, &weight)| Edge { from, to, weight })
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Node and edge counts.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
        }
    }

    /// The identifier one above the current maximum, or `0` when empty.
    #[must_use]
    pub fn next_node_id(&self) -> NodeId {
        self.nodes
            .last_key_value()
            .map_or(0, |(&id, _)| id.saturating_add(1))
    }

    /// Find a node whose coordinate equals `location` exactly.
    ///
    /// No tolerance is applied: coordinates differing by any epsilon are
    /// distinct points.
    #[must_use]
    pub fn find_node_at(&self, location: Coord<f64>) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.location == location)
            .map(|node| node.id)
    }
}
