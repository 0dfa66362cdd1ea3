//! Single-source shortest paths over the road graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{Graph, NodeId};
use crate::matrix::Distance;

/// Frontier entry ordered so the binary heap pops the cheapest node first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Dijkstra search tree rooted at one source node.
///
/// One tree answers distance and path queries for every target, so a matrix
/// build runs a single search per source.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Distance, Graph, Node, ShortestPathTree};
///
/// # fn main() -> Result<(), waypoint_core::GraphError> {
/// let mut graph = Graph::new();
/// for (id, x) in [(0, 0.0), (1, 0.001), (2, 0.002)] {
///     graph.add_node(Node::new(id, Coord { x, y: 0.0 }))?;
/// }
/// graph.add_edge(0, 1)?;
/// graph.add_edge(1, 2)?;
///
/// let tree = ShortestPathTree::compute(&graph, 0);
/// assert_eq!(tree.path_to(2), Some(vec![0, 1, 2]));
/// assert!(matches!(tree.distance_to(2), Distance::Reachable(m) if m > 200.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    distances: HashMap<NodeId, f64>,
    predecessors: HashMap<NodeId, NodeId>,
}

impl ShortestPathTree {
    /// Run Dijkstra from `source`.
    ///
    /// A source missing from the graph yields a tree where every other node
    /// is unreachable.
    #[must_use]
    pub fn compute(graph: &Graph, source: NodeId) -> Self {
        let mut distances = HashMap::new();
        let mut predecessors = HashMap::new();
        let mut frontier = BinaryHeap::new();

        if graph.contains(source) {
            distances.insert(source, 0.0);
            frontier.push(Frontier {
                cost: 0.0,
                node: source,
            });
        }

        while let Some(Frontier { cost, node }) = frontier.pop() {
            if distances.get(&node).is_some_and(|&best| cost > best) {
                continue;
            }
            for (next, weight) in graph.neighbours(node) {
                let candidate = cost + weight;
                let improves = distances
                    .get(&next)
                    .is_none_or(|&known| candidate < known);
                if improves {
                    distances.insert(next, candidate);
                    predecessors.insert(next, node);
                    frontier.push(Frontier {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        Self {
            source,
            distances,
            predecessors,
        }
    }

    /// The node the search started from.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to `target`.
    #[must_use]
    pub fn distance_to(&self, target: NodeId) -> Distance {
        self.distances
            .get(&target)
            .map_or(Distance::Unreachable, |&metres| Distance::Reachable(metres))
    }

    /// Node sequence from the source to `target`, both inclusive.
    #[must_use]
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.distances.contains_key(&target) {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}
