//! Small deterministic graphs shared by unit, behaviour and downstream tests.
//!
//! The builders panic on construction failure because their inputs are fixed
//! and valid; they are not meant for production use.

use std::f64::consts::TAU;

use geo::Coord;

use crate::graph::{Graph, Node, NodeId};

/// Side of [`square_graph`] in degrees, roughly 100 m at the equator.
pub const SQUARE_SIDE_DEGREES: f64 = 0.0009;

/// A path graph through `points`, given as `(longitude, latitude)` pairs.
///
/// Node `i` sits at `points[i]` and consecutive nodes are joined.
#[must_use]
pub fn line_graph(points: &[(f64, f64)]) -> Graph {
    let mut graph = Graph::new();
    let mut previous: Option<NodeId> = None;
    for (id, &(x, y)) in (0..).zip(points) {
        graph
            .add_node(Node::new(id, Coord { x, y }))
            .expect("line graph nodes are unique and finite");
        if let Some(prev) = previous {
            graph
                .add_edge(prev, id)
                .expect("line graph edges join existing nodes");
        }
        previous = Some(id);
    }
    graph
}

/// Four corners of a small square on the equator, joined around the
/// perimeter `0-1-2-3-0`.
#[must_use]
pub fn square_graph() -> Graph {
    let side = SQUARE_SIDE_DEGREES;
    let mut graph = line_graph(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]);
    graph.add_edge(3, 0).expect("square corners exist");
    graph
}

/// `k` nodes evenly spaced on a small circle, joined in a ring.
///
/// Node `i` neighbours `i - 1` and `i + 1` modulo `k`.
#[must_use]
pub fn cycle_graph(k: u32) -> Graph {
    let radius = 0.001;
    let points: Vec<(f64, f64)> = (0..k)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(k);
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let mut graph = line_graph(&points);
    if k > 2 {
        graph
            .add_edge(NodeId::from(k - 1), 0)
            .expect("ring closes on existing nodes");
    }
    graph
}
