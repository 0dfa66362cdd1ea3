//! Core domain types for the waypoint planner.
//!
//! The crate owns the road graph, inserts caller waypoints into it, builds
//! shortest-path matrices between the selected nodes and turns an abstract
//! tour back into a concrete path. Tour search itself lives behind the
//! [`Solver`] trait so strategies can be swapped.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod geodesy;
pub mod graph;
pub mod insertion;
pub mod matrix;
pub mod reconstruct;
pub mod session;
pub mod shortest_path;
pub mod solver;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod tour;

pub use error::ErrorKind;
pub use graph::{Edge, Graph, GraphError, GraphSummary, Node, NodeId};
pub use insertion::{InsertionError, Waypoint, insert_waypoint, resolve_waypoints};
pub use matrix::{Distance, DistanceMatrix, MatrixError, PathMatrix, RoutingMatrix, build_matrix};
pub use reconstruct::{ReconstructError, ReconstructedRoute, map_indices, reconstruct, splice};
pub use session::{Plan, PlanningSession, SessionError};
pub use shortest_path::ShortestPathTree;
pub use solver::{SolveError, Solver, SolverLimits};
pub use tour::{Strategy, StrategyParseError, Tour, TourResult};
