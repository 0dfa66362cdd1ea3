//! Facade crate for the waypoint planner.
//!
//! This crate re-exports the core planning types and exposes the tour
//! solvers and file adapters behind feature flags.
//!
//! # Examples
//! ```
//! # #[cfg(feature = "solver")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use geo::Coord;
//! use waypoint_planner::{Graph, Node, PlanningSession, SolverLimits, Strategy, Waypoint, solver_for};
//!
//! let mut graph = Graph::new();
//! graph.add_node(Node::new(0, Coord { x: 0.0, y: 0.0 }))?;
//! graph.add_node(Node::new(1, Coord { x: 0.004, y: 0.0 }))?;
//! graph.add_edge(0, 1)?;
//!
//! let mut session = PlanningSession::new();
//! session.load_graph(graph);
//! session.resolve_waypoints(&[
//!     Waypoint::new(Coord { x: 0.0, y: 0.0 }),
//!     Waypoint::new(Coord { x: 0.002, y: 0.0001 }),
//! ])?;
//! session.build_matrix()?;
//! let solver = solver_for(Strategy::Greedy, &SolverLimits::default());
//! let plan = session.solve(solver.as_ref(), 0)?;
//! assert_eq!(plan.route.full_path, vec![0, 2, 0]);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "solver"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub use waypoint_core::{
    Distance, DistanceMatrix, Edge, ErrorKind, Graph, GraphError, GraphSummary, InsertionError,
    MatrixError, Node, NodeId, PathMatrix, Plan, PlanningSession, ReconstructError,
    ReconstructedRoute, RoutingMatrix, SessionError, SolveError, Solver, SolverLimits, Strategy,
    StrategyParseError, Tour, TourResult, Waypoint,
};

#[cfg(feature = "solver")]
pub use waypoint_solver::{BruteForceSolver, GreedySolver, HeldKarpSolver, solver_for};

#[cfg(feature = "data")]
pub use waypoint_data::{
    GraphExport, GraphFileError, WaypointFileError, WaypointReport, load_graph_file,
    load_waypoints_file, parse_graph_description, parse_waypoints,
};
