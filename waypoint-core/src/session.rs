//! Planning state carried between pipeline steps.
//!
//! A [`PlanningSession`] owns the graph, the selected nodes and the routing
//! matrix built for them. Each step checks that the steps it depends on have
//! run and invalidates whatever it makes stale: loading a graph clears the
//! selection and the matrix, and a new selection clears the matrix.

use log::{debug, info};
use thiserror::Error;

use crate::ErrorKind;
use crate::graph::{Graph, GraphSummary, NodeId};
use crate::insertion::{InsertionError, Waypoint, resolve_waypoints};
use crate::matrix::{MatrixError, RoutingMatrix, build_matrix};
use crate::reconstruct::{ReconstructError, ReconstructedRoute, reconstruct};
use crate::solver::{SolveError, Solver, SolverLimits};
use crate::tour::TourResult;

/// Errors raised by [`PlanningSession`] steps.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// No graph has been loaded.
    #[error("no graph loaded")]
    NoGraphLoaded,
    /// No waypoints have been resolved or selected.
    #[error("no waypoints resolved")]
    NoWaypointsResolved,
    /// No matrix has been built for the current selection.
    #[error("no distance matrix built for the current selection")]
    NoMatrixBuilt,
    /// Fewer than two nodes are selected.
    #[error("at least 2 points are required, got {0}")]
    TooFewWaypoints(usize),
    /// Waypoint resolution failed.
    #[error("failed to resolve waypoints")]
    Insertion(#[source] InsertionError),
    /// Matrix construction failed.
    #[error("failed to build distance matrix")]
    Matrix(#[source] MatrixError),
    /// The solver refused or failed.
    #[error("failed to solve tour")]
    Solve(#[source] SolveError),
    /// The solved tour could not be mapped back onto the graph.
    #[error("failed to reconstruct route")]
    Reconstruct(#[source] ReconstructError),
}

impl SessionError {
    /// Classify the error, looking through wrapped causes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoGraphLoaded
            | Self::NoWaypointsResolved
            | Self::NoMatrixBuilt
            | Self::TooFewWaypoints(_) => ErrorKind::Precondition,
            Self::Insertion(err) => err.kind(),
            Self::Matrix(err) => err.kind(),
            Self::Solve(err) => err.kind(),
            Self::Reconstruct(err) => err.kind(),
        }
    }
}

impl From<InsertionError> for SessionError {
    fn from(err: InsertionError) -> Self {
        Self::Insertion(err)
    }
}

impl From<MatrixError> for SessionError {
    fn from(err: MatrixError) -> Self {
        Self::Matrix(err)
    }
}

impl From<SolveError> for SessionError {
    fn from(err: SolveError) -> Self {
        Self::Solve(err)
    }
}

impl From<ReconstructError> for SessionError {
    fn from(err: ReconstructError) -> Self {
        Self::Reconstruct(err)
    }
}

/// A solved and reconstructed tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// Selected node ids in matrix index order.
    pub node_ids: Vec<NodeId>,
    /// Solver output over matrix indices.
    pub result: TourResult,
    /// The tour over graph nodes.
    pub route: ReconstructedRoute,
}

/// Explicit planning context replacing process-wide state.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Graph, Node, PlanningSession, SessionError, Waypoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = Graph::new();
/// graph.add_node(Node::new(0, Coord { x: 0.0, y: 0.0 }))?;
/// graph.add_node(Node::new(1, Coord { x: 0.004, y: 0.0 }))?;
/// graph.add_edge(0, 1)?;
///
/// let mut session = PlanningSession::new();
/// assert_eq!(session.build_matrix().err(), Some(SessionError::NoGraphLoaded));
///
/// let summary = session.load_graph(graph);
/// assert_eq!((summary.nodes, summary.edges), (2, 1));
///
/// let ids = session.resolve_waypoints(&[
///     Waypoint::new(Coord { x: 0.001, y: 0.0 }),
///     Waypoint::new(Coord { x: 0.003, y: 0.0 }),
/// ])?;
/// assert_eq!(ids, &[2, 3]);
/// assert_eq!(session.build_matrix()?.node_ids(), &[2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanningSession {
    graph: Option<Graph>,
    selected: Option<Vec<NodeId>>,
    matrix: Option<RoutingMatrix>,
    limits: SolverLimits,
}

impl PlanningSession {
    /// An empty session with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty session with custom limits.
    #[must_use]
    pub fn with_limits(limits: SolverLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Limits checked before every solve.
    #[must_use]
    pub const fn limits(&self) -> SolverLimits {
        self.limits
    }

    /// Replace the graph, discarding the selection and matrix.
    pub fn load_graph(&mut self, graph: Graph) -> GraphSummary {
        let summary = graph.summary();
        info!(
            "loaded graph with {} nodes and {} edges",
            summary.nodes, summary.edges
        );
        self.graph = Some(graph);
        self.selected = None;
        self.matrix = None;
        summary
    }

    /// Resolve waypoints into the graph and select the resulting nodes.
    ///
    /// The graph keeps any insertions made before a failure, in which case
    /// the previous selection is discarded.
    pub fn resolve_waypoints(&mut self, waypoints: &[Waypoint]) -> Result<&[NodeId], SessionError> {
        let graph = self.graph.as_mut().ok_or(SessionError::NoGraphLoaded)?;
        self.matrix = None;
        self.selected = None;
        let ids = resolve_waypoints(graph, waypoints)?;
        debug!("resolved {} waypoints to nodes {ids:?}", waypoints.len());
        Ok(self.selected.insert(ids).as_slice())
    }

    /// Select existing graph nodes directly.
    pub fn select_nodes(&mut self, node_ids: Vec<NodeId>) -> Result<(), SessionError> {
        if self.graph.is_none() {
            return Err(SessionError::NoGraphLoaded);
        }
        self.matrix = None;
        self.selected = Some(node_ids);
        Ok(())
    }

    /// Build the routing matrix for the current selection.
    pub fn build_matrix(&mut self) -> Result<&RoutingMatrix, SessionError> {
        let graph = self.graph.as_ref().ok_or(SessionError::NoGraphLoaded)?;
        let selected = self
            .selected
            .as_deref()
            .ok_or(SessionError::NoWaypointsResolved)?;
        if selected.len() < 2 {
            return Err(SessionError::TooFewWaypoints(selected.len()));
        }
        let matrix = build_matrix(graph, selected)?;
        Ok(&*self.matrix.insert(matrix))
    }

    /// Solve the current matrix and reconstruct the route.
    ///
    /// The configured [`SolverLimits`] are checked before `solver` runs.
    pub fn solve(&self, solver: &dyn Solver, start: usize) -> Result<Plan, SessionError> {
        let matrix = self.matrix()?;
        let nodes = matrix.node_ids().len();
        self.limits.check(solver.strategy(), nodes)?;
        let result = solver.solve(matrix.distances(), start)?;
        debug!(
            "{} solved {nodes} nodes in {:?} with cost {:.1} m",
            result.strategy, result.solve_time, result.total_cost
        );
        let route = reconstruct(result.tour.indices(), matrix.node_ids(), matrix.paths())?;
        Ok(Plan {
            node_ids: matrix.node_ids().to_vec(),
            result,
            route,
        })
    }

    /// The loaded graph.
    pub fn graph(&self) -> Result<&Graph, SessionError> {
        self.graph.as_ref().ok_or(SessionError::NoGraphLoaded)
    }

    /// The selected node ids.
    pub fn selected_nodes(&self) -> Result<&[NodeId], SessionError> {
        self.selected
            .as_deref()
            .ok_or(SessionError::NoWaypointsResolved)
    }

    /// The matrix built for the current selection.
    pub fn matrix(&self) -> Result<&RoutingMatrix, SessionError> {
        self.matrix.as_ref().ok_or(SessionError::NoMatrixBuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;
    use crate::solver::{finish_tour, validate_request};
    use crate::test_support::square_graph;
    use crate::tour::{Strategy, Tour};
    use rstest::{fixture, rstest};
    use std::time::Instant;

    /// Visits indices in ascending order from the start.
    struct SequentialSolver(Strategy);

    impl Solver for SequentialSolver {
        fn strategy(&self) -> Strategy {
            self.0
        }

        fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<TourResult, SolveError> {
            let started_at = Instant::now();
            validate_request(matrix, start)?;
            let order = (0..matrix.size())
                .map(|offset| (start + offset) % matrix.size())
                .collect();
            finish_tour(Tour::closed(order), matrix, self.0, started_at)
        }
    }

    #[fixture]
    fn loaded() -> PlanningSession {
        let mut session = PlanningSession::new();
        session.load_graph(square_graph());
        session
    }

    #[rstest]
    fn steps_require_their_predecessors() {
        let mut session = PlanningSession::new();
        assert_eq!(session.graph().err(), Some(SessionError::NoGraphLoaded));
        assert_eq!(
            session.resolve_waypoints(&[]).err(),
            Some(SessionError::NoGraphLoaded)
        );
        assert_eq!(
            session.select_nodes(vec![0]),
            Err(SessionError::NoGraphLoaded)
        );
        let solver = SequentialSolver(Strategy::Greedy);
        assert_eq!(
            session.solve(&solver, 0).err(),
            Some(SessionError::NoMatrixBuilt)
        );
    }

    #[rstest]
    fn build_requires_a_selection(mut loaded: PlanningSession) {
        assert_eq!(
            loaded.build_matrix().err(),
            Some(SessionError::NoWaypointsResolved)
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![2])]
    fn build_requires_two_nodes(mut loaded: PlanningSession, #[case] ids: Vec<NodeId>) {
        let count = ids.len();
        loaded.select_nodes(ids).expect("graph loaded");
        let err = loaded.build_matrix().expect_err("too few");
        assert_eq!(err, SessionError::TooFewWaypoints(count));
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[rstest]
    fn duplicate_selection_is_reported_by_the_matrix(mut loaded: PlanningSession) {
        loaded.select_nodes(vec![1, 1]).expect("graph loaded");
        assert_eq!(
            loaded.build_matrix().err(),
            Some(SessionError::Matrix(MatrixError::DuplicateNode(1)))
        );
    }

    #[rstest]
    fn new_selection_invalidates_the_matrix(mut loaded: PlanningSession) {
        loaded.select_nodes(vec![0, 2]).expect("graph loaded");
        loaded.build_matrix().expect("matrix");
        assert!(loaded.matrix().is_ok());

        loaded.select_nodes(vec![0, 1]).expect("graph loaded");
        assert_eq!(loaded.matrix().err(), Some(SessionError::NoMatrixBuilt));
    }

    #[rstest]
    fn loading_a_graph_clears_everything(mut loaded: PlanningSession) {
        loaded.select_nodes(vec![0, 2]).expect("graph loaded");
        loaded.build_matrix().expect("matrix");

        let summary = loaded.load_graph(Graph::new());
        assert_eq!(summary, GraphSummary { nodes: 0, edges: 0 });
        assert!(loaded.selected_nodes().is_err());
        assert!(loaded.matrix().is_err());
    }

    #[rstest]
    fn limits_are_checked_before_solving(mut loaded: PlanningSession) {
        loaded.limits = SolverLimits {
            brute_force_max_nodes: 3,
            ..SolverLimits::default()
        };
        loaded.select_nodes(vec![0, 1, 2, 3]).expect("graph loaded");
        loaded.build_matrix().expect("matrix");

        let err = loaded
            .solve(&SequentialSolver(Strategy::BruteForce), 0)
            .expect_err("over the limit");
        assert_eq!(
            err,
            SessionError::Solve(SolveError::TooManyNodes {
                strategy: Strategy::BruteForce,
                nodes: 4,
                limit: 3,
            })
        );
        assert_eq!(err.kind(), ErrorKind::Size);
        assert!(loaded.solve(&SequentialSolver(Strategy::Greedy), 0).is_ok());
    }

    #[rstest]
    fn solve_reconstructs_the_full_path(mut loaded: PlanningSession) {
        loaded.select_nodes(vec![0, 2]).expect("graph loaded");
        loaded.build_matrix().expect("matrix");
        let plan = loaded
            .solve(&SequentialSolver(Strategy::Greedy), 1)
            .expect("plan");

        assert_eq!(plan.node_ids, vec![0, 2]);
        assert_eq!(plan.result.tour.indices(), &[1, 0, 1]);
        assert_eq!(plan.route.node_tour, vec![2, 0, 2]);
        assert_eq!(plan.route.full_path.len(), 5);
        assert_eq!(plan.route.full_path.first(), Some(&2));
        assert_eq!(plan.route.full_path.get(2), Some(&0));
    }
}
