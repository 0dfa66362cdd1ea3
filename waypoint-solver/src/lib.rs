//! Travelling-salesman strategies for the waypoint planner.
//!
//! Each strategy implements [`Solver`](waypoint_core::Solver) over a
//! [`DistanceMatrix`](waypoint_core::DistanceMatrix):
//!
//! - [`BruteForceSolver`] enumerates every visiting order and is exact;
//! - [`HeldKarpSolver`] runs bitmask dynamic programming and is exact;
//! - [`GreedySolver`] follows the nearest unvisited neighbour.
//!
//! The exact strategies refuse inputs above their node ceiling before doing
//! any work. [`solver_for`] builds the solver for a [`Strategy`] with the
//! ceilings taken from [`SolverLimits`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod brute_force;
mod greedy;
mod held_karp;

pub use brute_force::BruteForceSolver;
pub use greedy::GreedySolver;
pub use held_karp::{HELD_KARP_MAX_NODES, HeldKarpSolver};

use waypoint_core::{Distance, DistanceMatrix, Solver, SolverLimits, Strategy};

/// Build the solver for `strategy`, configured with `limits`.
///
/// # Examples
/// ```
/// use waypoint_core::{DistanceMatrix, SolverLimits, Strategy};
/// use waypoint_solver::solver_for;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = DistanceMatrix::from_metres(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.0],
///     vec![2.0, 1.0, 0.0],
/// ])?;
/// let solver = solver_for(Strategy::DynamicProgramming, &SolverLimits::default());
/// let result = solver.solve(&matrix, 0)?;
/// assert_eq!(result.strategy, Strategy::DynamicProgramming);
/// assert_eq!(result.tour.len(), 4);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn solver_for(strategy: Strategy, limits: &SolverLimits) -> Box<dyn Solver> {
    match strategy {
        Strategy::BruteForce => Box::new(BruteForceSolver::new(limits.brute_force_max_nodes)),
        Strategy::DynamicProgramming => {
            Box::new(HeldKarpSolver::new(limits.dynamic_programming_max_nodes))
        }
        Strategy::Greedy => Box::new(GreedySolver),
    }
}

/// Length of the leg `from -> to`, or `None` when unreachable or out of range.
fn leg(matrix: &DistanceMatrix, from: usize, to: usize) -> Option<f64> {
    matrix.get(from, to).and_then(Distance::metres)
}
