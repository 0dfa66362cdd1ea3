//! Tour-search abstraction shared by every strategy.

use std::time::Instant;

use thiserror::Error;

use crate::ErrorKind;
use crate::matrix::{Distance, DistanceMatrix};
use crate::tour::{Strategy, Tour, TourResult};

/// Largest input brute force accepts by default.
pub const DEFAULT_BRUTE_FORCE_MAX_NODES: usize = 12;
/// Largest input dynamic programming accepts by default.
pub const DEFAULT_DYNAMIC_PROGRAMMING_MAX_NODES: usize = 20;

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The matrix has no rows.
    #[error("cannot solve an empty matrix")]
    EmptyMatrix,
    /// The start index is not a matrix row.
    #[error("start index {start} is out of range for {size} nodes")]
    StartOutOfRange {
        /// Requested start index.
        start: usize,
        /// Matrix size.
        size: usize,
    },
    /// Every closed tour uses an unreachable leg.
    #[error("no tour visits every node; the selection is disconnected")]
    Infeasible,
    /// The input exceeds the strategy's node ceiling.
    #[error("{strategy} accepts at most {limit} nodes, got {nodes}")]
    TooManyNodes {
        /// Strategy that refused the input.
        strategy: Strategy,
        /// Nodes supplied.
        nodes: usize,
        /// Configured ceiling.
        limit: usize,
    },
}

impl SolveError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyMatrix | Self::StartOutOfRange { .. } => ErrorKind::Precondition,
            Self::Infeasible => ErrorKind::Topology,
            Self::TooManyNodes { .. } => ErrorKind::Size,
        }
    }
}

/// Find a closed tour over every index of a distance matrix.
///
/// Implementations return a tour of `n + 1` indices starting and ending at
/// `start`, report [`SolveError::Infeasible`] rather than a tour with an
/// unreachable leg, and must not panic on any input.
/// Solvers must be `Send + Sync` to operate safely across threads.
pub trait Solver: Send + Sync {
    /// Strategy implemented by this solver.
    fn strategy(&self) -> Strategy;

    /// Solve for a tour rooted at `start`.
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<TourResult, SolveError>;
}

/// Check the inputs every strategy rejects.
///
/// # Examples
/// ```
/// use waypoint_core::{DistanceMatrix, SolveError};
/// use waypoint_core::solver::validate_request;
///
/// # fn main() -> Result<(), waypoint_core::MatrixError> {
/// let empty = DistanceMatrix::from_metres(Vec::new())?;
/// assert_eq!(validate_request(&empty, 0), Err(SolveError::EmptyMatrix));
///
/// let single = DistanceMatrix::from_metres(vec![vec![0.0]])?;
/// assert!(validate_request(&single, 0).is_ok());
/// assert!(validate_request(&single, 1).is_err());
/// # Ok(())
/// # }
/// ```
pub fn validate_request(matrix: &DistanceMatrix, start: usize) -> Result<(), SolveError> {
    if matrix.is_empty() {
        return Err(SolveError::EmptyMatrix);
    }
    if start >= matrix.size() {
        return Err(SolveError::StartOutOfRange {
            start,
            size: matrix.size(),
        });
    }
    Ok(())
}

/// Price `tour` against `matrix` and package it as a [`TourResult`].
///
/// Tours with an unreachable or out-of-range leg are reported as
/// [`SolveError::Infeasible`].
pub fn finish_tour(
    tour: Tour,
    matrix: &DistanceMatrix,
    strategy: Strategy,
    started_at: Instant,
) -> Result<TourResult, SolveError> {
    let Some(Distance::Reachable(total_cost)) = tour.cost(matrix) else {
        return Err(SolveError::Infeasible);
    };
    Ok(TourResult {
        tour,
        total_cost,
        strategy,
        solve_time: started_at.elapsed(),
    })
}

/// Node-count ceilings applied before a solver runs.
///
/// # Examples
/// ```
/// use waypoint_core::{SolverLimits, Strategy};
///
/// let limits = SolverLimits::default();
/// assert_eq!(limits.limit_for(Strategy::BruteForce), Some(12));
/// assert_eq!(limits.limit_for(Strategy::Greedy), None);
/// assert!(limits.check(Strategy::DynamicProgramming, 21).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverLimits {
    /// Ceiling for [`Strategy::BruteForce`].
    pub brute_force_max_nodes: usize,
    /// Ceiling for [`Strategy::DynamicProgramming`].
    pub dynamic_programming_max_nodes: usize,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            brute_force_max_nodes: DEFAULT_BRUTE_FORCE_MAX_NODES,
            dynamic_programming_max_nodes: DEFAULT_DYNAMIC_PROGRAMMING_MAX_NODES,
        }
    }
}

impl SolverLimits {
    /// Ceiling for `strategy`, or `None` when unbounded.
    #[must_use]
    pub const fn limit_for(&self, strategy: Strategy) -> Option<usize> {
        match strategy {
            Strategy::BruteForce => Some(self.brute_force_max_nodes),
            Strategy::DynamicProgramming => Some(self.dynamic_programming_max_nodes),
            Strategy::Greedy => None,
        }
    }

    /// Refuse `nodes` when it exceeds the ceiling for `strategy`.
    pub const fn check(&self, strategy: Strategy, nodes: usize) -> Result<(), SolveError> {
        match self.limit_for(strategy) {
            Some(limit) if nodes > limit => Err(SolveError::TooManyNodes {
                strategy,
                nodes,
                limit,
            }),
            _ => Ok(()),
        }
    }
}
