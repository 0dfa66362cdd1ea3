//! Nearest-neighbour tour construction.

use std::time::Instant;

use log::debug;
use waypoint_core::solver::{finish_tour, validate_request};
use waypoint_core::{DistanceMatrix, SolveError, Solver, Strategy, Tour, TourResult};

use crate::leg;

/// Heuristic solver that always moves to the closest unvisited index.
///
/// Ties go to the lowest index. Unreachable candidates are never chosen, so
/// the solver reports [`SolveError::Infeasible`] when it gets stuck or cannot
/// return to the start. It accepts any matrix size.
///
/// # Examples
/// ```
/// use waypoint_core::{DistanceMatrix, Solver};
/// use waypoint_solver::GreedySolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = DistanceMatrix::from_metres(vec![
///     vec![0.0, 3.0, 1.0],
///     vec![3.0, 0.0, 1.0],
///     vec![1.0, 1.0, 0.0],
/// ])?;
/// let result = GreedySolver.solve(&matrix, 0)?;
/// assert_eq!(result.tour.indices(), &[0, 2, 1, 0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn strategy(&self) -> Strategy {
        Strategy::Greedy
    }

    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<TourResult, SolveError> {
        let started_at = Instant::now();
        validate_request(matrix, start)?;
        let nodes = matrix.size();
        if nodes == 1 {
            return finish_tour(Tour::trivial(start), matrix, self.strategy(), started_at);
        }

        let mut visited = vec![false; nodes];
        if let Some(flag) = visited.get_mut(start) {
            *flag = true;
        }
        let mut order = Vec::with_capacity(nodes);
        order.push(start);
        let mut current = start;
        for _ in 1..nodes {
            let next = nearest_unvisited(matrix, current, &visited).ok_or_else(|| {
                debug!("greedy stuck at index {current} with unvisited nodes left");
                SolveError::Infeasible
            })?;
            if let Some(flag) = visited.get_mut(next) {
                *flag = true;
            }
            order.push(next);
            current = next;
        }
        finish_tour(Tour::closed(order), matrix, self.strategy(), started_at)
    }
}

/// Closest reachable unvisited index from `from`, lowest index on ties.
fn nearest_unvisited(matrix: &DistanceMatrix, from: usize, visited: &[bool]) -> Option<usize> {
    let mut best: Option<(f64, usize)> = None;
    for (candidate, _) in visited.iter().enumerate().filter(|(_, seen)| !**seen) {
        let Some(cost) = leg(matrix, from, candidate) else {
            continue;
        };
        if best.is_none_or(|(current, _)| cost < current) {
            best = Some((cost, candidate));
        }
    }
    best.map(|(_, index)| index)
}
