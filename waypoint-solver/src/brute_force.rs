//! Exhaustive search over every visiting order.

use std::time::Instant;

use log::debug;
use waypoint_core::solver::{DEFAULT_BRUTE_FORCE_MAX_NODES, finish_tour, validate_request};
use waypoint_core::{DistanceMatrix, SolveError, Solver, Strategy, Tour, TourResult};

use crate::leg;

/// Exact solver enumerating all `(n - 1)!` orders of the non-start indices.
///
/// Orders are generated in place with Heap's algorithm. The first order
/// reaching the minimum cost wins ties.
///
/// # Examples
/// ```
/// use waypoint_core::{DistanceMatrix, SolveError, Solver};
/// use waypoint_solver::BruteForceSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = DistanceMatrix::from_metres(vec![vec![0.0; 4]; 4])?;
/// let solver = BruteForceSolver::new(3);
/// assert!(matches!(
///     solver.solve(&matrix, 0),
///     Err(SolveError::TooManyNodes { nodes: 4, limit: 3, .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BruteForceSolver {
    max_nodes: usize,
}

impl Default for BruteForceSolver {
    fn default() -> Self {
        Self::new(DEFAULT_BRUTE_FORCE_MAX_NODES)
    }
}

impl BruteForceSolver {
    /// A solver refusing matrices larger than `max_nodes`.
    #[must_use]
    pub const fn new(max_nodes: usize) -> Self {
        Self { max_nodes }
    }

    /// Largest matrix the solver accepts.
    #[must_use]
    pub const fn max_nodes(&self) -> usize {
        self.max_nodes
    }
}

impl Solver for BruteForceSolver {
    fn strategy(&self) -> Strategy {
        Strategy::BruteForce
    }

    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<TourResult, SolveError> {
        let started_at = Instant::now();
        validate_request(matrix, start)?;
        let nodes = matrix.size();
        if nodes > self.max_nodes {
            return Err(SolveError::TooManyNodes {
                strategy: self.strategy(),
                nodes,
                limit: self.max_nodes,
            });
        }
        if nodes == 1 {
            return finish_tour(Tour::trivial(start), matrix, self.strategy(), started_at);
        }

        let mut order: Vec<usize> = (0..nodes).filter(|&index| index != start).collect();
        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut visited = 0_u64;
        for_each_permutation(&mut order, |candidate| {
            visited += 1;
            let Some(cost) = closed_cost(matrix, start, candidate) else {
                return;
            };
            if best.as_ref().is_none_or(|(current, _)| cost < *current) {
                best = Some((cost, candidate.to_vec()));
            }
        });
        debug!("brute force examined {visited} orders over {nodes} nodes");

        let (_, order) = best.ok_or(SolveError::Infeasible)?;
        let mut tour = Vec::with_capacity(nodes + 1);
        tour.push(start);
        tour.extend(order);
        tour.push(start);
        finish_tour(Tour::new(tour), matrix, self.strategy(), started_at)
    }
}

/// Cost of `start -> order... -> start`, or `None` if any leg is unreachable.
#[expect(
    clippy::float_arithmetic,
    reason = "tour costs are sums of floating-point leg lengths"
)]
fn closed_cost(matrix: &DistanceMatrix, start: usize, order: &[usize]) -> Option<f64> {
    let mut total = 0.0;
    let mut current = start;
    for &next in order.iter().chain(std::iter::once(&start)) {
        total += leg(matrix, current, next)?;
        current = next;
    }
    Some(total)
}

/// Visit every permutation of `items` using Heap's algorithm.
///
/// The first permutation visited is `items` as given.
fn for_each_permutation(items: &mut [usize], mut visit: impl FnMut(&[usize])) {
    visit(&*items);
    let mut counters = vec![0_usize; items.len()];
    let mut level = 1;
    while level < items.len() {
        let Some(counter) = counters.get_mut(level) else {
            break;
        };
        if *counter < level {
            let other = if level.is_multiple_of(2) { 0 } else { *counter };
            items.swap(other, level);
            *counter += 1;
            level = 1;
            visit(&*items);
        } else {
            *counter = 0;
            level += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(3, 6)]
    #[case(5, 120)]
    fn heap_visits_every_permutation_once(#[case] len: usize, #[case] expected: usize) {
        let mut items: Vec<usize> = (0..len).collect();
        let mut seen = HashSet::new();
        let mut count = 0;
        for_each_permutation(&mut items, |perm| {
            count += 1;
            seen.insert(perm.to_vec());
        });
        assert_eq!(count, expected);
        assert_eq!(seen.len(), expected);
    }

    #[rstest]
    fn skips_orders_with_unreachable_legs() {
        // 0-2 is unreachable, leaving the perimeter and its reverse.
        let inf = f64::INFINITY;
        let matrix = DistanceMatrix::from_metres(vec![
            vec![0.0, 1.0, inf, 1.0],
            vec![1.0, 0.0, 1.0, 5.0],
            vec![inf, 1.0, 0.0, 1.0],
            vec![1.0, 5.0, 1.0, 0.0],
        ])
        .expect("matrix");
        let result = BruteForceSolver::default()
            .solve(&matrix, 0)
            .expect("feasible");
        assert_eq!(result.tour.indices(), &[0, 1, 2, 3, 0]);
        assert!((result.total_cost - 4.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn first_minimum_wins_ties() {
        let matrix = DistanceMatrix::from_metres(vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .expect("matrix");
        let result = BruteForceSolver::default()
            .solve(&matrix, 0)
            .expect("feasible");
        assert_eq!(result.tour.indices(), &[0, 1, 2, 0]);
    }

    #[rstest]
    fn single_node_is_trivial() {
        let matrix = DistanceMatrix::from_metres(vec![vec![0.0]]).expect("matrix");
        let result = BruteForceSolver::default()
            .solve(&matrix, 0)
            .expect("trivial");
        assert_eq!(result.tour.indices(), &[0, 0]);
        assert!(result.total_cost.abs() < f64::EPSILON);
    }
}
