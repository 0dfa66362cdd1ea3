//! Held–Karp bitmask dynamic programming.
//!
//! States are `(visited, last)` over the non-start indices: the cheapest
//! path that leaves the start, visits exactly the nodes in `visited` and ends
//! at `last`. Masks are processed in increasing order so every subset is
//! final before its supersets read it. Unreachable states are simply absent.

use std::time::Instant;

use log::debug;
use waypoint_core::solver::{DEFAULT_DYNAMIC_PROGRAMMING_MAX_NODES, finish_tour, validate_request};
use waypoint_core::{DistanceMatrix, SolveError, Solver, Strategy, Tour, TourResult};

use crate::leg;

/// Node ceiling applied whatever the configured limit.
///
/// The state tables hold `(n - 1)·2ⁿ⁻¹` entries of ten bytes each: about
/// 100 MB at the default limit of 20 nodes and about 1.9 GB at this ceiling.
pub const HELD_KARP_MAX_NODES: usize = 24;

/// Exact solver using `O(n²·2ⁿ)` dynamic programming.
///
/// # Examples
/// ```
/// use waypoint_core::{DistanceMatrix, Solver};
/// use waypoint_solver::HeldKarpSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = DistanceMatrix::from_metres(vec![
///     vec![0.0, 1.0, 9.0, 1.0],
///     vec![1.0, 0.0, 1.0, 9.0],
///     vec![9.0, 1.0, 0.0, 1.0],
///     vec![1.0, 9.0, 1.0, 0.0],
/// ])?;
/// let result = HeldKarpSolver::default().solve(&matrix, 0)?;
/// assert_eq!(result.total_cost, 4.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldKarpSolver {
    max_nodes: usize,
}

impl Default for HeldKarpSolver {
    fn default() -> Self {
        Self::new(DEFAULT_DYNAMIC_PROGRAMMING_MAX_NODES)
    }
}

impl HeldKarpSolver {
    /// A solver refusing matrices larger than `max_nodes`, capped at
    /// [`HELD_KARP_MAX_NODES`].
    #[must_use]
    pub fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes: max_nodes.min(HELD_KARP_MAX_NODES),
        }
    }

    /// Largest matrix the solver accepts.
    #[must_use]
    pub const fn max_nodes(&self) -> usize {
        self.max_nodes
    }
}

impl Solver for HeldKarpSolver {
    fn strategy(&self) -> Strategy {
        Strategy::DynamicProgramming
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

        let others: Vec<usize> = (0..nodes).filter(|&index| index != start).collect();
        let table = StateTable::fill(matrix, start, &others);
        debug!(
            "held-karp filled {} states over {nodes} nodes",
            table.reached()
        );
        let order = table.best_order(matrix, start).ok_or(SolveError::Infeasible)?;

        let mut tour = Vec::with_capacity(nodes + 1);
        tour.push(start);
        tour.extend(order);
        tour.push(start);
        finish_tour(Tour::new(tour), matrix, self.strategy(), started_at)
    }
}

/// Cost and predecessor per `(mask, last)` state, stored densely.
///
/// `parents[state]` is `None` for unreached states; their cost is unused.
/// A reached single-node state stores its own position as parent.
struct StateTable<'a> {
    others: &'a [usize],
    costs: Vec<f64>,
    parents: Vec<Option<u8>>,
}

impl<'a> StateTable<'a> {
    #[expect(
        clippy::float_arithmetic,
        reason = "state costs are sums of floating-point leg lengths"
    )]
    fn fill(matrix: &DistanceMatrix, start: usize, others: &'a [usize]) -> Self {
        let width = others.len();
        let masks = 1_usize << width;
        let mut table = Self {
            others,
            costs: vec![0.0; masks * width],
            parents: vec![None; masks * width],
        };

        for (position, &node) in others.iter().enumerate() {
            if let Some(cost) = leg(matrix, start, node) {
                table.relax(1 << position, position, cost, position);
            }
        }

        for mask in 1..masks {
            for (last, &from) in others.iter().enumerate() {
                let Some(cost) = table.cost(mask, last) else {
                    continue;
                };
                for (next, &to) in others.iter().enumerate() {
                    if mask & (1 << next) != 0 {
                        continue;
                    }
                    if let Some(step) = leg(matrix, from, to) {
                        table.relax(mask | (1 << next), next, cost + step, last);
                    }
                }
            }
        }
        table
    }

    const fn index(&self, mask: usize, last: usize) -> usize {
        mask * self.others.len() + last
    }

    fn cost(&self, mask: usize, last: usize) -> Option<f64> {
        let index = self.index(mask, last);
        self.parents.get(index).copied().flatten()?;
        self.costs.get(index).copied()
    }

    fn parent(&self, mask: usize, last: usize) -> Option<usize> {
        self.parents
            .get(self.index(mask, last))
            .copied()
            .flatten()
            .map(usize::from)
    }

    /// Record `cost` for the state if it improves on the stored one.
    fn relax(&mut self, mask: usize, last: usize, cost: f64, parent: usize) {
        if self.cost(mask, last).is_some_and(|known| known <= cost) {
            return;
        }
        let index = self.index(mask, last);
        let (Some(slot), Some(parent_slot), Ok(parent)) = (
            self.costs.get_mut(index),
            self.parents.get_mut(index),
            u8::try_from(parent),
        ) else {
            return;
        };
        *slot = cost;
        *parent_slot = Some(parent);
    }

    fn reached(&self) -> usize {
        self.parents.iter().filter(|parent| parent.is_some()).count()
    }

    /// Cheapest closed order of the non-start indices, or `None` when every
    /// full state is unreached or cannot return to the start.
    #[expect(
        clippy::float_arithmetic,
        reason = "closing the tour adds the final leg"
    )]
    fn best_order(&self, matrix: &DistanceMatrix, start: usize) -> Option<Vec<usize>> {
        let full = (1_usize << self.others.len()) - 1;
        let mut best: Option<(f64, usize)> = None;
        for (last, &node) in self.others.iter().enumerate() {
            let (Some(cost), Some(closing)) = (self.cost(full, last), leg(matrix, node, start))
            else {
                continue;
            };
            let total = cost + closing;
            if best.is_none_or(|(current, _)| total < current) {
                best = Some((total, last));
            }
        }

        let (_, mut last) = best?;
        let mut mask = full;
        let mut order = Vec::with_capacity(self.others.len());
        loop {
            order.push(*self.others.get(last)?);
            let parent = self.parent(mask, last)?;
            mask &= !(1 << last);
            if mask == 0 {
                break;
            }
            last = parent;
        }
        order.reverse();
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn configured_limit_is_capped() {
        assert_eq!(HeldKarpSolver::new(1_000).max_nodes(), HELD_KARP_MAX_NODES);
        assert_eq!(HeldKarpSolver::new(5).max_nodes(), 5);
    }

    #[rstest]
    #[case::configured(HeldKarpSolver::default(), 21, 20)]
    #[case::hard_ceiling(HeldKarpSolver::new(1_000), 25, HELD_KARP_MAX_NODES)]
    fn oversized_matrices_are_refused(
        #[case] solver: HeldKarpSolver,
        #[case] size: usize,
        #[case] limit: usize,
    ) {
        let rows = (0..size)
            .map(|i| (0..size).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        let matrix = DistanceMatrix::from_metres(rows).expect("matrix");
        assert_eq!(
            solver.solve(&matrix, 0),
            Err(SolveError::TooManyNodes {
                strategy: Strategy::DynamicProgramming,
                nodes: size,
                limit,
            })
        );
    }

    #[rstest]
    fn non_zero_start_is_honoured() {
        let matrix = DistanceMatrix::from_metres(vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![1.0, 0.0, 6.0, 4.0],
            vec![15.0, 7.0, 0.0, 8.0],
            vec![6.0, 3.0, 12.0, 0.0],
        ])
        .expect("matrix");
        let result = HeldKarpSolver::default().solve(&matrix, 2).expect("tour");
        assert_eq!(result.tour.indices().first(), Some(&2));
        assert_eq!(result.tour.indices().last(), Some(&2));
        assert!((result.total_cost - 21.0).abs() < 1e-9);
    }

    #[rstest]
    fn missing_return_leg_is_infeasible() {
        let inf = f64::INFINITY;
        // Nothing leads back to 0.
        let matrix = DistanceMatrix::from_metres(vec![
            vec![0.0, 1.0, 1.0],
            vec![inf, 0.0, 1.0],
            vec![inf, 1.0, 0.0],
        ])
        .expect("matrix");
        assert_eq!(
            HeldKarpSolver::default().solve(&matrix, 0),
            Err(SolveError::Infeasible)
        );
    }

    #[rstest]
    fn asymmetric_matrices_follow_the_cheap_direction() {
        let matrix = DistanceMatrix::from_metres(vec![
            vec![0.0, 1.0, 5.0],
            vec![5.0, 0.0, 1.0],
            vec![1.0, 5.0, 0.0],
        ])
        .expect("matrix");
        let result = HeldKarpSolver::default().solve(&matrix, 0).expect("tour");
        assert_eq!(result.tour.indices(), &[0, 1, 2, 0]);
        assert!((result.total_cost - 3.0).abs() < f64::EPSILON);
    }
}
