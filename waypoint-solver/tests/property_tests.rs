//! Property-based tests for the tour solvers.
//!
//! # Invariants tested
//!
//! - **Self-consistency:** `total_cost` equals the sum of consecutive legs.
//! - **Tour shape:** every index appears once, closed at the start.
//! - **Exact agreement:** brute force and Held–Karp find the same optimum.
//! - **Heuristic bound:** greedy never beats the optimum.

use proptest::prelude::*;
use waypoint_core::{
    Distance, DistanceMatrix, Solver, SolverLimits, Strategy as TourStrategy, TourResult,
};
use waypoint_solver::{BruteForceSolver, GreedySolver, HeldKarpSolver, solver_for};

const TOLERANCE: f64 = 1e-6;

/// Symmetric matrices of `2..=max` nodes with integral leg lengths.
fn symmetric_matrix(max: usize) -> impl Strategy<Value = DistanceMatrix> {
    (2..=max)
        .prop_flat_map(|n| (Just(n), prop::collection::vec(1_u32..1_000, n * n)))
        .prop_map(|(n, values)| {
            let rows = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| {
                            let (low, high) = if i < j { (i, j) } else { (j, i) };
                            if low == high {
                                0.0
                            } else {
                                values.get(low * n + high).copied().map_or(0.0, f64::from)
                            }
                        })
                        .collect()
                })
                .collect();
            DistanceMatrix::from_metres(rows).expect("generated matrix is valid")
        })
}

fn assert_well_formed(result: &TourResult, matrix: &DistanceMatrix, start: usize) {
    let indices = result.tour.indices();
    assert_eq!(indices.len(), matrix.size() + 1);
    assert_eq!(indices.first(), Some(&start));
    assert_eq!(indices.last(), Some(&start));

    let mut visited: Vec<usize> = indices.iter().skip(1).copied().collect();
    visited.sort_unstable();
    assert_eq!(visited, (0..matrix.size()).collect::<Vec<_>>());

    let Some(Distance::Reachable(expected)) = result.tour.cost(matrix) else {
        panic!("returned tour must be reachable");
    };
    assert!(
        (result.total_cost - expected).abs() < TOLERANCE,
        "reported {} but legs sum to {expected}",
        result.total_cost
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every strategy returns a well-formed, correctly priced tour.
    #[test]
    fn every_strategy_is_self_consistent(
        matrix in symmetric_matrix(8),
        start_seed in any::<usize>(),
    ) {
        let start = start_seed % matrix.size();
        for strategy in TourStrategy::ALL {
            let solver = solver_for(strategy, &SolverLimits::default());
            let result = solver.solve(&matrix, start).expect("complete graphs are feasible");
            prop_assert_eq!(result.strategy, strategy);
            assert_well_formed(&result, &matrix, start);
        }
    }

    /// Property: both exact strategies reach the same optimum and greedy is
    /// never cheaper.
    #[test]
    fn exact_strategies_agree_and_bound_greedy(matrix in symmetric_matrix(10)) {
        let brute = BruteForceSolver::new(10).solve(&matrix, 0).expect("brute force");
        let dynamic = HeldKarpSolver::default().solve(&matrix, 0).expect("held-karp");
        let greedy = GreedySolver.solve(&matrix, 0).expect("greedy");

        prop_assert!(
            (brute.total_cost - dynamic.total_cost).abs() < TOLERANCE,
            "brute force {} vs held-karp {}",
            brute.total_cost,
            dynamic.total_cost
        );
        prop_assert!(greedy.total_cost + TOLERANCE >= dynamic.total_cost);
    }
}
