//! Behavioural tests for the tour solvers using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waypoint_core::{DistanceMatrix, SolveError, SolverLimits, Strategy, TourResult};
use waypoint_solver::solver_for;

/// World state for solver scenarios.
#[derive(Debug)]
struct SolverWorld {
    matrix: RefCell<Option<DistanceMatrix>>,
    outcomes: RefCell<Vec<(Strategy, Result<TourResult, SolveError>)>>,
}

impl SolverWorld {
    #[expect(clippy::missing_const_for_fn, reason = "RefCell::new is not const")]
    fn new() -> Self {
        Self {
            matrix: RefCell::new(None),
            outcomes: RefCell::new(Vec::new()),
        }
    }

    fn matrix(&self) -> DistanceMatrix {
        self.matrix
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("matrix must be initialised"))
    }

    fn solve(&self, strategy: Strategy) {
        let solver = solver_for(strategy, &SolverLimits::default());
        let outcome = solver.solve(&self.matrix(), 0);
        self.outcomes.borrow_mut().push((strategy, outcome));
    }
}

#[fixture]
fn world() -> SolverWorld {
    SolverWorld::new()
}

fn matrix_from(rows: Vec<Vec<f64>>) -> DistanceMatrix {
    DistanceMatrix::from_metres(rows).unwrap_or_else(|err| panic!("valid matrix: {err}"))
}

// =============================================================================
// Given
// =============================================================================

#[given("a unit square distance matrix")]
fn unit_square(world: &SolverWorld) {
    // Shortest paths on a square with unit sides: neighbours 1, opposite 2.
    world.matrix.replace(Some(matrix_from(vec![
        vec![0.0, 1.0, 2.0, 1.0],
        vec![1.0, 0.0, 1.0, 2.0],
        vec![2.0, 1.0, 0.0, 1.0],
        vec![1.0, 2.0, 1.0, 0.0],
    ])));
}

#[given("two mutually unreachable nodes")]
fn disconnected_pair(world: &SolverWorld) {
    world.matrix.replace(Some(matrix_from(vec![
        vec![0.0, f64::INFINITY],
        vec![f64::INFINITY, 0.0],
    ])));
}

fn uniform_matrix(size: usize) -> DistanceMatrix {
    let rows = (0..size)
        .map(|i| (0..size).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
        .collect();
    matrix_from(rows)
}

#[given("a 13 node distance matrix")]
fn thirteen_nodes(world: &SolverWorld) {
    world.matrix.replace(Some(uniform_matrix(13)));
}

#[given("a 21 node distance matrix")]
fn twenty_one_nodes(world: &SolverWorld) {
    world.matrix.replace(Some(uniform_matrix(21)));
}

// =============================================================================
// When
// =============================================================================

#[when("every strategy solves from index 0")]
fn solve_all(world: &SolverWorld) {
    for strategy in Strategy::ALL {
        world.solve(strategy);
    }
}

#[when("brute force solves with default limits")]
fn solve_brute_force(world: &SolverWorld) {
    world.solve(Strategy::BruteForce);
}

#[when("dynamic programming solves with default limits")]
fn solve_dynamic_programming(world: &SolverWorld) {
    world.solve(Strategy::DynamicProgramming);
}

// =============================================================================
// Then
// =============================================================================

#[then("every tour costs 4")]
fn every_tour_costs_four(world: &SolverWorld) {
    let outcomes = world.outcomes.borrow();
    assert_eq!(outcomes.len(), Strategy::ALL.len());
    for (strategy, outcome) in outcomes.iter() {
        let result = outcome
            .as_ref()
            .unwrap_or_else(|err| panic!("{strategy} should succeed: {err}"));
        assert!(
            (result.total_cost - 4.0).abs() < f64::EPSILON,
            "{strategy} cost {}",
            result.total_cost
        );
    }
}

#[then("every tour starts and ends at index 0")]
fn tours_are_closed(world: &SolverWorld) {
    for (strategy, outcome) in world.outcomes.borrow().iter() {
        let Ok(result) = outcome else {
            panic!("{strategy} should succeed");
        };
        let indices = result.tour.indices();
        assert_eq!(indices.len(), 5, "{strategy} tour {indices:?}");
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&0));
    }
}

#[then("every strategy reports an infeasible tour")]
fn all_infeasible(world: &SolverWorld) {
    let outcomes = world.outcomes.borrow();
    assert_eq!(outcomes.len(), Strategy::ALL.len());
    for (strategy, outcome) in outcomes.iter() {
        assert_eq!(
            outcome.as_ref().err(),
            Some(&SolveError::Infeasible),
            "{strategy} should report infeasibility"
        );
    }
}

#[then("the solver refuses 13 nodes against a limit of 12")]
fn refuses_oversized(world: &SolverWorld) {
    let outcomes = world.outcomes.borrow();
    let Some((_, Err(err))) = outcomes.first() else {
        panic!("brute force should refuse the matrix");
    };
    assert_eq!(
        err,
        &SolveError::TooManyNodes {
            strategy: Strategy::BruteForce,
            nodes: 13,
            limit: 12,
        }
    );
}

#[then("dynamic programming refuses 21 nodes against a limit of 20")]
fn dynamic_programming_refuses_oversized(world: &SolverWorld) {
    let outcomes = world.outcomes.borrow();
    let Some((_, Err(err))) = outcomes.first() else {
        panic!("dynamic programming should refuse the matrix");
    };
    assert_eq!(
        err,
        &SolveError::TooManyNodes {
            strategy: Strategy::DynamicProgramming,
            nodes: 21,
            limit: 20,
        }
    );
}

#[scenario(path = "tests/features/solvers.feature", index = 0)]
fn unit_square_costs_four(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/solvers.feature", index = 1)]
fn disconnected_pair_is_infeasible(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/solvers.feature", index = 2)]
fn brute_force_ceiling(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/solvers.feature", index = 3)]
fn dynamic_programming_ceiling(world: SolverWorld) {
    let _ = world;
}
