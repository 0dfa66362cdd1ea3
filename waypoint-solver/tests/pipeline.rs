//! End-to-end planning over small graphs with every strategy.

use geo::Coord;
use rstest::rstest;
use waypoint_core::test_support::{SQUARE_SIDE_DEGREES, cycle_graph, square_graph};
use waypoint_core::{PlanningSession, SolverLimits, Strategy, Waypoint};
use waypoint_solver::solver_for;

#[rstest]
#[case(Strategy::BruteForce)]
#[case(Strategy::DynamicProgramming)]
#[case(Strategy::Greedy)]
fn square_tour_walks_the_perimeter(#[case] strategy: Strategy) {
    let graph = square_graph();
    let perimeter: f64 = graph.edges().map(|edge| edge.weight).sum();
    let mut session = PlanningSession::new();
    session.load_graph(graph);
    session.select_nodes(vec![0, 1, 2, 3]).expect("graph loaded");
    session.build_matrix().expect("matrix");

    let plan = session
        .solve(solver_for(strategy, &SolverLimits::default()).as_ref(), 0)
        .expect("plan");

    assert!((plan.result.total_cost - perimeter).abs() < 1e-6);
    assert_eq!(plan.route.full_path.len(), 5);
    assert_eq!(plan.route.node_tour, plan.route.full_path);
}

#[rstest]
fn waypoints_between_corners_are_visited() {
    let side = SQUARE_SIDE_DEGREES;
    let mut session = PlanningSession::new();
    session.load_graph(square_graph());
    let ids = session
        .resolve_waypoints(&[
            Waypoint::new(Coord { x: 0.0, y: 0.0 }),
            Waypoint::new(Coord {
                x: side / 2.0,
                y: -0.0001,
            }),
            Waypoint::new(Coord {
                x: side,
                y: side / 2.0,
            }),
        ])
        .expect("resolved")
        .to_vec();
    assert_eq!(ids, vec![0, 4, 5]);
    session.build_matrix().expect("matrix");

    let plan = session
        .solve(
            solver_for(Strategy::DynamicProgramming, &SolverLimits::default()).as_ref(),
            0,
        )
        .expect("plan");
    assert_eq!(plan.route.node_tour.first(), Some(&0));
    assert_eq!(plan.route.node_tour.len(), 4);
    for id in [4, 5] {
        assert!(plan.route.full_path.contains(&id));
    }
    assert!(
        plan.route
            .full_path
            .windows(2)
            .all(|pair| pair.first() != pair.last())
    );
}

#[rstest]
fn exact_strategies_agree_on_a_ring() {
    let mut session = PlanningSession::new();
    session.load_graph(cycle_graph(10));
    session
        .select_nodes(vec![0, 2, 3, 5, 7, 9])
        .expect("graph loaded");
    session.build_matrix().expect("matrix");

    let limits = SolverLimits::default();
    let brute = session
        .solve(solver_for(Strategy::BruteForce, &limits).as_ref(), 0)
        .expect("brute force");
    let dynamic = session
        .solve(solver_for(Strategy::DynamicProgramming, &limits).as_ref(), 0)
        .expect("held-karp");
    assert!((brute.result.total_cost - dynamic.result.total_cost).abs() < 1e-6);
}
