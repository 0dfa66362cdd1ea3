//! Deterministic inputs for the solver benchmarks.
//!
//! Points are scattered uniformly over a small area and joined by geodesic
//! distances, giving complete symmetric matrices like those built from a
//! connected road graph.

use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waypoint_core::DistanceMatrix;
use waypoint_core::geodesy::geodesic_distance;

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Side of the sampled area in degrees, roughly 5 km at the equator.
const AREA_SIZE: f64 = 0.05;

/// Scatter `count` points over the benchmark area.
#[must_use]
pub fn generate_points(count: usize, seed: u64) -> Vec<Coord<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Coord {
            x: rng.gen_range(0.0..AREA_SIZE),
            y: rng.gen_range(0.0..AREA_SIZE),
        })
        .collect()
}

/// Complete geodesic distance matrix over `count` random points.
#[must_use]
pub fn generate_distance_matrix(count: usize, seed: u64) -> DistanceMatrix {
    let points = generate_points(count, seed);
    let rows = points
        .iter()
        .map(|&from| {
            points
                .iter()
                .map(|&to| if from == to { 0.0 } else { geodesic_distance(from, to) })
                .collect()
        })
        .collect();
    match DistanceMatrix::from_metres(rows) {
        Ok(matrix) => matrix,
        Err(err) => panic!("generated matrix is valid: {err}"),
    }
}
