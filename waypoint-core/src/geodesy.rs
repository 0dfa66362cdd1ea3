//! Distance and projection helpers for WGS84 coordinates.
//!
//! Edge weights are geodesic metres on the WGS84 ellipsoid. Projection onto
//! an edge is planar in `(longitude, latitude)` space, which is accurate
//! enough to choose the nearest road segment and keeps the inserted point on
//! the segment's straight line.

use geo::{Closest, ClosestPoint, Coord, Distance, Euclidean, Geodesic, Line, Point};

/// Geodesic distance in metres between two coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::geodesy::geodesic_distance;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 0.0 };
/// let metres = geodesic_distance(a, b);
/// assert!((metres - 111_319.49).abs() < 1.0);
/// ```
#[must_use]
pub fn geodesic_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b))
}

/// A coordinate projected onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// The closest point on the segment, clamped to its endpoints.
    pub point: Coord<f64>,
    /// Planar distance from the input coordinate to [`Projection::point`],
    /// in degrees.
    pub offset: f64,
}

/// Project `point` onto the segment `start..end`.
///
/// Returns `None` when the projection is undefined, which only happens for
/// non-finite coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::geodesy::project_onto_segment;
///
/// let projection = project_onto_segment(
///     Coord { x: 0.5, y: 1.0 },
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
/// )
/// .expect("finite input");
/// assert_eq!(projection.point, Coord { x: 0.5, y: 0.0 });
/// assert!((projection.offset - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn project_onto_segment(
    point: Coord<f64>,
    start: Coord<f64>,
    end: Coord<f64>,
) -> Option<Projection> {
    let target = Point::from(point);
    if start == end {
        return Some(Projection {
            point: start,
            offset: Euclidean.distance(target, Point::from(start)),
        });
    }
    let closest = match Line::new(start, end).closest_point(&target) {
        Closest::Intersection(hit) | Closest::SinglePoint(hit) => hit,
        Closest::Indeterminate => return None,
    };
    Some(Projection {
        point: closest.0,
        offset: Euclidean.distance(target, closest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn geodesic_distance_is_zero_for_identical_points() {
        let c = Coord { x: -74.05, y: 4.65 };
        assert!(geodesic_distance(c, c).abs() < f64::EPSILON);
    }

    #[rstest]
    fn geodesic_distance_is_symmetric() {
        let a = Coord { x: -74.05, y: 4.65 };
        let b = Coord { x: -74.06, y: 4.66 };
        assert!((geodesic_distance(a, b) - geodesic_distance(b, a)).abs() < 1e-9);
    }

    #[rstest]
    #[case::before_start(Coord { x: -1.0, y: 0.5 }, Coord { x: 0.0, y: 0.0 })]
    #[case::after_end(Coord { x: 3.0, y: -0.5 }, Coord { x: 2.0, y: 0.0 })]
    fn projection_clamps_to_segment(#[case] input: Coord<f64>, #[case] expected: Coord<f64>) {
        let projection = project_onto_segment(
            input,
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 2.0, y: 0.0 },
        )
        .expect("finite input");
        assert_eq!(projection.point, expected);
    }

    #[rstest]
    fn point_on_segment_projects_onto_itself() {
        let on_line = Coord { x: 1.0, y: 1.0 };
        let projection =
            project_onto_segment(on_line, Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 2.0 })
                .expect("finite input");
        assert_eq!(projection.point, on_line);
        assert!(projection.offset.abs() < 1e-12);
    }

    #[rstest]
    fn degenerate_segment_projects_to_its_endpoint() {
        let end = Coord { x: 1.0, y: 1.0 };
        let projection =
            project_onto_segment(Coord { x: 1.0, y: 2.0 }, end, end).expect("finite input");
        assert_eq!(projection.point, end);
        assert!((projection.offset - 1.0).abs() < 1e-12);
    }
}
