//! Evenly spaced sample points along a route.

use serde::Serialize;
use uuid::Uuid;

use crate::error::EngineError;
use crate::geo::{to_geo, GeoPoint};
use crate::nav::ArcLengthIndex;

/// Default spacing between generated waypoints, in meters.
pub const DEFAULT_SPACING_M: f64 = 10.0;

/// Smallest accepted spacing. Anything finer would allocate one waypoint
/// per few centimeters of route.
pub const MIN_SPACING_M: f64 = 0.1;

/// A sample point tagged with its distance along the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub id: Uuid,
    pub point: GeoPoint,
    pub along_m: f64,
}

/// Walk the route from its start, emitting a waypoint every `spacing_m`
/// meters while the distance does not exceed the route length.
///
/// The route end itself is only emitted when the length is a multiple of
/// the spacing. Degenerate routes give no waypoints.
pub fn generate(index: &ArcLengthIndex, spacing_m: f64) -> Result<Vec<Waypoint>, EngineError> {
    check_spacing(spacing_m)?;
    if index.is_degenerate() {
        return Ok(Vec::new());
    }

    let origin = index.origin();
    let total = index.total_length();

    // Multiply instead of accumulating so long routes do not drift.
    let waypoints = (0u64..)
        .map(|k| k as f64 * spacing_m)
        .take_while(|&d| d <= total)
        .map(|d| Waypoint {
            id: Uuid::new_v4(),
            point: to_geo(index.point_at_distance(d), origin),
            along_m: d,
        })
        .collect();

    Ok(waypoints)
}

/// Reject a spacing that is not finite or is below [`MIN_SPACING_M`].
pub fn check_spacing(spacing_m: f64) -> Result<(), EngineError> {
    if spacing_m.is_finite() && spacing_m >= MIN_SPACING_M {
        Ok(())
    } else {
        Err(EngineError::InvalidSpacing(spacing_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{to_local, LocalPoint};
    use crate::route::Polyline;

    const ORIGIN: GeoPoint = GeoPoint::new(37.6176, 55.7558);

    fn index(local: &[(f64, f64)]) -> ArcLengthIndex {
        let geo: Vec<GeoPoint> = local
            .iter()
            .map(|&(x, y)| to_geo(LocalPoint::new(x, y), ORIGIN))
            .collect();
        ArcLengthIndex::new(&Polyline::from(geo), ORIGIN)
    }

    fn alongs(waypoints: &[Waypoint]) -> Vec<f64> {
        waypoints.iter().map(|w| w.along_m).collect()
    }

    #[test]
    fn no_terminal_waypoint_when_length_is_not_a_multiple() {
        let idx = index(&[(0.0, 0.0), (0.0, 25.0)]);
        let waypoints = generate(&idx, 10.0).unwrap();
        assert_eq!(alongs(&waypoints), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn waypoints_lie_on_the_route() {
        let idx = index(&[(0.0, 0.0), (20.0, 0.0), (20.0, 22.0)]);
        let waypoints = generate(&idx, 5.0).unwrap();

        assert_eq!(waypoints.len(), 9);
        let at_25 = to_local(waypoints[5].point, ORIGIN);
        assert!((at_25.x - 20.0).abs() < 1e-6 && (at_25.y - 5.0).abs() < 1e-6, "{at_25:?}");
        assert!(waypoints.windows(2).all(|w| w[0].along_m < w[1].along_m));
        assert!(waypoints.iter().all(|w| w.along_m <= idx.total_length()));
    }

    #[test]
    fn first_waypoint_is_route_start() {
        let idx = index(&[(5.0, 5.0), (5.0, 50.0)]);
        let waypoints = generate(&idx, DEFAULT_SPACING_M).unwrap();
        let start = to_local(waypoints[0].point, ORIGIN);
        assert!((start.x - 5.0).abs() < 1e-6 && (start.y - 5.0).abs() < 1e-6);
        assert_eq!(waypoints[0].along_m, 0.0);
    }

    #[test]
    fn degenerate_route_has_no_waypoints() {
        let idx = ArcLengthIndex::new(&Polyline::from(vec![ORIGIN]), ORIGIN);
        assert!(generate(&idx, 10.0).unwrap().is_empty());

        let idx = ArcLengthIndex::new(&Polyline::new(), ORIGIN);
        assert!(generate(&idx, 10.0).unwrap().is_empty());
    }

    #[test]
    fn unusable_spacing_is_rejected() {
        let idx = index(&[(0.0, 0.0), (0.0, 25.0)]);
        for spacing in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e-9, 0.09] {
            assert!(matches!(
                generate(&idx, spacing),
                Err(EngineError::InvalidSpacing(_))
            ));
        }
    }

    #[test]
    fn minimum_spacing_is_accepted() {
        let idx = index(&[(0.0, 0.0), (0.0, 1.0)]);
        let waypoints = generate(&idx, MIN_SPACING_M).unwrap();
        assert!(waypoints.len() >= 10 && waypoints.len() <= 11, "{}", waypoints.len());
    }
}
