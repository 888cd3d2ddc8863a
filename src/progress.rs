//! Live progress along the route and turn hints.
//!
//! Each GPS fix is projected onto the route to get the along-route
//! distance. The direction the user is moving in is compared to the
//! direction of the route at that distance and bucketed into a hint.

use log::debug;
use serde::Serialize;

use crate::geo::{to_local, GeoPoint, LocalPoint};
use crate::nav::ArcLengthIndex;

/// Movements shorter than this carry no usable direction.
const MIN_TRAVEL_M: f64 = 1e-6;

/// Which way the user should steer to follow the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingHint {
    #[default]
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    /// Moving roughly against the route.
    UTurnLeft,
    UTurnRight,
}

/// Result of processing one fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressState {
    pub along_m: f64,
    pub heading_hint: HeadingHint,
}

/// Classify the angle between the travel direction `travel` and the route
/// direction `route`, both unit vectors.
///
/// A positive `travel x route` means the route bends to the left of where
/// the user is heading.
pub fn classify_heading(travel: LocalPoint, route: LocalPoint) -> HeadingHint {
    let angle = travel.dot(route).clamp(-1.0, 1.0).acos().to_degrees();
    let left = travel.cross(route) > 0.0;

    if angle < 10.0 {
        HeadingHint::Straight
    } else if angle < 45.0 {
        if left {
            HeadingHint::SlightLeft
        } else {
            HeadingHint::SlightRight
        }
    } else if angle <= 90.0 {
        if left {
            HeadingHint::Left
        } else {
            HeadingHint::Right
        }
    } else if left {
        HeadingHint::UTurnLeft
    } else {
        HeadingHint::UTurnRight
    }
}

/// Tracks progress across fixes, remembering the last hint so a
/// stationary fix does not reset it.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    last_hint: HeadingHint,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_hint(&self) -> HeadingHint {
        self.last_hint
    }

    /// Process a fix `curr` that followed `prev`, both in degrees.
    ///
    /// Positions are converted with the index's own origin.
    pub fn update(
        &mut self,
        prev: GeoPoint,
        curr: GeoPoint,
        index: &ArcLengthIndex,
    ) -> ProgressState {
        let origin = index.origin();
        let prev_local = to_local(prev, origin);
        let curr_local = to_local(curr, origin);

        let along_m = index.project_distance(curr_local);

        let moved = curr_local.sub(prev_local);
        let moved_len = moved.length();
        if moved_len >= MIN_TRAVEL_M {
            let travel = LocalPoint::new(moved.x / moved_len, moved.y / moved_len);
            if let Some(route) = index.tangent_at(along_m) {
                self.last_hint = classify_heading(travel, route);
            }
        }

        debug!("progress: {along_m:.1} m along route, hint {:?}", self.last_hint);

        ProgressState {
            along_m,
            heading_hint: self.last_hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::to_geo;
    use crate::route::Polyline;

    const ORIGIN: GeoPoint = GeoPoint::new(104.798401, 51.877124);

    fn rotated(v: LocalPoint, degrees: f64) -> LocalPoint {
        let (s, c) = degrees.to_radians().sin_cos();
        LocalPoint::new(v.x * c - v.y * s, v.x * s + v.y * c)
    }

    fn geo(x: f64, y: f64) -> GeoPoint {
        to_geo(LocalPoint::new(x, y), ORIGIN)
    }

    /// Straight route heading north for 100 m.
    fn north_route() -> ArcLengthIndex {
        ArcLengthIndex::new(&Polyline::from(vec![geo(0.0, 0.0), geo(0.0, 100.0)]), ORIGIN)
    }

    #[test]
    fn parallel_is_straight() {
        let v = LocalPoint::new(0.0, 1.0);
        assert_eq!(classify_heading(v, v), HeadingHint::Straight);
        assert_eq!(classify_heading(rotated(v, 9.0), v), HeadingHint::Straight);
    }

    #[test]
    fn veering_left_asks_for_slight_right() {
        let route = LocalPoint::new(0.0, 1.0);
        // Travel rotated 30 degrees counter-clockwise from the route
        assert_eq!(classify_heading(rotated(route, 30.0), route), HeadingHint::SlightRight);
        assert_eq!(classify_heading(rotated(route, -30.0), route), HeadingHint::SlightLeft);
    }

    #[test]
    fn buckets_by_angle() {
        let route = LocalPoint::new(1.0, 0.0);
        assert_eq!(classify_heading(rotated(route, -10.5), route), HeadingHint::SlightLeft);
        assert_eq!(classify_heading(rotated(route, -45.5), route), HeadingHint::Left);
        assert_eq!(classify_heading(rotated(route, 89.0), route), HeadingHint::Right);
        assert_eq!(classify_heading(rotated(route, -120.0), route), HeadingHint::UTurnLeft);
        assert_eq!(classify_heading(rotated(route, 120.0), route), HeadingHint::UTurnRight);
    }

    #[test]
    fn anti_parallel_is_a_u_turn_right() {
        // Zero cross product is not "left"
        let route = LocalPoint::new(0.0, 1.0);
        assert_eq!(classify_heading(LocalPoint::new(0.0, -1.0), route), HeadingHint::UTurnRight);
        let route = LocalPoint::new(1.0, 0.0);
        assert_eq!(classify_heading(LocalPoint::new(-1.0, 0.0), route), HeadingHint::UTurnRight);
    }

    #[test]
    fn right_angle_is_still_a_turn() {
        let route = LocalPoint::new(0.0, 1.0);
        assert_eq!(classify_heading(LocalPoint::new(1.0, 0.0), route), HeadingHint::Left);
        assert_eq!(classify_heading(LocalPoint::new(-1.0, 0.0), route), HeadingHint::Right);
        assert_eq!(classify_heading(rotated(route, 90.1), route), HeadingHint::UTurnRight);
        assert_eq!(classify_heading(rotated(route, -90.1), route), HeadingHint::UTurnLeft);
    }

    #[test]
    fn bucket_edges() {
        let route = LocalPoint::new(0.0, 1.0);
        let cases = [
            (9.9, HeadingHint::Straight),
            (10.1, HeadingHint::SlightRight),
            (-10.1, HeadingHint::SlightLeft),
            (44.9, HeadingHint::SlightRight),
            (-44.9, HeadingHint::SlightLeft),
            (45.1, HeadingHint::Right),
            (-45.1, HeadingHint::Left),
        ];
        for (degrees, expected) in cases {
            let hint = classify_heading(rotated(route, degrees), route);
            assert_eq!(hint, expected, "{degrees} degrees");
        }
    }

    #[test]
    fn update_reports_distance_and_hint() {
        let index = north_route();
        let mut tracker = ProgressTracker::new();

        let state = tracker.update(geo(2.0, 40.0), geo(2.0, 50.0), &index);
        assert!((state.along_m - 50.0).abs() < 1e-3, "got {}", state.along_m);
        assert_eq!(state.heading_hint, HeadingHint::Straight);

        // Walking south along the route
        let state = tracker.update(geo(0.0, 50.0), geo(0.0, 45.0), &index);
        assert!((state.along_m - 45.0).abs() < 1e-3);
        assert!(matches!(
            state.heading_hint,
            HeadingHint::UTurnLeft | HeadingHint::UTurnRight
        ));
    }

    #[test]
    fn stationary_fix_keeps_previous_hint() {
        let index = north_route();
        let mut tracker = ProgressTracker::new();

        // Heading north-east, about 63 degrees off a route going north
        let state = tracker.update(geo(0.0, 25.0), geo(10.0, 30.0), &index);
        assert_eq!(state.heading_hint, HeadingHint::Left);

        let state = tracker.update(geo(10.0, 30.0), geo(10.0, 30.0), &index);
        assert_eq!(state.heading_hint, HeadingHint::Left);
        assert!((state.along_m - 30.0).abs() < 1e-3);
        assert_eq!(tracker.last_hint(), HeadingHint::Left);
    }

    #[test]
    fn degenerate_route_gives_zero_progress() {
        let index = ArcLengthIndex::new(&Polyline::from(vec![ORIGIN]), ORIGIN);
        let mut tracker = ProgressTracker::new();

        let state = tracker.update(geo(0.0, 0.0), geo(5.0, 5.0), &index);
        assert_eq!(state.along_m, 0.0);
        assert_eq!(state.heading_hint, HeadingHint::Straight);
    }

    #[test]
    fn hint_serializes_as_snake_case() {
        let json = serde_json::to_string(&HeadingHint::UTurnLeft).unwrap();
        assert_eq!(json, "\"u_turn_left\"");
    }
}
