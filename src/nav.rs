//! Arc-length parameterization of a route polyline.
//!
//! The index is built once per route in the local frame of the route's
//! origin and never mutated afterwards. A new route gets a new index.

use crate::geo::{to_local, GeoPoint, LocalPoint};
use crate::route::Polyline;

/// Segments shorter than this are treated as this long when interpolating.
const MIN_SEGMENT_LENGTH: f64 = 1e-6;
/// Floor for squared segment length when projecting.
const MIN_SEGMENT_LENGTH_SQ: f64 = 1e-12;

/// Result of projecting a local point onto the indexed polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Nearest point on the polyline.
    pub point: LocalPoint,
    /// Index of the segment end point (segment runs `segment - 1 .. segment`).
    pub segment: usize,
    /// Squared distance from the query point to `point`.
    pub distance_sq: f64,
    /// Distance along the polyline from its start to `point`, in meters.
    pub along_m: f64,
}

#[derive(Debug, Clone)]
pub struct ArcLengthIndex {
    origin: GeoPoint,
    points: Vec<LocalPoint>,
    /// `cum[i]` is the path length from `points[0]` to `points[i]`.
    cum: Vec<f64>,
}

impl ArcLengthIndex {
    pub fn new(polyline: &Polyline, origin: GeoPoint) -> Self {
        let points = polyline
            .points()
            .iter()
            .map(|p| to_local(*p, origin))
            .collect();
        Self::from_local(points, origin)
    }

    fn from_local(points: Vec<LocalPoint>, origin: GeoPoint) -> Self {
        let mut cum = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += p.sub(points[i - 1]).length();
            }
            cum.push(total);
        }

        Self { origin, points, cum }
    }

    /// The origin every local point of this index is relative to.
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn points(&self) -> &[LocalPoint] {
        &self.points
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cum
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Total path length in meters.
    pub fn total_length(&self) -> f64 {
        self.cum.last().copied().unwrap_or(0.0)
    }

    /// Index `i >= 1` of the segment `points[i-1] .. points[i]` that
    /// contains distance `d`, preferring the earliest such segment.
    ///
    /// Only meaningful for non-degenerate indexes.
    fn segment_containing(&self, d: f64) -> usize {
        self.cum
            .partition_point(|&c| c < d)
            .clamp(1, self.points.len() - 1)
    }

    /// The point `d` meters along the route, clamped to its ends.
    pub fn point_at_distance(&self, d: f64) -> LocalPoint {
        match self.points.as_slice() {
            [] => return LocalPoint::default(),
            [only] => return *only,
            _ => {}
        }

        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if d.is_nan() || d <= 0.0 {
            return first;
        }
        if d >= self.total_length() {
            return last;
        }

        let i = self.segment_containing(d);
        let seg_len = (self.cum[i] - self.cum[i - 1]).max(MIN_SEGMENT_LENGTH);
        let t = ((d - self.cum[i - 1]) / seg_len).clamp(0.0, 1.0);
        self.points[i - 1].lerp(self.points[i], t)
    }

    /// Project `p` onto the nearest segment. Ties keep the lowest segment.
    ///
    /// Returns None for degenerate indexes.
    pub fn project(&self, p: LocalPoint) -> Option<Projection> {
        let mut best: Option<Projection> = None;

        for (i, seg) in self.points.windows(2).enumerate() {
            let a = seg[0];
            let b = seg[1];
            let ab = b.sub(a);
            let len_sq = ab.dot(ab).max(MIN_SEGMENT_LENGTH_SQ);

            // Clamp parameter t to [0, 1] to stay on the segment
            let t = (p.sub(a).dot(ab) / len_sq).clamp(0.0, 1.0);
            let foot = a.lerp(b, t);
            let distance_sq = p.sub(foot).dot(p.sub(foot));

            let is_better = match &best {
                Some(prev) => distance_sq < prev.distance_sq,
                None => true,
            };

            if is_better {
                best = Some(Projection {
                    point: foot,
                    segment: i + 1,
                    distance_sq,
                    along_m: self.cum[i] + t * ab.length(),
                });
            }
        }

        best
    }

    /// Along-route distance of the point of the route nearest to `p`.
    /// Zero for degenerate indexes.
    pub fn project_distance(&self, p: LocalPoint) -> f64 {
        self.project(p).map_or(0.0, |proj| proj.along_m)
    }

    /// Unit direction of travel along the route at distance `d`.
    ///
    /// Zero-length segments have no direction; the nearest following
    /// segment with a length is used instead, then the nearest preceding
    /// one. None if the route has no extent at all.
    pub fn tangent_at(&self, d: f64) -> Option<LocalPoint> {
        if self.is_degenerate() {
            return None;
        }

        let i = self.segment_containing(d);
        let direction = |j: usize| {
            let v = self.points[j].sub(self.points[j - 1]);
            let len = v.length();
            (len >= MIN_SEGMENT_LENGTH).then(|| LocalPoint::new(v.x / len, v.y / len))
        };

        (i..self.points.len())
            .find_map(direction)
            .or_else(|| (1..i).rev().find_map(direction))
    }
}
