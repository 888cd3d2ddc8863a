//! Geodetic and local planar coordinates.
//!
//! Routes are handled in a local tangent plane around a single origin
//! using an equirectangular approximation. This is accurate for walking
//! routes of a few kilometers; it is not a geodesic and breaks down near
//! the poles where `cos(lat)` approaches zero.

use serde::{Deserialize, Serialize};

/// Meters per degree of latitude (WGS84 mean). Also used for longitude,
/// scaled by the cosine of the origin latitude.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A WGS84 position in degrees. Ranges are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A position in meters east (`x`) and north (`y`) of some origin.
///
/// Only meaningful together with the origin it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn sub(self, other: LocalPoint) -> LocalPoint {
        LocalPoint::new(self.x - other.x, self.y - other.y)
    }

    pub fn dot(self, other: LocalPoint) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 2D cross product `self x other`.
    pub fn cross(self, other: LocalPoint) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Linear interpolation from `self` towards `other`.
    pub fn lerp(self, other: LocalPoint, t: f64) -> LocalPoint {
        LocalPoint::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }
}

/// Project a geodetic point into the local frame of `origin`.
pub fn to_local(p: GeoPoint, origin: GeoPoint) -> LocalPoint {
    let cos_lat = origin.lat.to_radians().cos();
    LocalPoint {
        x: (p.lon - origin.lon) * cos_lat * METERS_PER_DEGREE,
        y: (p.lat - origin.lat) * METERS_PER_DEGREE,
    }
}

/// Inverse of [`to_local`] for the same origin.
pub fn to_geo(p: LocalPoint, origin: GeoPoint) -> GeoPoint {
    let cos_lat = origin.lat.to_radians().cos();
    GeoPoint {
        lon: origin.lon + p.x / (cos_lat * METERS_PER_DEGREE),
        lat: origin.lat + p.y / METERS_PER_DEGREE,
    }
}
