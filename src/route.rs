//! Route payload decoding and polyline assembly.
//!
//! The routing service describes a route as an ordered list of maneuvers,
//! each with WKT geometry for the path leading out of it. This module
//! decodes that payload, stitches the geometries into one polyline and
//! extracts one labeled node per maneuver.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::geo::GeoPoint;
use crate::wkt::parse_line_string;

/// One maneuver as consumed by [`build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Maneuver {
    /// Icon/category code, e.g. `turn_left` or `finish`.
    pub icon: Option<String>,
    /// Free-text instruction shown next to the node.
    pub comment: Option<String>,
    /// WKT line-strings of the outgoing path, in order.
    pub geometries: Vec<String>,
}

/// A labeled point anchoring an on-screen marker for one maneuver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManeuverNode {
    pub id: Uuid,
    pub point: GeoPoint,
    pub glyph: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// An ordered path with no two consecutive identical points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than two points: no segment to measure along.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Append a segment. A point equal to the one before it is skipped,
    /// which stitches segments sharing an endpoint without doubling it.
    pub fn append_segment(&mut self, segment: &[GeoPoint]) {
        for p in segment {
            if self.points.last() != Some(p) {
                self.points.push(*p);
            }
        }
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    /// Build from raw points, collapsing consecutive duplicates.
    fn from(mut points: Vec<GeoPoint>) -> Self {
        points.dedup();
        Self { points }
    }
}

/// Map a maneuver icon code to the glyph shown on its marker.
pub fn glyph_for(icon: Option<&str>) -> &'static str {
    match icon.unwrap_or_default() {
        "turn_right" => "↱",
        "turn_left" => "↰",
        "finish" => "●",
        "start" => "◎",
        _ => "⬆",
    }
}

/// Stitch maneuvers into one polyline and extract their nodes.
///
/// Maneuvers without decodable geometry contribute neither points nor a
/// node.
pub fn build(maneuvers: &[Maneuver]) -> (Polyline, Vec<ManeuverNode>) {
    let mut polyline = Polyline::new();
    let mut nodes = Vec::with_capacity(maneuvers.len());

    for (i, maneuver) in maneuvers.iter().enumerate() {
        let mut first_point = None;

        for wkt in &maneuver.geometries {
            let points = parse_line_string(wkt);
            if first_point.is_none() {
                first_point = points.first().copied();
            }
            polyline.append_segment(&points);
        }

        match first_point {
            Some(point) => nodes.push(ManeuverNode {
                id: Uuid::new_v4(),
                point,
                glyph: glyph_for(maneuver.icon.as_deref()).to_string(),
                detail: maneuver.comment.clone(),
            }),
            None => warn!("maneuver {i} has no usable geometry, skipping"),
        }
    }

    info!(
        "built route polyline: {} points, {} maneuver nodes",
        polyline.len(),
        nodes.len()
    );

    (polyline, nodes)
}

/// Pick the frame origin for a route session: the user's position when
/// known, else the start of the route, else the first maneuver node.
pub fn choose_origin(
    user: Option<GeoPoint>,
    polyline: &Polyline,
    nodes: &[ManeuverNode],
) -> Option<GeoPoint> {
    user.or_else(|| polyline.points().first().copied())
        .or_else(|| nodes.first().map(|n| n.point))
}

/// Top-level response of the routing service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub result: Vec<RouteResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResult {
    pub maneuvers: Option<Vec<ManeuverPayload>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManeuverPayload {
    pub comment: Option<String>,
    pub icon: Option<String>,
    pub outcoming_path: Option<PathPayload>,
    pub outcoming_path_comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathPayload {
    pub geometry: Option<Vec<GeometryPayload>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryPayload {
    pub selection: Option<String>,
}

impl RouteResponse {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Maneuvers of the first route alternative. Missing results or
    /// maneuvers give an empty list.
    pub fn maneuvers(&self) -> Vec<Maneuver> {
        self.result
            .first()
            .and_then(|r| r.maneuvers.as_ref())
            .map(|ms| ms.iter().map(Maneuver::from).collect())
            .unwrap_or_default()
    }
}

impl From<&ManeuverPayload> for Maneuver {
    fn from(payload: &ManeuverPayload) -> Self {
        let geometries = payload
            .outcoming_path
            .as_ref()
            .and_then(|path| path.geometry.as_ref())
            .map(|geoms| geoms.iter().filter_map(|g| g.selection.clone()).collect())
            .unwrap_or_default();

        Maneuver {
            icon: payload.icon.clone(),
            comment: payload
                .outcoming_path_comment
                .clone()
                .or_else(|| payload.comment.clone()),
            geometries,
        }
    }
}
