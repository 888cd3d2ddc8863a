//! GPX 1.1 export of a loaded route.
//!
//! Handy for inspecting what the engine made of a routing response in any
//! desktop GPX viewer: the merged polyline becomes a route, maneuver nodes
//! become waypoints and the generated waypoints become a track.

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Route, Track, TrackSegment, Waypoint};

use crate::error::EngineError;
use crate::geo::GeoPoint;
use crate::session::RouteSession;

const CREATOR: &str = "ar-route-core";

/// Serialize a session as a GPX document.
pub fn export(session: &RouteSession) -> Result<String, EngineError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    let mut route = Route {
        name: Some("route".into()),
        ..Default::default()
    };
    route.points = session.polyline.points().iter().map(to_waypoint).collect();
    gpx.routes.push(route);

    for node in &session.nodes {
        let mut waypoint = to_waypoint(&node.point);
        waypoint.name = Some(node.glyph.clone());
        waypoint.description = node.detail.clone();
        gpx.waypoints.push(waypoint);
    }

    if !session.waypoints.is_empty() {
        let mut segment = TrackSegment::new();
        for sample in &session.waypoints {
            let mut waypoint = to_waypoint(&sample.point);
            waypoint.comment = Some(format!("{:.1} m", sample.along_m));
            segment.points.push(waypoint);
        }

        let mut track = Track {
            name: Some("waypoints".into()),
            ..Default::default()
        };
        track.segments.push(segment);
        gpx.tracks.push(track);
    }

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    // The writer only emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn to_waypoint(p: &GeoPoint) -> Waypoint {
    Waypoint::new(Point::new(p.lon, p.lat))
}
