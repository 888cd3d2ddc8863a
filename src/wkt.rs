//! Best-effort decoder for WKT `LINESTRING(lon lat, ...)` geometries.
//!
//! Route services occasionally return vertices we cannot read. Those are
//! dropped one by one; an input that is not a line-string at all decodes
//! to an empty list. Nothing here fails.

use log::warn;

use crate::geo::GeoPoint;

const KEYWORD: &str = "LINESTRING";

/// Decode a WKT line-string into points, in path order.
pub fn parse_line_string(wkt: &str) -> Vec<GeoPoint> {
    let Some(body) = body(wkt) else {
        return Vec::new();
    };

    let mut skipped = 0usize;
    let points: Vec<GeoPoint> = body
        .split(',')
        .filter_map(|group| {
            let vertex = parse_vertex(group);
            if vertex.is_none() {
                skipped += 1;
            }
            vertex
        })
        .collect();

    if skipped > 0 {
        warn!("dropped {skipped} malformed vertices from line-string");
    }

    points
}

/// The text between the outer parentheses, if `wkt` is shaped like
/// `LINESTRING ( ... )`.
fn body(wkt: &str) -> Option<&str> {
    let trimmed = wkt.trim();
    let head = trimmed.get(..KEYWORD.len())?;
    if !head.eq_ignore_ascii_case(KEYWORD) {
        return None;
    }

    let rest = trimmed[KEYWORD.len()..].trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;

    // Nested or stray parentheses mean this is not a plain line-string.
    if inner.contains(['(', ')']) {
        return None;
    }

    Some(inner)
}

/// Parse one `lon lat` group. Exactly two finite numbers are required.
fn parse_vertex(group: &str) -> Option<GeoPoint> {
    let mut tokens = group.split_whitespace();
    let lon: f64 = tokens.next()?.parse().ok()?;
    let lat: f64 = tokens.next()?.parse().ok()?;

    if tokens.next().is_some() || !lon.is_finite() || !lat.is_finite() {
        return None;
    }

    Some(GeoPoint { lon, lat })
}
