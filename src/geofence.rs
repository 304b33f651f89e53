//! Geofence evaluation: containment tests and severity resolution.
//!
//! All functions here are pure over in-memory values. Regions reaching this
//! module have already passed construction-time validation in `model`, so no
//! defensive geometry checks are repeated here.
//!
//! Circle containment uses great-circle (haversine) distance on a spherical
//! earth. Euclidean distance on raw degrees is deliberately not used: one
//! degree of longitude shrinks with latitude, so a flat-plane check would
//! silently misjudge radii away from the equator.
//!
//! Polygon containment runs a bounding-box pre-filter and then an exact
//! ray-casting test. Points lying on a polygon edge or vertex count as
//! contained (boundary-inclusive, matching the circle rule).

use crate::model::{HazardRegion, Point, RegionKind, Severity};

/// Mean earth radius in meters, spherical approximation.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Tolerance for the point-on-edge test, in degrees. At coastal latitudes
/// 1e-9 degrees is well under a millimeter.
const EDGE_EPSILON_DEG: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Haversine great-circle distance between two points, in meters.
pub fn haversine_m(a: Point, b: Point) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_M * c
}

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

/// Returns `true` if `point` lies inside `region` (boundary-inclusive).
pub fn region_contains(region: &HazardRegion, point: Point) -> bool {
    match region.kind() {
        RegionKind::Circle { center, radius_m } => {
            // Inclusive: a point exactly on the radius is contained.
            haversine_m(point, *center) <= *radius_m
        }
        RegionKind::Polygon { vertices } => {
            bbox_contains(vertices, point) && point_in_polygon(vertices, point)
        }
    }
}

/// Cheap axis-aligned bounding-box pre-filter over the vertex ring.
///
/// Inclusive on all sides so it can never reject a point the exact test
/// would accept. This is a pre-filter only; it is never the final answer.
fn bbox_contains(vertices: &[Point], p: Point) -> bool {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lng = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;
    for v in vertices {
        min_lat = min_lat.min(v.lat);
        max_lat = max_lat.max(v.lat);
        min_lng = min_lng.min(v.lng);
        max_lng = max_lng.max(v.lng);
    }
    p.lat >= min_lat && p.lat <= max_lat && p.lng >= min_lng && p.lng <= max_lng
}

/// Exact even-odd ray-casting test over the implicitly-closed ring, with a
/// boundary check first so edge and vertex hits are always contained.
///
/// The test runs in plain lat/lng coordinates, which is adequate for the
/// region sizes this service handles (tens of kilometers, far from the
/// poles and the antimeridian).
fn point_in_polygon(vertices: &[Point], p: Point) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[j];
        let b = vertices[i];
        if on_segment(p, a, b) {
            return true;
        }
        let crosses = (b.lat > p.lat) != (a.lat > p.lat)
            && p.lng < (a.lng - b.lng) * (p.lat - b.lat) / (a.lat - b.lat) + b.lng;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Returns `true` if `p` lies on the segment from `a` to `b`, within
/// `EDGE_EPSILON_DEG`.
fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    if cross.abs() > EDGE_EPSILON_DEG {
        return false;
    }
    p.lat >= a.lat.min(b.lat) - EDGE_EPSILON_DEG
        && p.lat <= a.lat.max(b.lat) + EDGE_EPSILON_DEG
        && p.lng >= a.lng.min(b.lng) - EDGE_EPSILON_DEG
        && p.lng <= a.lng.max(b.lng) + EDGE_EPSILON_DEG
}

// ---------------------------------------------------------------------------
// Severity resolution
// ---------------------------------------------------------------------------

/// Resolves the highest severity applicable at `point` across `zones`.
///
/// Returns `None` when the point is contained in no region, and always
/// `None` for an absent point (an observer without a known location has no
/// active threat, which is a normal outcome rather than an error).
pub fn severity_at<'a, I>(point: Option<Point>, zones: I) -> Option<Severity>
where
    I: IntoIterator<Item = (&'a HazardRegion, Severity)>,
{
    let p = point?;
    zones
        .into_iter()
        .filter(|(region, _)| region_contains(region, p))
        .map(|(_, severity)| severity)
        .max()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
