//! Spherical-earth distance helpers shared by the grid and water code.
//!
//! All row/column and buffer math goes through great-circle distances so
//! cell sizing stays uniform at any latitude. Naive degree arithmetic is
//! only used to step the lattice, with step sizes derived from these
//! helpers.

use std::f64::consts::PI;

use geo::{HaversineBearing, HaversineDistance, LineString, Point};

/// IUGG mean earth radius, matching the sphere the haversine math uses.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6_371.0088;

/// Great-circle length of one degree of latitude. Constant on the sphere.
pub fn km_per_degree_lat() -> f64 {
    MEAN_EARTH_RADIUS_KM * PI / 180.0
}

/// Great-circle length of one degree of longitude at the given latitude.
pub fn km_per_degree_lng(lat_deg: f64) -> f64 {
    km_per_degree_lat() * lat_deg.to_radians().cos()
}

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    a.haversine_distance(&b) / 1_000.0
}

/// Minimum great-circle distance from a point to any segment of a
/// polyline, in kilometers.
pub fn point_polyline_distance_km(p: Point<f64>, line: &LineString<f64>) -> f64 {
    let mut best = f64::INFINITY;
    for segment in line.lines() {
        let d = point_segment_distance_km(p, segment.start.into(), segment.end.into());
        if d < best {
            best = d;
        }
    }
    best
}

/// Cross-track distance from `p` to the great-circle segment `a`..`b`,
/// clamped to the segment endpoints when the projection falls outside it.
fn point_segment_distance_km(p: Point<f64>, a: Point<f64>, b: Point<f64>) -> f64 {
    let d_ap = haversine_km(a, p);
    if d_ap == 0.0 {
        return 0.0;
    }
    let d_ab = haversine_km(a, b);
    if d_ab == 0.0 {
        // degenerate segment, fall back to point distance
        return d_ap;
    }

    let bearing_ap = a.haversine_bearing(p).to_radians();
    let bearing_ab = a.haversine_bearing(b).to_radians();
    let delta = bearing_ap - bearing_ab;

    // Projection falls behind the segment start.
    if delta.cos() <= 0.0 {
        return d_ap;
    }

    let angular_ap = d_ap / MEAN_EARTH_RADIUS_KM;
    let cross_track = (angular_ap.sin() * delta.sin()).asin();
    let along_track =
        (angular_ap.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos() * MEAN_EARTH_RADIUS_KM;

    if along_track > d_ab {
        haversine_km(b, p)
    } else {
        (cross_track * MEAN_EARTH_RADIUS_KM).abs()
    }
}
