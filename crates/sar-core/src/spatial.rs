//! Spherical-earth geodesy and local planar helpers.
//!
//! Distances, bearings and forward projections all use the same sphere of
//! radius [`EARTH_RADIUS_M`], so `distance(p, destination(p, b, d)) == d`
//! up to floating-point error.

use crate::error::Result;
use crate::models::GeoPoint;

/// Mean earth radius used by every great-circle formula in this crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two validated points.
pub fn distance(p1: GeoPoint, p2: GeoPoint) -> Result<f64> {
    p1.validate()?;
    p2.validate()?;
    Ok(haversine_distance(p1.lat, p1.lon, p2.lat, p2.lon))
}

/// Point reached by travelling `distance_m` from `origin` on an initial
/// bearing of `bearing_deg` (clockwise from true north).
pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> Result<GeoPoint> {
    origin.validate()?;
    let (lat, lon) = offset_by_bearing(
        origin.lat,
        origin.lon,
        distance_m,
        normalize_bearing(bearing_deg).to_radians(),
    );
    Ok(GeoPoint { lat, lon })
}

/// Initial bearing from `p1` to `p2` in degrees, normalized to [0, 360).
pub fn bearing(p1: GeoPoint, p2: GeoPoint) -> Result<f64> {
    p1.validate()?;
    p2.validate()?;
    Ok(normalize_bearing(
        bearing_rad(p1.lat, p1.lon, p2.lat, p2.lon).to_degrees(),
    ))
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Haversine distance in meters between raw degree pairs. No range checks.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial bearing in radians, 0 = north, π/2 = east.
pub fn bearing_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y)
}

/// Forward great-circle projection from (`lat`, `lon`) in degrees.
///
/// Returns `(lat, lon)` in degrees with longitude wrapped to [-180, 180).
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

// ==== Local planar conversion ====
// Latitude-aware meters/degree scaling for small (city/regional) areas.

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Project a point to east/north meters relative to `origin`.
pub fn to_local_xy(point: GeoPoint, origin: GeoPoint) -> (f64, f64) {
    (
        (point.lon - origin.lon) * meters_per_deg_lon(origin.lat),
        (point.lat - origin.lat) * meters_per_deg_lat(origin.lat),
    )
}

/// Segment intersection test on planar coordinates, touching counts.
pub(crate) fn segments_intersect_2d(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> bool {
    // Tolerance in meters on locally-projected coordinates.
    const EPS_M: f64 = 1e-6;

    fn orient(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> f64 {
        (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
    }

    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - EPS_M;
        let max = a.max(b) + EPS_M;
        value >= min && value <= max
    }

    fn on_segment(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> bool {
        within(p.0, q.0, r.0) && within(p.1, q.1, r.1)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= EPS_M && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= EPS_M && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= EPS_M && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= EPS_M && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > EPS_M && o2 < -EPS_M) || (o1 < -EPS_M && o2 > EPS_M);
    let b_crosses = (o3 > EPS_M && o4 < -EPS_M) || (o3 < -EPS_M && o4 > EPS_M);
    a_crosses && b_crosses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint { lat, lon }
    }

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_distance_same_point() {
        let p = pt(33.6846, -117.8265);
        assert_eq!(distance(p, p).unwrap(), 0.0);
    }

    #[test]
    fn distance_rejects_invalid_coordinates() {
        assert!(distance(pt(95.0, 0.0), pt(0.0, 0.0)).is_err());
        assert!(destination(pt(0.0, 200.0), 0.0, 10.0).is_err());
        assert!(bearing(pt(0.0, 0.0), pt(-90.5, 0.0)).is_err());
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = pt(0.0, 0.0);
        assert!(bearing(origin, pt(1.0, 0.0)).unwrap().abs() < 1e-9);
        assert!((bearing(origin, pt(0.0, 1.0)).unwrap() - 90.0).abs() < 1e-9);
        assert!((bearing(origin, pt(-1.0, 0.0)).unwrap() - 180.0).abs() < 1e-9);
        assert!((bearing(origin, pt(0.0, -1.0)).unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_bearing_wraps_into_range() {
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(725.0), 5.0);
        assert_eq!(normalize_bearing(-1e-17), 0.0);
    }

    #[test]
    fn destination_due_east_on_equator() {
        let dest = destination(pt(0.0, 0.0), 90.0, 1_000.0).unwrap();
        assert!(dest.lat.abs() < 1e-9);
        assert!((haversine_distance(0.0, 0.0, dest.lat, dest.lon) - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn destination_wraps_antimeridian() {
        let dest = destination(pt(0.0, 179.9999), 90.0, 1_000.0).unwrap();
        assert!(dest.lon < -179.0);
    }

    #[test]
    fn local_xy_scales_longitude_by_latitude() {
        let origin = pt(60.0, 10.0);
        let (x, y) = to_local_xy(pt(60.0, 10.01), origin);
        assert!(y.abs() < 1e-9);
        // cos(60) halves the longitude scale
        assert!((x - 557.0).abs() < 5.0);
    }

    #[test]
    fn segments_intersect_detects_crossing_and_touching() {
        assert!(segments_intersect_2d((0.0, 0.0), (10.0, 10.0), (0.0, 10.0), (10.0, 0.0)));
        assert!(segments_intersect_2d((0.0, 0.0), (10.0, 0.0), (10.0, 0.0), (10.0, 5.0)));
        assert!(!segments_intersect_2d((0.0, 0.0), (10.0, 0.0), (0.0, 1.0), (10.0, 1.0)));
    }
}
