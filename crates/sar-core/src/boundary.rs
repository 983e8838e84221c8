//! Search-area polygon and the planar predicates the pattern generators use.
//!
//! Containment and clipping treat (lon, lat) degrees as a flat plane. That is
//! accurate enough for city or regional search areas, but it breaks down near
//! the poles and for rings that cross the antimeridian; neither case is
//! handled. Metric quantities (area, cut lengths) go through a local
//! east/north projection centred on the bounding box.

use crate::error::{PlannerError, Result};
use crate::models::GeoPoint;
use crate::spatial::{
    haversine_distance, offset_by_bearing, segments_intersect_2d, to_local_xy,
};
use serde::{Deserialize, Serialize};

/// Points within this many degrees of an edge count as inside (~0.1 mm).
pub const EDGE_TOLERANCE_DEG: f64 = 1e-9;

/// Rings enclosing less than this many square meters are degenerate.
const MIN_AREA_M2: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lon: (self.min_lon + self.max_lon) / 2.0,
        }
    }

    /// North-south extent in meters, measured along the center meridian.
    pub fn height_m(&self) -> f64 {
        let mid_lon = (self.min_lon + self.max_lon) / 2.0;
        haversine_distance(self.min_lat, mid_lon, self.max_lat, mid_lon)
    }

    /// East-west extent in meters, measured along the center parallel.
    pub fn width_m(&self) -> f64 {
        let mid_lat = (self.min_lat + self.max_lat) / 2.0;
        haversine_distance(mid_lat, self.min_lon, mid_lat, self.max_lon)
    }
}

/// Direction the parallel sweep tracks run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Tracks run east-west, stacked north-south
    Horizontal,
    /// Tracks run north-south, stacked east-west
    Vertical,
}

/// Straight line between two points in the (lon, lat) plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl LineSegment {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    pub fn length_m(&self) -> f64 {
        haversine_distance(self.start.lat, self.start.lon, self.end.lat, self.end.lon)
    }

    /// Point at fraction `t` of the way from start to end.
    pub fn interpolate(&self, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.start.lat + (self.end.lat - self.start.lat) * t,
            lon: self.start.lon + (self.end.lon - self.start.lon) * t,
        }
    }
}

/// A validated simple polygon. The ring is implicitly closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct Boundary {
    vertices: Vec<GeoPoint>,
}

impl Boundary {
    /// Validate and build a boundary.
    ///
    /// A trailing vertex equal to the first is dropped, as are consecutive
    /// duplicates. Fails with `InvalidCoordinate` for out-of-range points and
    /// `InvalidBoundary` for fewer than 3 distinct vertices, zero area, or a
    /// self-intersecting ring.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        for point in &points {
            point.validate()?;
        }

        let mut vertices: Vec<GeoPoint> = Vec::with_capacity(points.len());
        for point in points {
            if vertices.last() != Some(&point) {
                vertices.push(point);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(PlannerError::InvalidBoundary(format!(
                "need at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }

        let boundary = Self { vertices };
        if let Some((i, j)) = boundary.first_self_intersection() {
            return Err(PlannerError::InvalidBoundary(format!(
                "edges {i} and {j} intersect"
            )));
        }
        let area = boundary.area_m2();
        if !(area >= MIN_AREA_M2) {
            return Err(PlannerError::InvalidBoundary(format!(
                "ring encloses no area ({area} m²)"
            )));
        }
        Ok(boundary)
    }

    /// Parse a JSON array of `[lat, lon]` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let points: Vec<GeoPoint> = serde_json::from_str(json).map_err(|err| {
            PlannerError::InvalidBoundary(format!("malformed boundary: {err}"))
        })?;
        Self::new(points)
    }

    /// Approximate a circle with a regular polygon of `segments` vertices.
    pub fn circle(center: GeoPoint, radius_m: f64, segments: usize) -> Result<Self> {
        center.validate()?;
        if !(radius_m > 0.0 && radius_m.is_finite()) {
            return Err(PlannerError::InvalidParameter(format!(
                "circle radius = {radius_m} must be > 0"
            )));
        }
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let bearing = std::f64::consts::TAU * i as f64 / segments as f64;
                let (lat, lon) = offset_by_bearing(center.lat, center.lon, radius_m, bearing);
                GeoPoint { lat, lon }
            })
            .collect();
        Self::new(points)
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_lat: f64::INFINITY,
            min_lon: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for v in &self.vertices {
            bbox.min_lat = bbox.min_lat.min(v.lat);
            bbox.min_lon = bbox.min_lon.min(v.lon);
            bbox.max_lat = bbox.max_lat.max(v.lat);
            bbox.max_lon = bbox.max_lon.max(v.lon);
        }
        bbox
    }

    fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Enclosed area in square meters (shoelace on the local projection).
    pub fn area_m2(&self) -> f64 {
        let origin = self.bounding_box().center();
        let twice: f64 = self
            .edges()
            .map(|(a, b)| {
                let (ax, ay) = to_local_xy(a, origin);
                let (bx, by) = to_local_xy(b, origin);
                ax * by - bx * ay
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Area-weighted centroid in the (lon, lat) plane.
    pub fn centroid(&self) -> GeoPoint {
        // Shift to the first vertex to keep the cross products well conditioned.
        let base = self.vertices[0];
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let (ax, ay) = (a.lon - base.lon, a.lat - base.lat);
            let (bx, by) = (b.lon - base.lon, b.lat - base.lat);
            let cross = ax * by - bx * ay;
            twice_area += cross;
            cx += (ax + bx) * cross;
            cy += (ay + by) * cross;
        }
        if twice_area.abs() <= f64::EPSILON * f64::EPSILON {
            let n = self.vertices.len() as f64;
            return GeoPoint {
                lat: self.vertices.iter().map(|v| v.lat).sum::<f64>() / n,
                lon: self.vertices.iter().map(|v| v.lon).sum::<f64>() / n,
            };
        }
        GeoPoint {
            lat: base.lat + cy / (3.0 * twice_area),
            lon: base.lon + cx / (3.0 * twice_area),
        }
    }

    /// Largest great-circle distance from `point` to any vertex.
    pub fn max_distance_from(&self, point: GeoPoint) -> f64 {
        self.vertices
            .iter()
            .map(|v| haversine_distance(point.lat, point.lon, v.lat, v.lon))
            .fold(0.0, f64::max)
    }

    /// Point-in-polygon test.
    ///
    /// Points within [`EDGE_TOLERANCE_DEG`] of an edge are inside, so the
    /// endpoints produced by [`Boundary::clip_line`] always pass. Everything
    /// else goes through even-odd ray casting.
    pub fn contains(&self, point: GeoPoint) -> bool {
        if self
            .edges()
            .any(|(a, b)| planar_distance_to_segment(point, a, b) <= EDGE_TOLERANCE_DEG)
        {
            return true;
        }

        let (lat, lon) = (point.lat, point.lon);
        let mut inside = false;
        for (a, b) in self.edges() {
            let (yi, xi) = (a.lat, a.lon);
            let (yj, xj) = (b.lat, b.lon);
            if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
        }
        inside
    }

    /// Portions of `probe` that lie inside the closed polygon, ordered from
    /// the probe's start towards its end.
    ///
    /// Scanline rule: an edge crosses the probe's supporting line when its
    /// endpoints fall on different sides, with points exactly on the line
    /// counted as the non-positive side. Sorted crossings pair up into
    /// interior intervals. Edges lying on the line (within
    /// [`EDGE_TOLERANCE_DEG`]) add their own interval, so a probe along any
    /// edge returns that edge. Touching intervals are merged, zero-length ones
    /// (a probe grazing a single vertex) are dropped, and the rest are trimmed
    /// to the probe's extent. Concave rings yield one segment per interval.
    pub fn clip_line(&self, probe: &LineSegment) -> Vec<LineSegment> {
        let (ax, ay) = (probe.start.lon, probe.start.lat);
        let (dx, dy) = (probe.end.lon - ax, probe.end.lat - ay);
        let len2 = dx * dx + dy * dy;
        if len2 <= 0.0 {
            return Vec::new();
        }
        let len = len2.sqrt();
        // side() is the probe length times the signed offset from the line
        let on_line = EDGE_TOLERANCE_DEG * len;
        let t_tolerance = EDGE_TOLERANCE_DEG / len;

        let side = |p: GeoPoint| dx * (p.lat - ay) - dy * (p.lon - ax);
        let project = |lon: f64, lat: f64| ((lon - ax) * dx + (lat - ay) * dy) / len2;

        let mut crossings = Vec::new();
        let mut intervals = Vec::new();
        for (p, q) in self.edges() {
            let (sp, sq) = (side(p), side(q));
            if sp.abs() <= on_line && sq.abs() <= on_line {
                let (tp, tq) = (project(p.lon, p.lat), project(q.lon, q.lat));
                intervals.push((tp.min(tq), tp.max(tq)));
            }
            if (sp > 0.0) != (sq > 0.0) {
                let t = sp / (sp - sq);
                crossings.push(project(
                    p.lon + (q.lon - p.lon) * t,
                    p.lat + (q.lat - p.lat) * t,
                ));
            }
        }
        crossings.sort_by(f64::total_cmp);
        intervals.extend(crossings.chunks_exact(2).map(|pair| (pair[0], pair[1])));
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(intervals.len());
        for (lo, hi) in intervals {
            let (lo, hi) = (lo.max(0.0), hi.min(1.0));
            if hi < lo {
                continue;
            }
            match merged.last_mut() {
                Some(last) if lo <= last.1 + t_tolerance => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }

        merged
            .into_iter()
            .filter(|(lo, hi)| hi - lo > t_tolerance)
            .map(|(lo, hi)| LineSegment::new(probe.interpolate(lo), probe.interpolate(hi)))
            .collect()
    }

    /// Total length in meters of `probe` that lies inside the polygon.
    pub fn clipped_length_m(&self, probe: &LineSegment) -> f64 {
        self.clip_line(probe).iter().map(LineSegment::length_m).sum()
    }

    /// Pick the sweep direction with the fewest turns.
    ///
    /// Cuts the polygon along the horizontal and the vertical mid-line of its
    /// bounding box and runs tracks parallel to whichever cut is longer.
    /// Ties go to [`Orientation::Horizontal`].
    pub fn orientation_hint(&self) -> Orientation {
        let bbox = self.bounding_box();
        let mid = bbox.center();
        let horizontal = LineSegment::new(
            GeoPoint { lat: mid.lat, lon: bbox.min_lon },
            GeoPoint { lat: mid.lat, lon: bbox.max_lon },
        );
        let vertical = LineSegment::new(
            GeoPoint { lat: bbox.min_lat, lon: mid.lon },
            GeoPoint { lat: bbox.max_lat, lon: mid.lon },
        );
        if self.clipped_length_m(&horizontal) >= self.clipped_length_m(&vertical) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    fn first_self_intersection(&self) -> Option<(usize, usize)> {
        let origin = self.bounding_box().center();
        let projected: Vec<((f64, f64), (f64, f64))> = self
            .edges()
            .map(|(a, b)| (to_local_xy(a, origin), to_local_xy(b, origin)))
            .collect();
        let n = projected.len();
        for i in 0..n {
            for j in (i + 2)..n {
                // first and last edges share vertex 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (a1, a2) = projected[i];
                let (b1, b2) = projected[j];
                if segments_intersect_2d(a1, a2, b1, b2) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

impl TryFrom<Vec<GeoPoint>> for Boundary {
    type Error = PlannerError;

    fn try_from(points: Vec<GeoPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Boundary> for Vec<GeoPoint> {
    fn from(boundary: Boundary) -> Self {
        boundary.vertices
    }
}

fn planar_distance_to_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let (sx, sy) = (b.lon - a.lon, b.lat - a.lat);
    let (px, py) = (p.lon - a.lon, p.lat - a.lat);
    let len2 = sx * sx + sy * sy;
    let t = if len2 > 0.0 {
        ((px * sx + py * sy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (px - t * sx, py - t * sy);
    (dx * dx + dy * dy).sqrt()
}
