//! Expanding-ring search around a center point.

use crate::boundary::Boundary;
use crate::coverage::CoverageModel;
use crate::error::{PlannerError, Result};
use crate::models::GeoPoint;
use crate::spatial::offset_by_bearing;

/// Widest angular step on any ring, so inner rings still get 8 points.
pub const MAX_ANGLE_STEP_DEG: f64 = 45.0;

/// Candidate points generated before the walk gives up.
pub const MAX_SPIRAL_CANDIDATES: usize = 50_000;

/// Region a spiral search should cover.
#[derive(Debug, Clone, Copy)]
pub enum SpiralArea<'a> {
    /// Explicit center and radius; every candidate is kept
    Circle { center: GeoPoint, radius_m: f64 },
    /// Centroid of the boundary out to its farthest vertex, clipped to it
    Boundary(&'a Boundary),
}

impl SpiralArea<'_> {
    pub fn center(&self) -> GeoPoint {
        match self {
            SpiralArea::Circle { center, .. } => *center,
            SpiralArea::Boundary(boundary) => boundary.centroid(),
        }
    }

    pub fn radius_m(&self) -> f64 {
        match self {
            SpiralArea::Circle { radius_m, .. } => *radius_m,
            SpiralArea::Boundary(boundary) => boundary.max_distance_from(boundary.centroid()),
        }
    }

    fn filter(&self) -> Option<&Boundary> {
        match self {
            SpiralArea::Circle { .. } => None,
            SpiralArea::Boundary(boundary) => Some(boundary),
        }
    }

    fn validate(&self) -> Result<()> {
        if let SpiralArea::Circle { center, radius_m } = self {
            center.validate()?;
            if !(*radius_m > 0.0 && radius_m.is_finite()) {
                return Err(PlannerError::InvalidParameter(format!(
                    "spiral radius = {radius_m} must be > 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SpiralWalk {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub points: Vec<GeoPoint>,
    pub rings: usize,
    pub warnings: Vec<String>,
}

/// Walk outward from the center one ring at a time.
///
/// Rings are one track spacing apart. Along a ring, points sit one waypoint
/// spacing of arc apart (`step = spacing / radius`, using the clamped
/// along-track spacing rather than `min_waypoint_spacing`), capped at
/// [`MAX_ANGLE_STEP_DEG`]; each ring is divided into whole steps so it
/// closes at north. The walk stops before the first ring beyond the area's
/// radius. With a boundary, candidates outside it are dropped.
pub fn plan_spiral(area: SpiralArea<'_>, coverage: &CoverageModel) -> Result<SpiralWalk> {
    area.validate()?;
    let center = area.center();
    let max_radius = area.radius_m();
    let filter = area.filter();
    let keep = |p: GeoPoint| filter.map_or(true, |b| b.contains(p));

    let mut points = Vec::new();
    let mut warnings = Vec::new();
    let mut candidates = 1usize;
    if keep(center) {
        points.push(center);
    }

    let ring_spacing = coverage.track_spacing_m;
    let mut rings = 0usize;
    let mut radius = ring_spacing;
    'rings: while radius <= max_radius {
        let step_deg = (coverage.waypoint_spacing_m / radius)
            .to_degrees()
            .min(MAX_ANGLE_STEP_DEG);
        let steps = (360.0 / step_deg).ceil() as usize;
        for k in 0..steps {
            if candidates >= MAX_SPIRAL_CANDIDATES {
                warnings.push(format!(
                    "spiral truncated at {MAX_SPIRAL_CANDIDATES} candidates, \
                     radius {radius:.0} m of {max_radius:.0} m"
                ));
                break 'rings;
            }
            candidates += 1;
            let bearing = std::f64::consts::TAU * k as f64 / steps as f64;
            let (lat, lon) = offset_by_bearing(center.lat, center.lon, radius, bearing);
            let p = GeoPoint { lat, lon };
            if keep(p) {
                points.push(p);
            }
        }
        rings += 1;
        radius += ring_spacing;
    }

    if rings == 0 {
        warnings.push(format!(
            "search radius {max_radius:.1} m is inside the first {ring_spacing:.1} m ring; \
             only the center is flown"
        ));
    }

    Ok(SpiralWalk {
        center,
        radius_m: max_radius,
        points,
        rings,
        warnings,
    })
}
