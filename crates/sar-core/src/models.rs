//! Core data models for the search planner.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
///
/// Serializes as a `[lat, lon]` pair so boundaries round-trip through the
/// same JSON shape the drawing layer produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a validated point.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Check latitude/longitude ranges.
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && self.lat.abs() <= 90.0;
        let lon_ok = self.lon.is_finite() && self.lon.abs() <= 180.0;
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(PlannerError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lon]
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Coverage pattern selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPattern {
    /// Boustrophedon sweep clipped to the boundary
    Grid,
    /// Outward rings from a center point
    Spiral,
    /// Per-elevation spirals (no terrain model)
    Contour,
}

/// One planned mission item, handed verbatim to the mission-upload layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub seq: usize,
    pub lat: f64,
    pub lon: f64,
    /// Altitude relative to home, meters
    pub alt: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_time_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_radius_m: Option<f64>,
    /// Contour elevation this waypoint was generated for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour_elevation_m: Option<f64>,
}

impl Waypoint {
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Output of a single planning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPlanResult {
    pub pattern: SearchPattern,
    pub waypoints: Vec<Waypoint>,
    pub waypoint_count: usize,
    /// Non-empty sweep tracks (grid pattern only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<usize>,
    pub total_distance_m: f64,
    pub estimated_duration_s: f64,
    /// Degraded-but-legal conditions hit while planning
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl FlightPlanResult {
    /// An empty plan means the area could not be covered with these settings.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}
