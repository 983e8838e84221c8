//! Path length and flight-time estimation.

use crate::error::{PlannerError, Result};
use crate::models::{GeoPoint, Waypoint};
use crate::spatial::{distance, haversine_distance};

/// Anything with a horizontal position.
pub trait Positioned {
    fn position(&self) -> GeoPoint;
}

impl Positioned for GeoPoint {
    fn position(&self) -> GeoPoint {
        *self
    }
}

impl Positioned for Waypoint {
    fn position(&self) -> GeoPoint {
        Waypoint::position(self)
    }
}

/// Sum of great-circle leg lengths in meters. Coordinates are not checked;
/// use [`estimate_duration`] for caller-supplied paths.
pub fn path_length_m<P: Positioned>(points: &[P]) -> f64 {
    points
        .windows(2)
        .map(|leg| {
            let (a, b) = (leg[0].position(), leg[1].position());
            haversine_distance(a.lat, a.lon, b.lat, b.lon)
        })
        .sum()
}

/// Seconds to fly `points` in order at a constant `speed_mps`.
///
/// Every point must be a valid coordinate. Climb, turns and hold times are
/// not modelled.
pub fn estimate_duration<P: Positioned>(points: &[P], speed_mps: f64) -> Result<f64> {
    if !(speed_mps > 0.0 && speed_mps.is_finite()) {
        return Err(PlannerError::InvalidParameter(format!(
            "speed = {speed_mps} must be > 0"
        )));
    }
    let mut total_m = 0.0;
    for leg in points.windows(2) {
        total_m += distance(leg[0].position(), leg[1].position())?;
    }
    if let [only] = points {
        only.position().validate()?;
    }
    Ok(total_m / speed_mps)
}
