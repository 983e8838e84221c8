//! Camera footprint and pass-spacing model.

use crate::error::{PlannerError, Result};
use crate::params::PlannerParameters;

/// Ground rectangle seen by the camera, meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Cross-track extent (horizontal FOV)
    pub width_m: f64,
    /// Along-track extent (vertical FOV)
    pub height_m: f64,
}

impl Footprint {
    pub fn is_empty(&self) -> bool {
        !(self.width_m > 0.0 && self.height_m > 0.0)
    }
}

/// Ground footprint for a camera tilted `camera_angle` degrees below the
/// horizon at `altitude` meters.
///
/// Slant range to the ground is `altitude / sin(camera_angle)`. A camera at
/// or above the horizon sees no ground and yields a zero footprint; callers
/// must treat that as a configuration error.
pub fn ground_footprint(altitude: f64, fov_h: f64, fov_v: f64, camera_angle: f64) -> Footprint {
    if camera_angle <= 0.0 {
        return Footprint {
            width_m: 0.0,
            height_m: 0.0,
        };
    }

    let effective_distance = altitude / camera_angle.to_radians().sin();
    Footprint {
        width_m: 2.0 * effective_distance * (fov_h.to_radians() / 2.0).tan(),
        height_m: 2.0 * effective_distance * (fov_v.to_radians() / 2.0).tan(),
    }
}

/// Distance between adjacent passes for a given footprint extent and overlap.
pub fn track_spacing(footprint_cross_track: f64, overlap_percent: f64) -> Result<f64> {
    if !(0.0..100.0).contains(&overlap_percent) {
        return Err(PlannerError::InvalidParameter(format!(
            "overlap = {overlap_percent} must be in [0, 100)"
        )));
    }
    let spacing = footprint_cross_track * (1.0 - overlap_percent / 100.0);
    if spacing > 0.0 && spacing.is_finite() {
        Ok(spacing)
    } else {
        Err(PlannerError::NoCoverage(format!(
            "pass spacing {spacing} m from footprint {footprint_cross_track} m"
        )))
    }
}

/// Resolved spacings shared by every pattern generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageModel {
    pub footprint: Footprint,
    /// Distance between parallel tracks (or spiral rings)
    pub track_spacing_m: f64,
    /// Distance between consecutive waypoints on one pass
    pub waypoint_spacing_m: f64,
}

impl CoverageModel {
    /// Build from already validated parameters.
    pub fn from_params(params: &PlannerParameters) -> Result<Self> {
        let footprint = ground_footprint(
            params.altitude,
            params.camera_fov_horizontal,
            params.camera_fov_vertical,
            params.camera_angle,
        );
        if footprint.is_empty() {
            return Err(PlannerError::NoCoverage(format!(
                "camera_angle = {} gives no ground footprint",
                params.camera_angle
            )));
        }

        let track_spacing_m = track_spacing(footprint.width_m, params.side_overlap)?;
        let waypoint_spacing_m = track_spacing(footprint.height_m, params.front_overlap)?
            .clamp(params.min_waypoint_spacing, params.max_waypoint_spacing);

        Ok(Self {
            footprint,
            track_spacing_m,
            waypoint_spacing_m,
        })
    }
}
