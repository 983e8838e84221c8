//! Planning entry points.
//!
//! Every call validates its inputs up front, runs one pattern generator and
//! returns a fresh [`FlightPlanResult`]. The planner holds only its immutable
//! default parameters, so one instance can be shared freely.

use crate::boundary::Boundary;
use crate::contour::plan_contours;
use crate::coverage::CoverageModel;
use crate::error::{PlannerError, Result};
use crate::estimate::{estimate_duration, path_length_m};
use crate::grid::plan_grid;
use crate::models::{FlightPlanResult, GeoPoint, SearchPattern, Waypoint};
use crate::params::{ParameterOverrides, PlannerParameters};
use crate::spiral::{plan_spiral, SpiralArea};
use serde::{Deserialize, Serialize};

/// What to plan, independent of camera and flight settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "lowercase")]
pub enum PlanRequest {
    Grid {
        boundary: Boundary,
    },
    /// Circle around `center`, or the whole `boundary`; never both
    Spiral {
        #[serde(default)]
        center: Option<GeoPoint>,
        #[serde(default)]
        radius_m: Option<f64>,
        #[serde(default)]
        boundary: Option<Boundary>,
    },
    Contour {
        boundary: Boundary,
        levels: Vec<f64>,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlightPlanner {
    defaults: PlannerParameters,
}

impl FlightPlanner {
    pub fn new(defaults: PlannerParameters) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PlannerParameters {
        &self.defaults
    }

    /// Effective parameters for a call: defaults with `overrides` applied.
    pub fn resolve(&self, overrides: &ParameterOverrides) -> PlannerParameters {
        overrides.apply_to(self.defaults)
    }

    /// Resolve parameters and dispatch to the requested pattern.
    pub fn plan(
        &self,
        request: &PlanRequest,
        overrides: &ParameterOverrides,
    ) -> Result<FlightPlanResult> {
        let params = self.resolve(overrides);
        match request {
            PlanRequest::Grid { boundary } => self.plan_grid_search(boundary, &params),
            PlanRequest::Spiral {
                center,
                radius_m,
                boundary,
            } => {
                let area = match (boundary, center, radius_m) {
                    (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                        return Err(PlannerError::InvalidParameter(
                            "spiral takes a boundary or a center and radius_m, not both"
                                .to_string(),
                        ))
                    }
                    (Some(boundary), None, None) => SpiralArea::Boundary(boundary),
                    (None, Some(center), Some(radius_m)) => SpiralArea::Circle {
                        center: *center,
                        radius_m: *radius_m,
                    },
                    _ => {
                        return Err(PlannerError::InvalidParameter(
                            "spiral needs a boundary or a center and radius_m".to_string(),
                        ))
                    }
                };
                self.plan_spiral_search(area, &params)
            }
            PlanRequest::Contour { boundary, levels } => {
                self.plan_contour_search(boundary, levels, &params)
            }
        }
    }

    /// Lawn-mower sweep over `boundary`.
    pub fn plan_grid_search(
        &self,
        boundary: &Boundary,
        params: &PlannerParameters,
    ) -> Result<FlightPlanResult> {
        params.validate()?;
        let coverage = CoverageModel::from_params(params)?;
        let sweep = plan_grid(boundary, &coverage);

        tracing::debug!(
            orientation = ?sweep.orientation,
            probes = sweep.probes_cast,
            tracks = sweep.tracks.len(),
            track_spacing_m = coverage.track_spacing_m,
            waypoint_spacing_m = coverage.waypoint_spacing_m,
            "grid sweep planned"
        );

        let track_count = sweep.tracks.len();
        let warnings = sweep.warnings.clone();
        let waypoints = build_waypoints(sweep.into_path(), params, None);
        let mut result = finish(SearchPattern::Grid, waypoints, params, warnings)?;
        result.track_count = Some(track_count);
        Ok(result)
    }

    /// Expanding rings from a center point or over a boundary.
    pub fn plan_spiral_search(
        &self,
        area: SpiralArea<'_>,
        params: &PlannerParameters,
    ) -> Result<FlightPlanResult> {
        params.validate()?;
        let coverage = CoverageModel::from_params(params)?;
        let walk = plan_spiral(area, &coverage)?;

        tracing::debug!(
            center_lat = walk.center.lat,
            center_lon = walk.center.lon,
            radius_m = walk.radius_m,
            rings = walk.rings,
            ring_spacing_m = coverage.track_spacing_m,
            "spiral planned"
        );

        let waypoints = build_waypoints(walk.points, params, None);
        finish(SearchPattern::Spiral, waypoints, params, walk.warnings)
    }

    /// Placeholder contour search: one spiral per level, tagged with it.
    pub fn plan_contour_search(
        &self,
        boundary: &Boundary,
        levels: &[f64],
        params: &PlannerParameters,
    ) -> Result<FlightPlanResult> {
        params.validate()?;
        let coverage = CoverageModel::from_params(params)?;
        let (passes, warnings) = plan_contours(boundary, levels, &coverage)?;

        tracing::debug!(levels = levels.len(), "contour passes planned");

        let mut waypoints = Vec::new();
        for pass in passes {
            let tagged = build_waypoints(pass.points, params, Some(pass.elevation_m));
            waypoints.extend(tagged);
        }
        for (seq, wp) in waypoints.iter_mut().enumerate() {
            wp.seq = seq;
        }
        finish(SearchPattern::Contour, waypoints, params, warnings)
    }
}

fn build_waypoints(
    points: Vec<GeoPoint>,
    params: &PlannerParameters,
    contour_elevation_m: Option<f64>,
) -> Vec<Waypoint> {
    points
        .into_iter()
        .enumerate()
        .map(|(seq, p)| Waypoint {
            seq,
            lat: p.lat,
            lon: p.lon,
            alt: params.altitude,
            hold_time_s: (params.hold_time > 0.0).then_some(params.hold_time),
            acceptance_radius_m: (params.acceptance_radius > 0.0)
                .then_some(params.acceptance_radius),
            contour_elevation_m,
        })
        .collect()
}

fn finish(
    pattern: SearchPattern,
    waypoints: Vec<Waypoint>,
    params: &PlannerParameters,
    mut warnings: Vec<String>,
) -> Result<FlightPlanResult> {
    if waypoints.is_empty() {
        warnings.push("plan produced no waypoints".to_string());
    }
    for warning in &warnings {
        tracing::warn!(?pattern, "{}", warning);
    }

    let estimated_duration_s = estimate_duration(&waypoints, params.speed)?;
    Ok(FlightPlanResult {
        pattern,
        waypoint_count: waypoints.len(),
        track_count: None,
        total_distance_m: path_length_m(&waypoints),
        estimated_duration_s,
        waypoints,
        warnings,
    })
}
