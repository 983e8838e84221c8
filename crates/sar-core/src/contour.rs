//! Contour-following search.
//!
//! There is no terrain model: every contour level is flown as the same
//! spiral about the boundary centroid and tagged with its elevation, so the
//! mission can be reviewed per level.

use crate::boundary::Boundary;
use crate::coverage::CoverageModel;
use crate::error::{PlannerError, Result};
use crate::models::GeoPoint;
use crate::spiral::{plan_spiral, SpiralArea};

/// One spiral pass tagged with the contour elevation it stands in for.
#[derive(Debug, Clone)]
pub struct ContourPass {
    pub elevation_m: f64,
    pub points: Vec<GeoPoint>,
}

/// Radius of each contour spiral: half the side of a square of equal area.
pub fn contour_radius_m(boundary: &Boundary) -> f64 {
    0.5 * boundary.area_m2().sqrt()
}

pub fn plan_contours(
    boundary: &Boundary,
    levels: &[f64],
    coverage: &CoverageModel,
) -> Result<(Vec<ContourPass>, Vec<String>)> {
    if let Some(bad) = levels.iter().find(|level| !level.is_finite()) {
        return Err(PlannerError::InvalidParameter(format!(
            "contour level {bad} is not a number"
        )));
    }

    let center = boundary.centroid();
    let radius_m = contour_radius_m(boundary);

    let mut passes = Vec::with_capacity(levels.len());
    let mut warnings = Vec::new();
    for &elevation_m in levels {
        let walk = plan_spiral(SpiralArea::Circle { center, radius_m }, coverage)?;
        let points: Vec<GeoPoint> = walk
            .points
            .into_iter()
            .filter(|p| boundary.contains(*p))
            .collect();
        passes.push(ContourPass {
            elevation_m,
            points,
        });
        warnings.extend(walk.warnings);
    }
    warnings.dedup();
    if levels.is_empty() {
        warnings.push("no contour levels given".to_string());
    }
    Ok((passes, warnings))
}
