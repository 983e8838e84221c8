//! Planner error taxonomy.

use thiserror::Error;

/// Input-validation failures. Every variant is raised before any waypoint
/// is generated, so a failed call never yields a partial plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// Fewer than 3 points, self-intersecting ring, or zero area.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
    /// A parameter is outside its legal range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    /// Parameters are individually valid but jointly give no ground coverage.
    #[error("no usable ground coverage: {0}")]
    NoCoverage(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
