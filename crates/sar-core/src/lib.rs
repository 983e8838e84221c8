//! Coverage flight-path planning for drone search missions.
//!
//! Given a search boundary and camera/flight parameters, the planner lays out
//! waypoints that image the whole area: boustrophedon grids, expanding
//! spirals, or per-level contour passes.

pub mod boundary;
pub mod contour;
pub mod coverage;
pub mod error;
pub mod estimate;
pub mod grid;
pub mod models;
pub mod params;
pub mod planner;
pub mod spatial;
pub mod spiral;

pub use boundary::{Boundary, BoundingBox, LineSegment, Orientation};
pub use contour::{plan_contours, ContourPass};
pub use coverage::{ground_footprint, track_spacing, CoverageModel, Footprint};
pub use error::{PlannerError, Result};
pub use estimate::{estimate_duration, path_length_m, Positioned};
pub use grid::{plan_grid, GridSweep};
pub use models::{FlightPlanResult, GeoPoint, SearchPattern, Waypoint};
pub use params::{ParameterOverrides, PlannerParameters};
pub use planner::{FlightPlanner, PlanRequest};
pub use spatial::{bearing, destination, distance, haversine_distance};
pub use spiral::{plan_spiral, SpiralArea, SpiralWalk};
