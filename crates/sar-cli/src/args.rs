//! Command-line surface of `sar-plan`.

use clap::{Args, Parser, Subcommand};
use sar_core::{GeoPoint, ParameterOverrides};
use std::path::PathBuf;

/// Plan coverage flights for a drone search area
#[derive(Parser, Debug)]
#[command(name = "sar-plan", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file with planner parameters (flat key/value mapping)
    #[arg(long, global = true)]
    pub params: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Also emit the mission-upload item list (home first, RTL last)
    #[arg(long, global = true)]
    pub mission: bool,

    /// Home position for the mission as "lat,lon" (default: first waypoint)
    #[arg(long, global = true, value_parser = parse_point, allow_hyphen_values = true)]
    pub home: Option<GeoPoint>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Boustrophedon sweep over a boundary
    Grid {
        /// JSON array of [lat, lon] vertices
        #[arg(long)]
        boundary: PathBuf,
    },
    /// Expanding rings around a point, or over a whole boundary
    Spiral {
        /// JSON array of [lat, lon] vertices
        #[arg(long, conflicts_with_all = ["center", "radius"])]
        boundary: Option<PathBuf>,

        /// Search center as "lat,lon"
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true, requires = "radius")]
        center: Option<GeoPoint>,

        /// Search radius in meters
        #[arg(long, requires = "center")]
        radius: Option<f64>,
    },
    /// One spiral pass per contour level
    Contour {
        /// JSON array of [lat, lon] vertices
        #[arg(long)]
        boundary: PathBuf,

        /// Comma-separated contour elevations in meters
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        levels: Vec<f64>,
    },
    /// Distance and flight time for an existing path
    Estimate {
        /// JSON array of [lat, lon] points, or a previous plan report
        #[arg(long)]
        waypoints: PathBuf,
    },
}

/// Flags that override individual planner parameters.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Flight altitude in meters
    #[arg(long, global = true)]
    pub altitude: Option<f64>,

    /// Ground speed in m/s
    #[arg(long, global = true)]
    pub speed: Option<f64>,

    /// Horizontal camera field of view in degrees
    #[arg(long, global = true)]
    pub fov_h: Option<f64>,

    /// Vertical camera field of view in degrees
    #[arg(long, global = true)]
    pub fov_v: Option<f64>,

    /// Camera tilt below the horizon in degrees (90 = nadir)
    #[arg(long, global = true)]
    pub camera_angle: Option<f64>,

    /// Front and side overlap in percent
    #[arg(long, global = true)]
    pub overlap: Option<f64>,

    #[arg(long, global = true)]
    pub front_overlap: Option<f64>,

    #[arg(long, global = true)]
    pub side_overlap: Option<f64>,

    /// Lower bound on along-track waypoint spacing in meters
    #[arg(long, global = true)]
    pub min_waypoint_spacing: Option<f64>,

    /// Upper bound on along-track waypoint spacing in meters
    #[arg(long, global = true)]
    pub max_waypoint_spacing: Option<f64>,

    /// Hold time at each waypoint in seconds
    #[arg(long, global = true)]
    pub hold_time: Option<f64>,

    /// Waypoint acceptance radius in meters
    #[arg(long, global = true)]
    pub acceptance_radius: Option<f64>,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            altitude: self.altitude,
            speed: self.speed,
            camera_fov_horizontal: self.fov_h,
            camera_fov_vertical: self.fov_v,
            camera_angle: self.camera_angle,
            overlap: self.overlap,
            front_overlap: self.front_overlap,
            side_overlap: self.side_overlap,
            min_waypoint_spacing: self.min_waypoint_spacing,
            max_waypoint_spacing: self.max_waypoint_spacing,
            hold_time: self.hold_time,
            acceptance_radius: self.acceptance_radius,
        }
    }
}

/// Parse "lat,lon" into a validated point.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}
