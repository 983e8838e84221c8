//! SAR CLI - command line front end for the search planner.
//!
//! The `sar-plan` binary is a thin wrapper around [`run`], which reads the
//! input files, calls the planner and returns the JSON report to print.

pub mod args;
pub mod config;
pub mod mission;

pub use args::{Cli, Command, OverrideArgs};
pub use config::CliConfig;
pub use mission::{build_mission, MissionItem};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use sar_core::{
    estimate_duration, path_length_m, Boundary, FlightPlanResult, FlightPlanner, GeoPoint,
    ParameterOverrides, PlanRequest,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Planner output as printed by `sar-plan`.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: FlightPlanResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<Vec<MissionItem>>,
}

#[derive(Debug, Serialize)]
pub struct EstimateReport {
    pub generated_at: DateTime<Utc>,
    pub point_count: usize,
    pub speed_mps: f64,
    pub total_distance_m: f64,
    pub estimated_duration_s: f64,
}

/// Accepted shapes for `estimate --waypoints`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PathInput {
    Points(Vec<GeoPoint>),
    Plan(FlightPlanResult),
}

/// Execute one CLI invocation and return the JSON to print.
pub fn run(cli: &Cli, config: &CliConfig) -> Result<serde_json::Value> {
    let overrides = load_overrides(cli)?;
    let planner = FlightPlanner::new(config.defaults());

    let request = match &cli.command {
        Command::Estimate { waypoints } => {
            let report = estimate(waypoints, planner.resolve(&overrides).speed)?;
            return serde_json::to_value(report).context("failed to serialize estimate");
        }
        Command::Grid { boundary } => PlanRequest::Grid {
            boundary: read_boundary(boundary)?,
        },
        Command::Spiral {
            boundary,
            center,
            radius,
        } => PlanRequest::Spiral {
            center: *center,
            radius_m: *radius,
            boundary: boundary.as_deref().map(read_boundary).transpose()?,
        },
        Command::Contour { boundary, levels } => PlanRequest::Contour {
            boundary: read_boundary(boundary)?,
            levels: levels.clone(),
        },
    };

    let plan = planner
        .plan(&request, &overrides)
        .context("planning failed")?;
    tracing::info!(
        pattern = ?plan.pattern,
        waypoints = plan.waypoint_count,
        distance_m = plan.total_distance_m,
        duration_s = plan.estimated_duration_s,
        "plan ready"
    );

    let mission = if cli.mission {
        let home = match (cli.home, plan.waypoints.first()) {
            (Some(home), _) => home,
            (None, Some(first)) => first.position(),
            (None, None) => bail!("plan is empty; pass --home to build a mission"),
        };
        Some(build_mission(home, &plan.waypoints))
    } else {
        None
    };

    let report = PlanReport {
        generated_at: Utc::now(),
        plan,
        mission,
    };
    serde_json::to_value(report).context("failed to serialize plan")
}

/// Params file first, then command-line flags on top.
fn load_overrides(cli: &Cli) -> Result<ParameterOverrides> {
    let from_file = match &cli.params {
        Some(path) => {
            let text = read_file(path)?;
            ParameterOverrides::from_json(&text)
                .with_context(|| format!("invalid parameters in {}", path.display()))?
        }
        None => ParameterOverrides::default(),
    };
    Ok(from_file.merge(cli.overrides.to_overrides()))
}

fn read_boundary(path: &Path) -> Result<Boundary> {
    let text = read_file(path)?;
    Boundary::from_json(&text).with_context(|| format!("invalid boundary in {}", path.display()))
}

fn estimate(path: &Path, speed_mps: f64) -> Result<EstimateReport> {
    let text = read_file(path)?;
    let points = match serde_json::from_str::<PathInput>(&text)
        .with_context(|| format!("{} is neither a point list nor a plan", path.display()))?
    {
        PathInput::Points(points) => points,
        PathInput::Plan(plan) => plan.waypoints.iter().map(|wp| wp.position()).collect(),
    };

    let estimated_duration_s = estimate_duration(&points, speed_mps)?;
    Ok(EstimateReport {
        generated_at: Utc::now(),
        point_count: points.len(),
        speed_mps,
        total_distance_m: path_length_m(&points),
        estimated_duration_s,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sar-plan-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> Result<serde_json::Value> {
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli, &CliConfig::default())
    }

    const STRIP: &str = "[[0, 0], [0, 0.01], [0.002, 0.01], [0.002, 0]]";

    #[test]
    fn grid_report_includes_stats_and_timestamp() {
        let boundary = scratch("grid.json", STRIP);
        let out = run_args(&["sar-plan", "grid", "--boundary", boundary.to_str().unwrap()]).unwrap();
        assert_eq!(out["pattern"], "grid");
        assert_eq!(out["track_count"], 5);
        assert!(out["waypoint_count"].as_u64().unwrap() > 0);
        assert!(out["generated_at"].is_string());
        assert!(out.get("mission").is_none());
    }

    #[test]
    fn params_file_is_overridden_by_flags() {
        let boundary = scratch("layered.json", STRIP);
        let params = scratch("layered-params.json", r#"{"altitude": 80, "speed": 8}"#);
        let out = run_args(&[
            "sar-plan",
            "grid",
            "--boundary",
            boundary.to_str().unwrap(),
            "--params",
            params.to_str().unwrap(),
            "--speed",
            "10",
        ])
        .unwrap();
        assert_eq!(out["waypoints"][0]["alt"], 80.0);
        let distance = out["total_distance_m"].as_f64().unwrap();
        let duration = out["estimated_duration_s"].as_f64().unwrap();
        assert!((duration - distance / 10.0).abs() < 1e-6);
    }

    #[test]
    fn mission_wraps_plan_with_home_and_rtl() {
        let out = run_args(&[
            "sar-plan",
            "spiral",
            "--center",
            "33.68,-117.83",
            "--radius",
            "200",
            "--mission",
            "--home",
            "33.6,-117.8",
        ])
        .unwrap();
        let mission = out["mission"].as_array().unwrap();
        let count = out["waypoint_count"].as_u64().unwrap() as usize;
        assert_eq!(mission.len(), count + 2);
        assert_eq!(mission[0]["lat"], 33.6);
        assert_eq!(mission[count + 1]["command"], mission::CMD_NAV_RETURN_TO_LAUNCH);
    }

    #[test]
    fn estimate_accepts_point_list() {
        let points = scratch("points.json", "[[0, 0], [0, 0.01]]");
        let out = run_args(&["sar-plan", "estimate", "--waypoints", points.to_str().unwrap()])
            .unwrap();
        assert_eq!(out["point_count"], 2);
        let secs = out["estimated_duration_s"].as_f64().unwrap();
        assert!((secs - 222.6).abs() < 2.3);
    }

    #[test]
    fn estimate_rejects_out_of_range_points() {
        let points = scratch("bad-points.json", "[[95, 0], [0, 0.01]]");
        let err = run_args(&["sar-plan", "estimate", "--waypoints", points.to_str().unwrap()])
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid coordinate"));
    }

    #[test]
    fn bad_boundary_is_reported_with_path() {
        let boundary = scratch("bad.json", "[[0, 0], [0, 0.01]]");
        let err = run_args(&["sar-plan", "grid", "--boundary", boundary.to_str().unwrap()])
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid boundary"));
    }
}
