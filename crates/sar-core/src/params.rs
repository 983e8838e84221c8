//! Planner configuration.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// Flight and camera settings for one planning call.
///
/// Fully resolved and immutable; build it from [`Default`] plus a
/// [`ParameterOverrides`] rather than mutating a shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParameters {
    /// Flight altitude relative to home, meters
    pub altitude: f64,
    /// Ground speed used for time estimation only, m/s
    pub speed: f64,
    pub camera_fov_horizontal: f64,
    pub camera_fov_vertical: f64,
    /// Gimbal tilt from horizontal in degrees (90 = nadir)
    pub camera_angle: f64,
    /// Along-track image overlap, percent
    pub front_overlap: f64,
    /// Cross-track image overlap, percent
    pub side_overlap: f64,
    pub min_waypoint_spacing: f64,
    pub max_waypoint_spacing: f64,
    /// Hold time at each waypoint, seconds
    pub hold_time: f64,
    /// Radius at which a waypoint counts as reached, meters
    pub acceptance_radius: f64,
}

impl Default for PlannerParameters {
    fn default() -> Self {
        Self {
            altitude: 50.0,
            speed: 5.0,
            camera_fov_horizontal: 70.0,
            camera_fov_vertical: 50.0,
            camera_angle: 90.0,
            front_overlap: 20.0,
            side_overlap: 20.0,
            min_waypoint_spacing: 5.0,
            max_waypoint_spacing: 100.0,
            hold_time: 0.0,
            acceptance_radius: 2.0,
        }
    }
}

impl PlannerParameters {
    /// Parse a flat JSON object of overrides on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(ParameterOverrides::from_json(json)?.apply_to(Self::default()))
    }

    /// Set front and side overlap together.
    pub fn with_overlap(self, overlap_percent: f64) -> Self {
        Self {
            front_overlap: overlap_percent,
            side_overlap: overlap_percent,
            ..self
        }
    }

    /// Range-check every field. Called once at each planning entry point.
    pub fn validate(&self) -> Result<()> {
        require(self.altitude > 0.0, "altitude", self.altitude, "must be > 0")?;
        require(self.speed > 0.0, "speed", self.speed, "must be > 0")?;
        for (name, fov) in [
            ("camera_fov_horizontal", self.camera_fov_horizontal),
            ("camera_fov_vertical", self.camera_fov_vertical),
        ] {
            require(fov > 0.0 && fov < 180.0, name, fov, "must be in (0, 180)")?;
        }
        require(
            (0.0..=90.0).contains(&self.camera_angle),
            "camera_angle",
            self.camera_angle,
            "must be in [0, 90]",
        )?;
        for (name, overlap) in [
            ("front_overlap", self.front_overlap),
            ("side_overlap", self.side_overlap),
        ] {
            require(
                (0.0..100.0).contains(&overlap),
                name,
                overlap,
                "must be in [0, 100)",
            )?;
        }
        require(
            self.min_waypoint_spacing > 0.0,
            "min_waypoint_spacing",
            self.min_waypoint_spacing,
            "must be > 0",
        )?;
        require(
            self.max_waypoint_spacing >= self.min_waypoint_spacing,
            "max_waypoint_spacing",
            self.max_waypoint_spacing,
            "must be >= min_waypoint_spacing",
        )?;
        require(self.hold_time >= 0.0, "hold_time", self.hold_time, "must be >= 0")?;
        require(
            self.acceptance_radius >= 0.0,
            "acceptance_radius",
            self.acceptance_radius,
            "must be >= 0",
        )?;
        Ok(())
    }
}

/// Caller-supplied subset of [`PlannerParameters`].
///
/// Deserializes from the flat key/value mapping the UI sends. The legacy
/// key names (`camera_fov_w`, `camera_fov_h`, `min_distance`,
/// `max_distance`) are accepted as aliases, and a bare `overlap` applies to
/// whichever of `front_overlap`/`side_overlap` is not given explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOverrides {
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    #[serde(alias = "camera_fov_w")]
    pub camera_fov_horizontal: Option<f64>,
    #[serde(alias = "camera_fov_h")]
    pub camera_fov_vertical: Option<f64>,
    pub camera_angle: Option<f64>,
    pub overlap: Option<f64>,
    pub front_overlap: Option<f64>,
    pub side_overlap: Option<f64>,
    #[serde(alias = "min_distance")]
    pub min_waypoint_spacing: Option<f64>,
    #[serde(alias = "max_distance")]
    pub max_waypoint_spacing: Option<f64>,
    pub hold_time: Option<f64>,
    pub acceptance_radius: Option<f64>,
}

impl ParameterOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            PlannerError::InvalidParameter(format!("malformed parameters: {err}"))
        })
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ParameterOverrides) -> Self {
        Self {
            altitude: other.altitude.or(self.altitude),
            speed: other.speed.or(self.speed),
            camera_fov_horizontal: other.camera_fov_horizontal.or(self.camera_fov_horizontal),
            camera_fov_vertical: other.camera_fov_vertical.or(self.camera_fov_vertical),
            camera_angle: other.camera_angle.or(self.camera_angle),
            overlap: other.overlap.or(self.overlap),
            front_overlap: other.front_overlap.or(self.front_overlap),
            side_overlap: other.side_overlap.or(self.side_overlap),
            min_waypoint_spacing: other.min_waypoint_spacing.or(self.min_waypoint_spacing),
            max_waypoint_spacing: other.max_waypoint_spacing.or(self.max_waypoint_spacing),
            hold_time: other.hold_time.or(self.hold_time),
            acceptance_radius: other.acceptance_radius.or(self.acceptance_radius),
        }
    }

    /// Resolve against `base`, producing a new parameter set.
    pub fn apply_to(&self, base: PlannerParameters) -> PlannerParameters {
        PlannerParameters {
            altitude: self.altitude.unwrap_or(base.altitude),
            speed: self.speed.unwrap_or(base.speed),
            camera_fov_horizontal: self
                .camera_fov_horizontal
                .unwrap_or(base.camera_fov_horizontal),
            camera_fov_vertical: self.camera_fov_vertical.unwrap_or(base.camera_fov_vertical),
            camera_angle: self.camera_angle.unwrap_or(base.camera_angle),
            front_overlap: self
                .front_overlap
                .or(self.overlap)
                .unwrap_or(base.front_overlap),
            side_overlap: self.side_overlap.or(self.overlap).unwrap_or(base.side_overlap),
            min_waypoint_spacing: self
                .min_waypoint_spacing
                .unwrap_or(base.min_waypoint_spacing),
            max_waypoint_spacing: self
                .max_waypoint_spacing
                .unwrap_or(base.max_waypoint_spacing),
            hold_time: self.hold_time.unwrap_or(base.hold_time),
            acceptance_radius: self.acceptance_radius.unwrap_or(base.acceptance_radius),
        }
    }
}

fn require(ok: bool, name: &str, value: f64, rule: &str) -> Result<()> {
    // NaN fails every comparison above, so it lands here too
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(PlannerError::InvalidParameter(format!(
            "{name} = {value} {rule}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PlannerParameters::default().validate().is_ok());
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let params =
            PlannerParameters::from_json(r#"{"altitude": 80, "camera_fov_w": 60}"#).unwrap();
        assert_eq!(params.altitude, 80.0);
        assert_eq!(params.camera_fov_horizontal, 60.0);
        assert_eq!(params.camera_fov_vertical, 50.0);
        assert_eq!(params.speed, 5.0);
    }

    #[test]
    fn shared_overlap_key_fills_both_axes() {
        let params =
            PlannerParameters::from_json(r#"{"overlap": 40, "side_overlap": 10}"#).unwrap();
        assert_eq!(params.front_overlap, 40.0);
        assert_eq!(params.side_overlap, 10.0);
    }

    #[test]
    fn later_overrides_win_when_merged() {
        let file = ParameterOverrides {
            altitude: Some(80.0),
            speed: Some(8.0),
            ..Default::default()
        };
        let flags = ParameterOverrides {
            altitude: Some(120.0),
            ..Default::default()
        };
        let params = file.merge(flags).apply_to(PlannerParameters::default());
        assert_eq!(params.altitude, 120.0);
        assert_eq!(params.speed, 8.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ParameterOverrides::from_json(r#"{"altitud": 80}"#).is_err());
    }

    #[test]
    fn malformed_json_is_invalid_parameter() {
        let err = PlannerParameters::from_json(r#"{"altitude": "high"}"#).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidParameter(_)));
    }

    #[test]
    fn full_overlap_is_rejected() {
        let params = PlannerParameters {
            front_overlap: 100.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, PlannerError::InvalidParameter(ref msg) if msg.contains("front_overlap")));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let base = PlannerParameters::default();
        let cases = [
            PlannerParameters { altitude: 0.0, ..base },
            PlannerParameters { speed: -1.0, ..base },
            PlannerParameters { camera_fov_horizontal: 180.0, ..base },
            PlannerParameters { camera_angle: 95.0, ..base },
            PlannerParameters { side_overlap: -5.0, ..base },
            PlannerParameters { min_waypoint_spacing: 0.0, ..base },
            PlannerParameters { max_waypoint_spacing: 1.0, ..base },
            PlannerParameters { altitude: f64::NAN, ..base },
        ];
        for params in cases {
            assert!(params.validate().is_err(), "{params:?} should be rejected");
        }
    }

    #[test]
    fn with_overlap_sets_both_axes() {
        let params = PlannerParameters::default().with_overlap(60.0);
        assert_eq!(params.front_overlap, 60.0);
        assert_eq!(params.side_overlap, 60.0);
    }
}
