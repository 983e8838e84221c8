//! CLI configuration from environment.

use sar_core::PlannerParameters;
use std::env;

#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Full `EnvFilter` directive string; replaces the built-in default
    pub log_filter: Option<String>,
    /// Emit log lines as JSON instead of human-readable text
    pub log_json: bool,
    /// Ground speed used when neither the params file nor a flag sets one
    pub default_speed: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            log_json: false,
            default_speed: PlannerParameters::default().speed,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        let fallback = Self::default();
        Self {
            log_filter: env::var("SAR_LOG").ok().filter(|s| !s.trim().is_empty()),
            log_json: env::var("SAR_LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            default_speed: env::var("SAR_DEFAULT_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| *v > 0.0 && v.is_finite())
                .unwrap_or(fallback.default_speed),
        }
    }

    /// Planner defaults with the configured speed.
    pub fn defaults(&self) -> PlannerParameters {
        PlannerParameters {
            speed: self.default_speed,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_configured_speed() {
        let config = CliConfig {
            default_speed: 12.0,
            ..Default::default()
        };
        let params = config.defaults();
        assert_eq!(params.speed, 12.0);
        assert_eq!(params.altitude, 50.0);
    }
}
