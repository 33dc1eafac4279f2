use routing::DEFAULT_ROUTER_URL;
use runtime::DEFAULT_DURATION_MIN;
use serde::{Deserialize, Serialize};

use crate::map::MapBackend;

/// Tunables for a drive session. Every field has a default, so hosts can pass
/// a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session length before the user picks one.
    pub default_duration_min: f64,
    /// Base URL of the OSRM-compatible routing service.
    pub routing_base_url: String,
    /// Keep the camera on the car while driving.
    pub follow_car: bool,
    /// Camera tilt while following (ignored by north-up backends).
    pub follow_pitch_deg: f64,
    pub backend: MapBackend,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_min: DEFAULT_DURATION_MIN,
            routing_base_url: DEFAULT_ROUTER_URL.to_string(),
            follow_car: true,
            follow_pitch_deg: 60.0,
            backend: MapBackend::default(),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid session config: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_str(s).map_err(|e| ConfigError(e.to_string()))?;
        if !config.default_duration_min.is_finite() || config.default_duration_min <= 0.0 {
            return Err(ConfigError(format!(
                "default_duration_min {} must be a positive number of minutes",
                config.default_duration_min
            )));
        }
        if config.routing_base_url.trim().is_empty() {
            return Err(ConfigError("routing_base_url is empty".to_string()));
        }
        if !config.follow_pitch_deg.is_finite() || !(0.0..=85.0).contains(&config.follow_pitch_deg)
        {
            return Err(ConfigError(format!(
                "follow_pitch_deg {} outside [0, 85]",
                config.follow_pitch_deg
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionConfig;
    use crate::map::MapBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_stable() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.default_duration_min, 25.0);
        assert_eq!(cfg.routing_base_url, "https://router.project-osrm.org");
        assert!(cfg.follow_car);
        assert_eq!(cfg.follow_pitch_deg, 60.0);
        assert_eq!(cfg.backend, MapBackend::MapLibre);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SessionConfig::from_json_str(r#"{"backend":"leaflet","follow_car":false}"#)
            .unwrap();
        assert_eq!(
            cfg,
            SessionConfig {
                backend: MapBackend::Leaflet,
                follow_car: false,
                ..SessionConfig::default()
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SessionConfig::from_json_str(r#"{"routing_base_url":"  "}"#).is_err());
        assert!(SessionConfig::from_json_str(r#"{"follow_pitch_deg":120}"#).is_err());
        assert!(SessionConfig::from_json_str("not json").is_err());
        assert!(SessionConfig::from_json_str(r#"{"default_duration_min":-5}"#).is_err());
        assert!(SessionConfig::from_json_str(r#"{"default_duration_min":0}"#).is_err());
    }
}
