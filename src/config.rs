//! Simulation settings
//!
//! Loaded from JSON; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DEGREE_STEP, DEFAULT_RADAR_RANGE, SIM_DT};
use crate::error::{Result, SimError};
use crate::sim::Radar;
use crate::sim::radar::{check_degree_step, check_range};

/// Angular resolution presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScanResolution {
    Coarse,
    #[default]
    Standard,
    Fine,
}

impl ScanResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanResolution::Coarse => "Coarse",
            ScanResolution::Standard => "Standard",
            ScanResolution::Fine => "Fine",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "coarse" | "low" => Some(ScanResolution::Coarse),
            "standard" | "std" => Some(ScanResolution::Standard),
            "fine" | "high" => Some(ScanResolution::Fine),
            _ => None,
        }
    }

    /// Degrees between beams for this preset
    pub fn degree_step(&self) -> f64 {
        match self {
            ScanResolution::Coarse => 5.0,
            ScanResolution::Standard => DEFAULT_DEGREE_STEP,
            ScanResolution::Fine => 0.25,
        }
    }
}

/// Radar parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Beam length (world units)
    pub range: f64,
    /// Degrees between beams
    pub degree_step: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self::from_preset(ScanResolution::default())
    }
}

impl RadarConfig {
    pub fn from_preset(resolution: ScanResolution) -> Self {
        Self {
            range: DEFAULT_RADAR_RANGE,
            degree_step: resolution.degree_step(),
        }
    }

    /// Switch to a preset resolution, keeping the range
    pub fn apply_preset(&mut self, resolution: ScanResolution) {
        self.degree_step = resolution.degree_step();
    }

    pub fn build(&self) -> Result<Radar> {
        Radar::new(self.range, self.degree_step)
    }
}

/// Top-level simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub radar: RadarConfig,
    /// Seconds per tick
    pub time_step: f64,
    /// Ticks the demo runs for
    pub ticks: u32,
    /// Seed for random-walk obstacles
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            radar: RadarConfig::default(),
            time_step: SIM_DT,
            ticks: 20,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_range(self.radar.range)?;
        check_degree_step(self.radar.degree_step)?;
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SimError::Config(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        Ok(())
    }

    pub fn radar(&self) -> Result<Radar> {
        self.radar.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_names() {
        for preset in [
            ScanResolution::Coarse,
            ScanResolution::Standard,
            ScanResolution::Fine,
        ] {
            assert_eq!(ScanResolution::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(ScanResolution::from_str("HIGH"), Some(ScanResolution::Fine));
        assert_eq!(ScanResolution::from_str("ultra"), None);
    }

    #[test]
    fn test_default_config_builds_radar() {
        let config = SimConfig::default();
        config.validate().unwrap();
        let radar = config.radar().unwrap();
        assert_eq!(radar.sample_count(), 360);
        assert_eq!(radar.range(), DEFAULT_RADAR_RANGE);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = SimConfig::default();
        config.radar.apply_preset(ScanResolution::Coarse);
        config.seed = 7;
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{"radar": {"range": 50.0}}"#).unwrap();
        assert_eq!(config.radar.range, 50.0);
        assert_eq!(config.radar.degree_step, DEFAULT_DEGREE_STEP);
        assert_eq!(config.time_step, SIM_DT);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        assert!(matches!(
            SimConfig::from_json(r#"{"radar": {"range": -1.0}}"#),
            Err(SimError::InvalidRadarRange(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"radar": {"degree_step": 0.0}}"#),
            Err(SimError::InvalidDegreeStep(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"radar": {"degree_step": 1e-300}}"#),
            Err(SimError::InvalidDegreeStep(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"time_step": 0.0}"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(SimConfig::from_json("{"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/radar-sim.json"),
            Err(SimError::Io(_))
        ));
    }
}
