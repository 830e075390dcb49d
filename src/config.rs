//! Run configuration: simulation timing, load profiles and logging.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::load::{ProfileRates, RateMode};
use crate::simulation::SimulationConfig;

/// Run configuration; every section is optional in the YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub simulation: SimulationConfig,
    pub load: LoadConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.window == Duration::ZERO {
            return Err(ConfigError::InvalidSimulation(
                "window cannot be zero".to_string(),
            ));
        }
        if sim.hello_interval == Duration::ZERO {
            return Err(ConfigError::InvalidSimulation(
                "hello_interval cannot be zero".to_string(),
            ));
        }
        if sim.hello_interval > sim.window {
            return Err(ConfigError::InvalidSimulation(format!(
                "hello_interval {:?} is longer than window {:?}",
                sim.hello_interval, sim.window
            )));
        }
        if sim.packet_size == 0 {
            return Err(ConfigError::InvalidSimulation(
                "packet_size must be positive".to_string(),
            ));
        }

        for (name, rates) in &self.load.profiles {
            if rates.regular > rates.peak {
                return Err(ConfigError::InvalidProfile {
                    name: name.clone(),
                    regular: rates.regular,
                    peak: rates.peak,
                });
            }
        }

        Ok(())
    }
}

/// Shared general configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
        }
    }
}

/// Load analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Use peak rates instead of regular ones
    pub peak: bool,
    /// Extra or overriding application profiles
    pub profiles: BTreeMap<String, ProfileRates>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            peak: true,
            profiles: BTreeMap::new(),
        }
    }
}

impl LoadConfig {
    pub fn rate_mode(&self) -> RateMode {
        if self.peak {
            RateMode::Peak
        } else {
            RateMode::Regular
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid simulation configuration: {0}")]
    InvalidSimulation(String),
    #[error("Invalid profile {name}: regular rate {regular} exceeds peak rate {peak}")]
    InvalidProfile { name: String, regular: u64, peak: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.load.rate_mode(), RateMode::Peak);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
general:
  log_level: debug
simulation:
  window: 10s
  hello_interval: 500ms
  packet_size: 9000
load:
  peak: false
  profiles:
    Backup:
      regular: 10000
      peak: 40000
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.simulation.window, Duration::from_secs(10));
        assert_eq!(config.simulation.hello_interval, Duration::from_millis(500));
        assert_eq!(config.simulation.packet_size, 9000);
        assert_eq!(config.load.rate_mode(), RateMode::Regular);
        assert_eq!(config.load.profiles["Backup"], ProfileRates::new(10000, 40000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.simulation.hello_interval = Duration::from_secs(10);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSimulation(_))));

        let mut config = Config::default();
        config.simulation.window = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.packet_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.load.profiles.insert("Bad".to_string(), ProfileRates::new(10, 5));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProfile { .. }));
        assert!(err.to_string().contains("Bad"));
    }
}
