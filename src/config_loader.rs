use crate::config::Config;
use crate::model::{Device, Devices, Endpoint};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Load, parse and validate configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let config = read_config(config_path)?;
    config.validate()?;

    Ok(config)
}

/// Parse a configuration file without logging or validating it.
///
/// Used before the logger exists, to pick up `general.log_level`.
pub fn read_config(config_path: &Path) -> Result<Config> {
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file {:?}", config_path))?;
    serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file {:?}", config_path))
}

/// CLI arguments that can override the simulation section of the config
#[derive(Debug, Clone, Default)]
pub struct SimulationCliOverrides {
    pub window: Option<Duration>,
    pub hello_interval: Option<Duration>,
    pub packet_size: Option<u32>,
}

/// Apply CLI overrides to a configuration
pub fn apply_simulation_overrides(
    config: &mut Config,
    overrides: &SimulationCliOverrides,
) -> Result<()> {
    let sim = &mut config.simulation;
    if let Some(window) = overrides.window {
        info!("Overriding simulation window: {:?}", window);
        sim.window = window;
    }
    if let Some(interval) = overrides.hello_interval {
        info!("Overriding hello interval: {:?}", interval);
        sim.hello_interval = interval;
    }
    if let Some(size) = overrides.packet_size {
        info!("Overriding packet size: {}", size);
        sim.packet_size = size;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Structured device inventory, as produced by the configuration parser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Inventory consistency errors
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Duplicate device hostname: {0}")]
    DuplicateHostname(String),
    #[error("Duplicate endpoint name: {0}")]
    DuplicateEndpoint(String),
}

impl Inventory {
    /// Key devices by hostname, filling interface names from their map keys
    pub fn into_devices(self) -> Result<(Devices, Vec<Endpoint>), InventoryError> {
        let mut devices = Devices::new();
        for mut device in self.devices {
            device.normalize();
            if devices.contains_key(&device.hostname) {
                return Err(InventoryError::DuplicateHostname(device.hostname));
            }
            devices.insert(device.hostname.clone(), device);
        }

        let mut seen = std::collections::BTreeSet::new();
        for endpoint in &self.endpoints {
            if !seen.insert(endpoint.name.as_str()) {
                return Err(InventoryError::DuplicateEndpoint(endpoint.name.clone()));
            }
        }

        Ok((devices, self.endpoints))
    }
}

/// Load a device inventory from a YAML or JSON file.
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML.
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    info!("Loading inventory from: {:?}", path);

    let file = File::open(path).wrap_err_with(|| format!("Failed to open inventory {:?}", path))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let inventory: Inventory = if is_json {
        serde_json::from_reader(file).wrap_err_with(|| format!("Failed to parse JSON inventory {:?}", path))?
    } else {
        serde_yaml::from_reader(file).wrap_err_with(|| format!("Failed to parse YAML inventory {:?}", path))?
    };

    if inventory.devices.is_empty() {
        warn!("Inventory {:?} declares no devices", path);
    }
    info!(
        "Loaded {} devices and {} endpoints",
        inventory.devices.len(),
        inventory.endpoints.len()
    );
    Ok(inventory)
}
