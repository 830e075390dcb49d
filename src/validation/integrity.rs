//! Hard data-integrity problems in the parsed records.
//!
//! The heuristic checks tolerate bad data by skipping it. The problems found
//! here are reported separately so callers can tell a broken inventory from a
//! merely inconsistent one.

use log::warn;
use serde::Serialize;

use crate::model::{Devices, Endpoint, IfaceKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityError {
    #[error("device record keyed '{key}' has an empty hostname")]
    EmptyHostname { key: String },
    #[error("device record keyed '{key}' has hostname '{hostname}'")]
    HostnameMismatch { key: String, hostname: String },
    #[error("{interface} has a malformed address: {reason}")]
    MalformedInterfaceIp { interface: IfaceKey, reason: String },
    #[error("endpoint {endpoint} has a malformed address: {reason}")]
    MalformedEndpointIp { endpoint: String, reason: String },
}

/// Check device and endpoint records for errors the analysis cannot repair
pub fn check_data_integrity<'a>(
    devices: &Devices,
    endpoints: impl IntoIterator<Item = &'a Endpoint>,
) -> Vec<IntegrityError> {
    let mut errors = Vec::new();

    for (key, device) in devices {
        if device.hostname.trim().is_empty() {
            errors.push(IntegrityError::EmptyHostname { key: key.clone() });
        } else if *key != device.hostname {
            errors.push(IntegrityError::HostnameMismatch {
                key: key.clone(),
                hostname: device.hostname.clone(),
            });
        }

        for (ifname, iface) in &device.interfaces {
            if let Err(err) = iface.address() {
                errors.push(IntegrityError::MalformedInterfaceIp {
                    interface: IfaceKey::new(key, ifname),
                    reason: err.to_string(),
                });
            }
        }
    }

    for endpoint in endpoints {
        if let Err(err) = endpoint.ip_addr() {
            errors.push(IntegrityError::MalformedEndpointIp {
                endpoint: endpoint.name.clone(),
                reason: err.to_string(),
            });
        }
    }

    for error in &errors {
        warn!("Data integrity: {}", error);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, Interface};

    #[test]
    fn test_clean_records() {
        let r1 = Device::router("R1").with_interface(Interface::new("Gi0/0").with_ip("10.0.0.1/30"));
        let devices: Devices = [(r1.hostname.clone(), r1)].into_iter().collect();
        let eps = [Endpoint::new("pc1", 10, "10.0.10.10/24", "10.0.10.1", "HTTP")];
        assert!(check_data_integrity(&devices, &eps).is_empty());
    }

    #[test]
    fn test_errors_are_distinct() {
        let mut devices = Devices::new();
        devices.insert("R1".into(), Device::router(""));
        devices.insert("R2".into(), Device::router("R3"));
        devices.insert(
            "R4".into(),
            Device::router("R4").with_interface(Interface::new("Gi0/0").with_ip("10.0.0.999/24")),
        );
        let eps = [Endpoint::new("pc1", 10, "pc-address", "10.0.10.1", "HTTP")];

        let errors = check_data_integrity(&devices, &eps);
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], IntegrityError::EmptyHostname { .. }));
        assert!(matches!(errors[1], IntegrityError::HostnameMismatch { .. }));
        assert!(matches!(errors[2], IntegrityError::MalformedInterfaceIp { .. }));
        assert!(matches!(errors[3], IntegrityError::MalformedEndpointIp { .. }));
    }
}
