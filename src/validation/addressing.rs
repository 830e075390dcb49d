//! Address checks: duplicate interface IPs and default gateway placement.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use crate::model::{Devices, IfaceKey, VlanId};
use crate::utils::ip_utils::{parse_host_addr, IpCidr};

/// The same address configured twice within one subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateIp {
    pub ip: IpAddr,
    /// Owner seen first
    pub first: IfaceKey,
    /// Conflicting owner
    pub second: IfaceKey,
}

impl fmt::Display for DuplicateIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} assigned to both {} and {}", self.ip, self.first, self.second)
    }
}

/// Find addresses used more than once within the same subnet.
///
/// Interfaces are grouped by (address, containing network). Every owner after
/// the first is reported paired with the first. Malformed addresses are left
/// to the integrity check.
pub fn find_duplicate_ips(devices: &Devices) -> Vec<DuplicateIp> {
    let mut seen: HashMap<(IpAddr, IpCidr), IfaceKey> = HashMap::new();
    let mut dups = Vec::new();

    for device in devices.values() {
        for (ifname, iface) in &device.interfaces {
            let Ok(Some(addr)) = iface.address() else {
                continue;
            };
            let owner = IfaceKey::new(&device.hostname, ifname);

            match seen.get(&(addr.addr(), addr.network())) {
                Some(first) => dups.push(DuplicateIp {
                    ip: addr.addr(),
                    first: first.clone(),
                    second: owner,
                }),
                None => {
                    seen.insert((addr.addr(), addr.network()), owner);
                }
            }
        }
    }
    dups
}

/// A declared default gateway that does not fit its VLAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatewayIssue {
    /// No interface owns an address for the VLAN
    NoSvi { device: String, vlan: VlanId },
    /// Gateway parses but lies outside the SVI subnet
    OutOfSubnet {
        device: String,
        vlan: VlanId,
        gateway: String,
        subnet: String,
    },
    /// Gateway text is not an address
    InvalidFormat {
        device: String,
        vlan: VlanId,
        gateway: String,
    },
    /// The VLAN interface exists but its address does not parse
    MalformedSvi {
        device: String,
        vlan: VlanId,
        reason: String,
    },
}

impl fmt::Display for GatewayIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayIssue::NoSvi { device, vlan } => {
                write!(f, "{} sets default-gw for VLAN {} but has no SVI", device, vlan)
            }
            GatewayIssue::OutOfSubnet { device, vlan, gateway, subnet } => {
                write!(f, "{} gateway {} not in VLAN{} subnet {}", device, gateway, vlan, subnet)
            }
            GatewayIssue::InvalidFormat { device, vlan, gateway } => {
                write!(f, "{} invalid gateway format {} for VLAN {}", device, gateway, vlan)
            }
            GatewayIssue::MalformedSvi { device, vlan, reason } => {
                write!(f, "{} SVI for VLAN {} has a malformed address: {}", device, vlan, reason)
            }
        }
    }
}

/// Check every declared (VLAN, gateway) pair against the VLAN's SVI subnet
pub fn check_wrong_gateways(devices: &Devices) -> Vec<GatewayIssue> {
    let mut issues = Vec::new();

    for device in devices.values() {
        for (&vlan, gateway) in &device.default_gateways {
            let svi = match device.svi(vlan) {
                Ok(Some((_, svi))) => svi,
                Ok(None) => {
                    issues.push(GatewayIssue::NoSvi {
                        device: device.hostname.clone(),
                        vlan,
                    });
                    continue;
                }
                Err(err) => {
                    issues.push(GatewayIssue::MalformedSvi {
                        device: device.hostname.clone(),
                        vlan,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match parse_host_addr(gateway) {
                Ok(gw) if svi.contains(&gw) => {}
                Ok(_) => issues.push(GatewayIssue::OutOfSubnet {
                    device: device.hostname.clone(),
                    vlan,
                    gateway: gateway.clone(),
                    subnet: svi.network().to_string(),
                }),
                Err(_) => issues.push(GatewayIssue::InvalidFormat {
                    device: device.hostname.clone(),
                    vlan,
                    gateway: gateway.clone(),
                }),
            }
        }
    }
    issues
}
