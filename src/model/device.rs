//! Device, interface and endpoint records.
//!
//! These are the structured records produced by the configuration parser.
//! They are created once per parsed configuration and never mutated by the
//! analysis passes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::ip_utils::{parse_host_addr, AddressError, IpCidr};

/// VLAN identifier
pub type VlanId = u16;

/// Device records keyed by hostname
pub type Devices = BTreeMap<String, Device>;

/// Role of a device in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Router,
    Switch,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Router => write!(f, "router"),
            DeviceType::Switch => write!(f, "switch"),
        }
    }
}

/// A layer 3 or layer 2 interface on a device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Filled from the interface map key when omitted in the inventory
    #[serde(default)]
    pub name: String,
    /// Raw address text, e.g. `10.0.12.1/24`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Capacity in kbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_kbps: Option<u64>,
    /// Access VLAN for L2 ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanId>,
    /// Free text, carries `LINK:` hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = Some(mtu);
        self
    }

    pub fn with_bandwidth(mut self, kbps: u64) -> Self {
        self.bandwidth_kbps = Some(kbps);
        self
    }

    pub fn with_vlan(mut self, vlan: VlanId) -> Self {
        self.vlan = Some(vlan);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The interface address.
    ///
    /// `Ok(None)` when no address is configured, `Err` when one is configured
    /// but cannot be parsed.
    pub fn address(&self) -> Result<Option<IpCidr>, AddressError> {
        self.ip.as_deref().map(IpCidr::parse).transpose()
    }

    /// VLAN id encoded in an SVI name such as `Vlan10`
    pub fn svi_vlan(&self) -> Option<VlanId> {
        let lower = self.name.to_ascii_lowercase();
        lower.strip_prefix("vlan")?.trim().parse().ok()
    }
}

/// Metadata declared for a VLAN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A router or switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub hostname: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub interfaces: BTreeMap<String, Interface>,
    /// Protocol name to free-form parameters, e.g. `ospf: {process: 1}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routing: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub vlans: BTreeMap<VlanId, VlanInfo>,
    /// VLAN to declared default gateway
    #[serde(default)]
    pub default_gateways: BTreeMap<VlanId, String>,
}

impl Device {
    pub fn new(hostname: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            hostname: hostname.into(),
            device_type,
            interfaces: BTreeMap::new(),
            routing: BTreeMap::new(),
            vlans: BTreeMap::new(),
            default_gateways: BTreeMap::new(),
        }
    }

    pub fn router(hostname: impl Into<String>) -> Self {
        Self::new(hostname, DeviceType::Router)
    }

    pub fn switch(hostname: impl Into<String>) -> Self {
        Self::new(hostname, DeviceType::Switch)
    }

    pub fn with_interface(mut self, iface: Interface) -> Self {
        self.interfaces.insert(iface.name.clone(), iface);
        self
    }

    pub fn with_vlan(mut self, vlan: VlanId, name: impl Into<String>) -> Self {
        self.vlans.insert(vlan, VlanInfo { name: Some(name.into()) });
        self
    }

    pub fn with_gateway(mut self, vlan: VlanId, gateway: impl Into<String>) -> Self {
        self.default_gateways.insert(vlan, gateway.into());
        self
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    /// The interface owning the IP address for `vlan`: its name encodes the
    /// VLAN and it carries a parsable address.
    ///
    /// `Ok(None)` when no such interface has an address at all; `Err` when
    /// the only addresses present are malformed.
    pub fn svi(&self, vlan: VlanId) -> Result<Option<(&Interface, IpCidr)>, AddressError> {
        let mut malformed = None;
        for iface in self.interfaces.values().filter(|iface| iface.svi_vlan() == Some(vlan)) {
            match iface.address() {
                Ok(Some(addr)) => return Ok(Some((iface, addr))),
                Ok(None) => {}
                Err(err) => {
                    malformed.get_or_insert(err);
                }
            }
        }
        match malformed {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// Fill interface names from their map keys
    pub fn normalize(&mut self) {
        for (name, iface) in self.interfaces.iter_mut() {
            if iface.name.is_empty() {
                iface.name = name.clone();
            }
        }
    }
}

/// A host attached to an access VLAN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub vlan: VlanId,
    pub ip: String,
    pub gw: String,
    /// Application profile tag, e.g. `HTTP` or `VoIP`
    pub app_profile: String,
}

impl Endpoint {
    pub fn new(
        name: impl Into<String>,
        vlan: VlanId,
        ip: impl Into<String>,
        gw: impl Into<String>,
        app_profile: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vlan,
            ip: ip.into(),
            gw: gw.into(),
            app_profile: app_profile.into(),
        }
    }

    pub fn ip_addr(&self) -> Result<std::net::IpAddr, AddressError> {
        parse_host_addr(&self.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_absent_vs_malformed() {
        let none = Interface::new("Gi0/0");
        assert_eq!(none.address(), Ok(None));

        let good = Interface::new("Gi0/0").with_ip("10.0.12.1/24");
        assert_eq!(good.address().unwrap().unwrap().prefix(), 24);

        let bad = Interface::new("Gi0/0").with_ip("10.0.12.300/24");
        assert!(bad.address().is_err());
    }

    #[test]
    fn test_svi_vlan() {
        assert_eq!(Interface::new("Vlan10").svi_vlan(), Some(10));
        assert_eq!(Interface::new("vlan 20").svi_vlan(), Some(20));
        assert_eq!(Interface::new("Gi0/1").svi_vlan(), None);
        assert_eq!(Interface::new("VlanX").svi_vlan(), None);
    }

    #[test]
    fn test_svi_requires_address() {
        let sw = Device::switch("SW1")
            .with_interface(Interface::new("Vlan10"))
            .with_interface(Interface::new("Vlan20").with_ip("10.0.20.1/24"));

        assert_eq!(sw.svi(10), Ok(None));
        let (iface, addr) = sw.svi(20).unwrap().unwrap();
        assert_eq!(iface.name, "Vlan20");
        assert_eq!(addr.to_string(), "10.0.20.1/24");
    }

    #[test]
    fn test_svi_with_malformed_address() {
        let sw = Device::switch("SW1").with_interface(Interface::new("Vlan5").with_ip("10.0.5.999/24"));
        assert!(matches!(sw.svi(5), Err(AddressError::InvalidAddress(_))));
        assert_eq!(sw.svi(6), Ok(None));
    }

    #[test]
    fn test_device_yaml() {
        let yaml = r#"
hostname: SW1
type: switch
interfaces:
  Vlan10:
    ip: 10.0.10.1/24
  Gi0/1:
    vlan: 10
    mtu: 1500
vlans:
  10:
    name: Users
default_gateways:
  10: 10.0.10.254
"#;
        let mut dev: Device = serde_yaml::from_str(yaml).unwrap();
        dev.normalize();
        assert_eq!(dev.device_type, DeviceType::Switch);
        assert_eq!(dev.interfaces["Gi0/1"].name, "Gi0/1");
        assert_eq!(dev.interfaces["Gi0/1"].vlan, Some(10));
        assert_eq!(dev.vlans[&10].name.as_deref(), Some("Users"));
        assert_eq!(dev.default_gateways[&10], "10.0.10.254");
    }
}
