//! Access VLAN label check.

use serde::Serialize;
use std::fmt;

use crate::model::{Devices, IfaceKey, VlanId};

/// An access port tagged with a VLAN its own device does not define
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanLabelIssue {
    pub interface: IfaceKey,
    pub vlan: VlanId,
}

impl fmt::Display for VlanLabelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} references VLAN {} which is undefined on this device",
            self.interface, self.vlan
        )
    }
}

/// Warn if an interface references an undefined VLAN
pub fn check_vlan_labels(devices: &Devices) -> Vec<VlanLabelIssue> {
    devices
        .values()
        .flat_map(|device| {
            device.interfaces.iter().filter_map(move |(ifname, iface)| {
                let vlan = iface.vlan?;
                (!device.vlans.contains_key(&vlan)).then(|| VlanLabelIssue {
                    interface: IfaceKey::new(&device.hostname, ifname),
                    vlan,
                })
            })
        })
        .collect()
}
