//! Load and capacity analysis.
//!
//! This is a single-hop access model: each endpoint's application traffic
//! terminates at the SVI that owns its VLAN, and is accounted on a synthetic
//! host-to-SVI access edge. Transit traffic between gateways is not modeled.

pub mod capacity;
pub mod profiles;

use log::{debug, info};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::{EdgeKey, Endpoint, IfaceKey, VlanId};
use crate::topology::Topology;

pub use capacity::{capacity_analysis, CapacityFinding, RECOMMENDATION};
pub use profiles::{ProfileRates, ProfileTable, RateMode, DEFAULT_RATES};

/// Identity of an edge carrying load
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoadEdge {
    /// Synthetic host-to-SVI edge; assumed uncapacitated
    Access { host: String, sink: IfaceKey },
    /// A link present in the topology
    Link(EdgeKey),
}

impl LoadEdge {
    pub fn access(host: impl Into<String>, sink: IfaceKey) -> Self {
        LoadEdge::Access {
            host: host.into(),
            sink,
        }
    }

    pub fn is_access(&self) -> bool {
        matches!(self, LoadEdge::Access { .. })
    }
}

impl fmt::Display for LoadEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadEdge::Access { host, sink } => write!(f, "HOST:{} -> {}", host, sink),
            LoadEdge::Link(key) => write!(f, "{}", key),
        }
    }
}

impl Serialize for LoadEdge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Aggregate kbps per edge
pub type LoadMap = BTreeMap<LoadEdge, u64>;

/// The interface that sinks traffic for `vlan`: the first SVI found, with
/// devices visited in hostname order.
pub fn vlan_sink(topo: &Topology, vlan: VlanId) -> Option<IfaceKey> {
    topo.devices().values().find_map(|device| {
        match device.svi(vlan) {
            Ok(Some((iface, _))) => Some(IfaceKey::new(&device.hostname, &iface.name)),
            Ok(None) => None,
            Err(err) => {
                debug!("Skipping SVI for VLAN {} on {}: {}", vlan, device.hostname, err);
                None
            }
        }
    })
}

/// Compute aggregate kbps per access edge.
///
/// # Arguments
/// * `topo` - Topology whose device records provide the VLAN SVIs
/// * `endpoints` - Hosts to account
/// * `profiles` - Application rate table
/// * `mode` - Whether to apply regular or peak rates
///
/// # Returns
/// Map from access edge to load. Endpoints whose VLAN has no SVI anywhere
/// are absent from the map.
pub fn compute_link_loads(
    topo: &Topology,
    endpoints: &BTreeMap<String, Endpoint>,
    profiles: &ProfileTable,
    mode: RateMode,
) -> LoadMap {
    let mut sinks: BTreeMap<VlanId, Option<IfaceKey>> = BTreeMap::new();
    let mut loads = LoadMap::new();

    for endpoint in endpoints.values() {
        let sink = sinks
            .entry(endpoint.vlan)
            .or_insert_with(|| vlan_sink(topo, endpoint.vlan));

        let Some(sink) = sink else {
            debug!("Endpoint {} has no SVI for VLAN {}; not accounted", endpoint.name, endpoint.vlan);
            continue;
        };

        let rate = profiles.rate(&endpoint.app_profile, mode);
        *loads
            .entry(LoadEdge::access(&endpoint.name, sink.clone()))
            .or_insert(0) += rate;
    }

    info!(
        "Computed {:?} load for {} of {} endpoints",
        mode,
        loads.len(),
        endpoints.len()
    );
    loads
}

/// Total load arriving at each sink interface
pub fn load_per_sink(loads: &LoadMap) -> BTreeMap<&IfaceKey, u64> {
    let mut totals = BTreeMap::new();
    for (edge, load) in loads {
        if let LoadEdge::Access { sink, .. } = edge {
            *totals.entry(sink).or_insert(0) += load;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, Interface};

    fn topo() -> Topology {
        let mut topo = Topology::new();
        topo.add_device(Device::switch("SW2").with_interface(Interface::new("Vlan10").with_ip("10.0.10.2/24")));
        topo.add_device(Device::switch("SW1").with_interface(Interface::new("Vlan10").with_ip("10.0.10.1/24")));
        topo
    }

    fn endpoints(list: Vec<Endpoint>) -> BTreeMap<String, Endpoint> {
        list.into_iter().map(|e| (e.name.clone(), e)).collect()
    }

    #[test]
    fn test_loads_land_on_first_svi() {
        let eps = endpoints(vec![
            Endpoint::new("pc1", 10, "10.0.10.10", "10.0.10.1", "HTTP"),
            Endpoint::new("phone1", 10, "10.0.10.11", "10.0.10.1", "VoIP"),
        ]);
        let loads = compute_link_loads(&topo(), &eps, &ProfileTable::default(), RateMode::Peak);

        let sink = IfaceKey::new("SW1", "Vlan10");
        assert_eq!(loads[&LoadEdge::access("pc1", sink.clone())], 1500);
        assert_eq!(loads[&LoadEdge::access("phone1", sink.clone())], 200);
        assert_eq!(load_per_sink(&loads)[&sink], 1700);
    }

    #[test]
    fn test_endpoint_without_svi_is_absent() {
        let eps = endpoints(vec![
            Endpoint::new("pc1", 10, "10.0.10.10", "10.0.10.1", "HTTP"),
            Endpoint::new("cam1", 40, "10.0.40.10", "10.0.40.1", "Video"),
        ]);
        let loads = compute_link_loads(&topo(), &eps, &ProfileTable::default(), RateMode::Regular);

        assert_eq!(loads.len(), 1);
        assert!(loads.keys().all(|edge| !matches!(edge, LoadEdge::Access { host, .. } if host == "cam1")));
    }

    #[test]
    fn test_unknown_profile_uses_default_rates() {
        let eps = endpoints(vec![Endpoint::new("pc1", 10, "10.0.10.10", "10.0.10.1", "Gaming")]);
        let loads = compute_link_loads(&topo(), &eps, &ProfileTable::default(), RateMode::Regular);
        assert_eq!(loads.values().copied().collect::<Vec<_>>(), vec![DEFAULT_RATES.regular]);
    }

    #[test]
    fn test_load_edge_display() {
        let edge = LoadEdge::access("pc1", IfaceKey::new("SW1", "Vlan10"));
        assert_eq!(edge.to_string(), "HOST:pc1 -> SW1:Vlan10");
        assert!(edge.is_access());

        let loads = LoadMap::from([(edge, 1500)]);
        let json = serde_json::to_value(&loads).unwrap();
        assert_eq!(json["HOST:pc1 -> SW1:Vlan10"], 1500);
    }
}
