//! Capacity comparison of aggregated load against link bandwidth.

use log::warn;
use serde::Serialize;
use std::fmt;

use crate::load::{LoadEdge, LoadMap};
use crate::model::EdgeKey;
use crate::topology::Topology;

pub const RECOMMENDATION: &str =
    "Enable secondary path or QoS to reclassify lower-priority traffic.";

/// A structural link whose load exceeds its declared bandwidth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityFinding {
    pub edge: EdgeKey,
    pub load_kbps: u64,
    pub capacity_kbps: u64,
    pub recommendation: String,
}

impl fmt::Display for CapacityFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} carries {} kbps over {} kbps capacity. {}",
            self.edge, self.load_kbps, self.capacity_kbps, self.recommendation
        )
    }
}

/// Compare loads against link bandwidth.
///
/// Only edges that exist in the topology are checked; synthetic host access
/// edges are assumed uncapacitated and never produce a finding.
pub fn capacity_analysis(topo: &Topology, loads: &LoadMap) -> Vec<CapacityFinding> {
    let mut findings = Vec::new();

    for (edge, &load) in loads {
        let LoadEdge::Link(key) = edge else {
            continue;
        };
        let Some(link) = topo.link(key) else {
            continue;
        };

        if load > link.bandwidth_kbps {
            warn!(
                "Link {} overloaded: {} kbps > {} kbps",
                key, load, link.bandwidth_kbps
            );
            findings.push(CapacityFinding {
                edge: key.clone(),
                load_kbps: load,
                capacity_kbps: link.bandwidth_kbps,
                recommendation: RECOMMENDATION.to_string(),
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IfaceKey, Link};

    fn key(a: &str, b: &str) -> EdgeKey {
        EdgeKey::new(IfaceKey::new(a, "Gi0/0"), IfaceKey::new(b, "Gi0/0"))
    }

    #[test]
    fn test_only_structural_edges_are_checked() {
        let mut topo = Topology::new();
        topo.add_link(Link::new(IfaceKey::new("R1", "Gi0/0"), IfaceKey::new("R2", "Gi0/0")).with_bandwidth(1000));

        let loads = LoadMap::from([
            (LoadEdge::access("pc1", IfaceKey::new("SW1", "Vlan10")), 1_000_000),
            (LoadEdge::Link(key("R1", "R2")), 1500),
            (LoadEdge::Link(key("R3", "R4")), 1_000_000),
        ]);

        let findings = capacity_analysis(&topo, &loads);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].edge, key("R2", "R1"));
        assert_eq!(findings[0].load_kbps, 1500);
        assert_eq!(findings[0].capacity_kbps, 1000);
        assert_eq!(findings[0].recommendation, RECOMMENDATION);
    }

    #[test]
    fn test_load_at_capacity_is_fine() {
        let mut topo = Topology::new();
        topo.add_link(Link::new(IfaceKey::new("R1", "Gi0/0"), IfaceKey::new("R2", "Gi0/0")).with_bandwidth(1000));
        let loads = LoadMap::from([(LoadEdge::Link(key("R1", "R2")), 1000)]);
        assert!(capacity_analysis(&topo, &loads).is_empty());
    }
}
