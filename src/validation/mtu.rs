//! MTU consistency across links.

use serde::Serialize;
use std::fmt;

use crate::model::IfaceKey;
use crate::topology::Topology;

/// Two ends of a link configured with different MTUs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MtuMismatch {
    pub a: IfaceKey,
    pub a_mtu: u32,
    pub b: IfaceKey,
    pub b_mtu: u32,
}

impl fmt::Display for MtuMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MTU mismatch {}({}) <-> {}({})",
            self.a, self.a_mtu, self.b, self.b_mtu
        )
    }
}

/// Detect links whose endpoint interface MTUs do not match.
///
/// MTUs are read from the topology's current device records rather than the
/// negotiated value stored on the link, so edits made after the graph was
/// built are honored.
pub fn check_mtu_mismatches(topo: &Topology) -> Vec<MtuMismatch> {
    let current_mtu = |key: &IfaceKey| {
        topo.device(&key.device)
            .and_then(|device| device.interface(&key.interface))
            .and_then(|iface| iface.mtu)
    };

    topo.links()
        .filter_map(|(_, link)| {
            let a_mtu = current_mtu(&link.a)?;
            let b_mtu = current_mtu(&link.b)?;
            (a_mtu != b_mtu).then(|| MtuMismatch {
                a: link.a.clone(),
                a_mtu,
                b: link.b.clone(),
                b_mtu,
            })
        })
        .collect()
}
