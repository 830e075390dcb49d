//! Topology construction from interface description hints.

use log::{debug, info};

use crate::model::{parse_link_tag, Devices, EdgeKey, Endpoint, IfaceKey, Link, DEFAULT_BANDWIDTH_KBPS};
use crate::topology::graph::Topology;

/// Build a topology from parsed device records.
///
/// A link is created whenever an interface description carries a
/// `LINK:<devA>:<ifA>-<devB>:<ifB>` tag. Both sides of a link usually declare
/// the same tag, so tags are de-duplicated on their canonical key. Tags that
/// name an unknown device or interface are skipped without error.
///
/// # Arguments
/// * `devices` - Device records keyed by hostname
///
/// # Returns
/// The topology with every device as a node and one edge per resolved tag
pub fn build_from_devices(devices: &Devices) -> Topology {
    let mut topo = Topology::new();
    for device in devices.values() {
        topo.add_device(device.clone());
    }

    let mut skipped = 0usize;
    for device in devices.values() {
        for (ifname, iface) in &device.interfaces {
            let Some(description) = iface.description.as_deref() else {
                continue;
            };
            if !description.contains("LINK:") {
                continue;
            }

            let Some((a, b)) = parse_link_tag(description) else {
                debug!("{}:{} has a malformed link tag '{}'", device.hostname, ifname, description);
                skipped += 1;
                continue;
            };

            if topo.link(&EdgeKey::new(a.clone(), b.clone())).is_some() {
                continue;
            }

            match resolve_link(devices, a, b) {
                Some(link) => {
                    topo.add_link(link);
                }
                None => skipped += 1,
            }
        }
    }

    info!(
        "Built topology with {} nodes and {} links ({} link tags skipped)",
        topo.node_count(),
        topo.link_count(),
        skipped
    );
    topo
}

/// Build a topology and register endpoints in one step
pub fn build_with_endpoints<'a>(
    devices: &Devices,
    endpoints: impl IntoIterator<Item = &'a Endpoint>,
) -> Topology {
    let mut topo = build_from_devices(devices);
    for endpoint in endpoints {
        topo.add_endpoint(endpoint.clone());
    }
    topo
}

/// Resolve link attributes from the two interface records
fn resolve_link(devices: &Devices, a: IfaceKey, b: IfaceKey) -> Option<Link> {
    let Some(a_iface) = devices.get(&a.device).and_then(|d| d.interface(&a.interface)) else {
        debug!("Link tag references unknown interface {}", a);
        return None;
    };
    let Some(b_iface) = devices.get(&b.device).and_then(|d| d.interface(&b.interface)) else {
        debug!("Link tag references unknown interface {}", b);
        return None;
    };

    let mtu = match (a_iface.mtu, b_iface.mtu) {
        (Some(x), Some(y)) => Some(x.min(y)),
        _ => None,
    };
    let bandwidth = a_iface.bandwidth_kbps.unwrap_or(DEFAULT_BANDWIDTH_KBPS);

    Some(Link::new(a, b).with_bandwidth(bandwidth).with_mtu(mtu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, Interface};

    fn pair(tag_both_sides: bool) -> Devices {
        let r1 = Device::router("R1").with_interface(
            Interface::new("Gi0/0")
                .with_mtu(1500)
                .with_bandwidth(10_000)
                .with_description("LINK:R1:Gi0/0-R2:Gi0/0"),
        );
        let mut r2_if = Interface::new("Gi0/0").with_mtu(1400);
        if tag_both_sides {
            r2_if = r2_if.with_description("LINK:R2:Gi0/0-R1:Gi0/0");
        }
        let r2 = Device::router("R2").with_interface(r2_if);

        [r1, r2].into_iter().map(|d| (d.hostname.clone(), d)).collect()
    }

    #[test]
    fn test_reciprocal_tags_yield_one_edge() {
        let topo = build_from_devices(&pair(true));
        assert_eq!(topo.node_count(), 2);
        assert_eq!(topo.link_count(), 1);
    }

    #[test]
    fn test_link_attributes() {
        let topo = build_from_devices(&pair(false));
        let link = topo
            .link_between(&IfaceKey::new("R1", "Gi0/0"), &IfaceKey::new("R2", "Gi0/0"))
            .unwrap();
        assert_eq!(link.bandwidth_kbps, 10_000);
        assert_eq!(link.mtu, Some(1400));
        assert!(link.is_up());
    }

    #[test]
    fn test_bandwidth_comes_from_declaring_side() {
        // R2 declares the tag with itself first, so R2's (absent) bandwidth wins
        let r1 = Device::router("R1").with_interface(Interface::new("Gi0/0").with_bandwidth(10_000));
        let r2 = Device::router("R2").with_interface(
            Interface::new("Gi0/0").with_mtu(1500).with_description("LINK:R2:Gi0/0-R1:Gi0/0"),
        );
        let devices: Devices = [r1, r2].into_iter().map(|d| (d.hostname.clone(), d)).collect();

        let topo = build_from_devices(&devices);
        let link = topo
            .link_between(&IfaceKey::new("R1", "Gi0/0"), &IfaceKey::new("R2", "Gi0/0"))
            .unwrap();
        assert_eq!(link.bandwidth_kbps, DEFAULT_BANDWIDTH_KBPS);
        assert_eq!(link.mtu, None);
    }

    #[test]
    fn test_unresolvable_tags_are_skipped() {
        let r1 = Device::router("R1")
            .with_interface(Interface::new("Gi0/0").with_description("LINK:R1:Gi0/0-R9:Gi0/0"))
            .with_interface(Interface::new("Gi0/1").with_description("LINK:R1:Gi0/1-R2:Gi9/9"))
            .with_interface(Interface::new("Gi0/2").with_description("LINK:garbage"));
        let r2 = Device::router("R2").with_interface(Interface::new("Gi0/0"));
        let devices: Devices = [r1, r2].into_iter().map(|d| (d.hostname.clone(), d)).collect();

        let topo = build_from_devices(&devices);
        assert_eq!(topo.node_count(), 2);
        assert_eq!(topo.link_count(), 0);
    }
}
