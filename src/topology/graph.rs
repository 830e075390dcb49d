//! Topology graph: device nodes, interface-to-interface links and the
//! endpoint registry.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Device, Devices, EdgeKey, Endpoint, IfaceKey, Link};

/// Undirected graph of devices joined by links between their interfaces.
///
/// Edges are stored under their canonical [`EdgeKey`], so a link and its
/// reverse never coexist. After construction only the per-link `up` flag
/// changes; it is atomic, which lets simulation threads share the topology
/// behind an `Arc` while fault injection flips it.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    devices: Devices,
    links: BTreeMap<EdgeKey, Link>,
    endpoints: BTreeMap<String, Endpoint>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a device node
    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(device.hostname.clone(), device);
    }

    /// Add a link edge.
    ///
    /// Returns `false` and leaves the existing edge untouched when the
    /// canonical key is already present.
    pub fn add_link(&mut self, link: Link) -> bool {
        let key = link.key();
        if self.links.contains_key(&key) {
            return false;
        }
        self.links.insert(key, link);
        true
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.insert(endpoint.name.clone(), endpoint);
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn device(&self, hostname: &str) -> Option<&Device> {
        self.devices.get(hostname)
    }

    /// Mutable access for callers that edit a device record after the graph
    /// is built; link attributes are not recomputed.
    pub fn device_mut(&mut self, hostname: &str) -> Option<&mut Device> {
        self.devices.get_mut(hostname)
    }

    pub fn endpoints(&self) -> &BTreeMap<String, Endpoint> {
        &self.endpoints
    }

    pub fn links(&self) -> impl Iterator<Item = (&EdgeKey, &Link)> {
        self.links.iter()
    }

    pub fn node_count(&self) -> usize {
        self.devices.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, key: &EdgeKey) -> Option<&Link> {
        self.links.get(key)
    }

    /// Look up the link joining `a` and `b` in either orientation
    pub fn link_between(&self, a: &IfaceKey, b: &IfaceKey) -> Option<&Link> {
        self.links.get(&EdgeKey::new(a.clone(), b.clone()))
    }

    /// Interfaces on the far side of every link attached to `node`
    pub fn neighbors(&self, node: &IfaceKey) -> Vec<&IfaceKey> {
        self.links
            .keys()
            .filter_map(|key| key.peer_of(node))
            .collect()
    }

    /// Devices reachable over one link from `hostname`, excluding itself
    pub fn device_neighbors<'a>(&'a self, hostname: &'a str) -> BTreeSet<&'a str> {
        self.incident_links(hostname)
            .filter_map(|link| link.orient(hostname))
            .map(|(_, peer)| peer.device.as_str())
            .filter(|peer| *peer != hostname)
            .collect()
    }

    /// Links with `hostname` on either side
    pub fn incident_links<'a>(&'a self, hostname: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |(key, _)| key.touches_device(hostname))
            .map(|(_, link)| link)
    }
}
