//! Graph export for external renderers.

use serde::Serialize;

use crate::model::{DeviceType, Link};
use crate::topology::graph::Topology;

/// Node and edge lists in a renderer-neutral shape
#[derive(Debug, Clone, Serialize)]
pub struct TopologySummary<'a> {
    pub nodes: Vec<NodeSummary<'a>>,
    pub links: Vec<&'a Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary<'a> {
    pub hostname: &'a str,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub interfaces: usize,
    pub degree: usize,
}

pub fn summarize(topo: &Topology) -> TopologySummary<'_> {
    let nodes = topo
        .devices()
        .values()
        .map(|device| NodeSummary {
            hostname: &device.hostname,
            device_type: device.device_type,
            interfaces: device.interfaces.len(),
            degree: topo.incident_links(&device.hostname).count(),
        })
        .collect();

    TopologySummary {
        nodes,
        links: topo.links().map(|(_, link)| link).collect(),
    }
}

/// Generate GraphViz DOT format for visualization
pub fn to_dot(topo: &Topology) -> String {
    let mut dot = String::new();
    dot.push_str("graph Topology {\n");
    dot.push_str("    layout=neato;\n");
    dot.push_str("    overlap=false;\n");
    dot.push_str("    node [style=filled];\n\n");

    for device in topo.devices().values() {
        let (shape, color) = match device.device_type {
            DeviceType::Router => ("circle", "lightblue"),
            DeviceType::Switch => ("box", "palegreen"),
        };
        dot.push_str(&format!(
            "    \"{}\" [shape={}, fillcolor={}];\n",
            device.hostname, shape, color
        ));
    }

    dot.push('\n');

    for (_, link) in topo.links() {
        let style = if link.is_up() { "solid" } else { "dashed" };
        let mtu = link.mtu.map(|m| format!(" mtu {}", m)).unwrap_or_default();
        dot.push_str(&format!(
            "    \"{}\" -- \"{}\" [taillabel=\"{}\", headlabel=\"{}\", label=\"{} kbps{}\", style={}];\n",
            link.a.device,
            link.b.device,
            link.a.interface,
            link.b.interface,
            link.bandwidth_kbps,
            mtu,
            style
        ));
    }

    dot.push_str("}\n");
    dot
}
