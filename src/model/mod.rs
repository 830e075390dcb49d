//! Structured device records and link identities.
//!
//! Devices, interfaces and endpoints are delivered by the configuration
//! parser; links are inferred from interface descriptions by the topology
//! builder.

pub mod device;
pub mod link;

pub use device::{Device, DeviceType, Devices, Endpoint, Interface, VlanId, VlanInfo};
pub use link::{parse_link_tag, EdgeKey, IfaceKey, Link, DEFAULT_BANDWIDTH_KBPS, DEFAULT_LATENCY_MS};
