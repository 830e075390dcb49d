//! Network topology module.
//!
//! This module builds the device graph from interface link hints and
//! provides the graph queries used by validation, load analysis and the
//! simulation engine.

pub mod builder;
pub mod cycles;
pub mod export;
pub mod graph;

// Re-export key types and functions for easier access
pub use builder::{build_from_devices, build_with_endpoints};
pub use cycles::{cycle_basis, Cycle};
pub use export::{summarize, to_dot};
pub use graph::Topology;
