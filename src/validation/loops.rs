//! Layer 2 loop detection.

use crate::topology::{cycle_basis, Topology};
use crate::topology::cycles::cycle_labels;

/// Report every fundamental cycle of the device graph as a potential L2
/// loop, each as the ordered `dev:if` labels walked around it.
pub fn detect_layer2_loops(topo: &Topology) -> Vec<Vec<String>> {
    cycle_basis(topo).iter().map(cycle_labels).collect()
}
