//! Cycle basis of the device graph.
//!
//! Vertices are devices and every link is an edge, so two parallel links
//! between the same pair of devices form a cycle, as does a link looping
//! back to the same device. The basis is derived from a BFS spanning forest:
//! each link outside the forest closes exactly one fundamental cycle, giving
//! `links - devices + components` cycles in total.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::{IfaceKey, Link};
use crate::topology::graph::Topology;

/// One fundamental cycle, as the interfaces walked around it in order
pub type Cycle = Vec<IfaceKey>;

/// Compute the cycle basis of the topology's device graph.
///
/// Each cycle starts at one side of its closing link and lists both
/// interfaces of every link it traverses, ending back on the starting device.
pub fn cycle_basis(topo: &Topology) -> Vec<Cycle> {
    let links: Vec<&Link> = topo.links().map(|(_, link)| link).collect();
    if links.is_empty() {
        return Vec::new();
    }

    let mut adjacency: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, link) in links.iter().enumerate() {
        adjacency.entry(link.a.device.as_str()).or_default().push(idx);
        adjacency.entry(link.b.device.as_str()).or_default().push(idx);
    }

    // vertex -> (parent vertex, tree link, depth)
    let mut tree: BTreeMap<&str, (Option<(&str, usize)>, usize)> = BTreeMap::new();
    let mut tree_links: BTreeSet<usize> = BTreeSet::new();

    for &root in adjacency.keys() {
        if tree.contains_key(root) {
            continue;
        }
        tree.insert(root, (None, 0));
        let mut queue = VecDeque::from([root]);

        while let Some(vertex) = queue.pop_front() {
            let depth = tree[vertex].1;
            for &idx in &adjacency[vertex] {
                let Some((_, peer)) = links[idx].orient(vertex) else {
                    continue;
                };
                let next = peer.device.as_str();
                if next == vertex || tree.contains_key(next) {
                    continue;
                }
                tree.insert(next, (Some((vertex, idx)), depth + 1));
                tree_links.insert(idx);
                queue.push_back(next);
            }
        }
    }

    let mut cycles = Vec::new();
    for (idx, link) in links.iter().enumerate() {
        if tree_links.contains(&idx) {
            continue;
        }
        cycles.push(close_cycle(link, &links, &tree));
    }
    cycles
}

/// Walk from `link.a` across `link` to `link.b`, then back through the
/// spanning tree to `link.a`'s device.
fn close_cycle(
    link: &Link,
    links: &[&Link],
    tree: &BTreeMap<&str, (Option<(&str, usize)>, usize)>,
) -> Cycle {
    let mut cycle = vec![link.a.clone(), link.b.clone()];
    if link.a.device == link.b.device {
        return cycle;
    }

    let mut up = link.b.device.as_str();
    let mut down = link.a.device.as_str();
    let mut descent: Vec<usize> = Vec::new();

    // Climb both sides to their lowest common ancestor
    while up != down {
        if tree[up].1 >= tree[down].1 {
            let Some((parent, idx)) = tree[up].0 else { break };
            push_hop(&mut cycle, links[idx], up, parent);
            up = parent;
        } else {
            let Some((parent, idx)) = tree[down].0 else { break };
            descent.push(idx);
            down = parent;
        }
    }

    // Descend from the ancestor back to the starting device
    let mut at = down;
    for idx in descent.into_iter().rev() {
        let Some((_, child)) = links[idx].orient(at) else { break };
        let child = child.device.as_str();
        push_hop(&mut cycle, links[idx], at, child);
        at = child;
    }
    cycle
}

/// Append the interfaces of `link` as traversed from device `from` to `to`
fn push_hop(cycle: &mut Cycle, link: &Link, from: &str, to: &str) {
    if let Some((local, peer)) = link.orient(from) {
        debug_assert_eq!(peer.device, to);
        cycle.push(local.clone());
        cycle.push(peer.clone());
    }
}

/// Render a cycle as `dev:if` labels
pub fn cycle_labels(cycle: &Cycle) -> Vec<String> {
    cycle.iter().map(|key| key.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(a: (&str, &str), b: (&str, &str)) -> Link {
        Link::new(IfaceKey::new(a.0, a.1), IfaceKey::new(b.0, b.1))
    }

    fn devices_in(cycle: &Cycle) -> BTreeSet<&str> {
        cycle.iter().map(|key| key.device.as_str()).collect()
    }

    #[test]
    fn test_point_to_point_has_no_cycle() {
        let mut topo = Topology::new();
        topo.add_link(link(("R1", "Gi0/0"), ("R2", "Gi0/0")));
        assert!(cycle_basis(&topo).is_empty());
        assert!(cycle_basis(&Topology::new()).is_empty());
    }

    #[test]
    fn test_triangle_has_one_cycle() {
        let mut topo = Topology::new();
        topo.add_link(link(("R1", "Gi0/0"), ("R2", "Gi0/0")));
        topo.add_link(link(("R2", "Gi0/1"), ("R3", "Gi0/0")));
        topo.add_link(link(("R3", "Gi0/1"), ("R1", "Gi0/1")));

        let cycles = cycle_basis(&topo);
        assert_eq!(cycles.len(), 1);
        assert_eq!(devices_in(&cycles[0]), BTreeSet::from(["R1", "R2", "R3"]));
        assert_eq!(cycles[0].len(), 6);

        // Walk returns to where it started
        let first = &cycles[0][0];
        let last = cycles[0].last().unwrap();
        assert_eq!(first.device, last.device);
    }

    #[test]
    fn test_cycle_walk_is_contiguous() {
        let mut topo = Topology::new();
        topo.add_link(link(("A", "e0"), ("B", "e0")));
        topo.add_link(link(("B", "e1"), ("C", "e0")));
        topo.add_link(link(("C", "e1"), ("D", "e0")));
        topo.add_link(link(("D", "e1"), ("A", "e1")));

        let cycles = cycle_basis(&topo);
        assert_eq!(cycles.len(), 1);
        let cycle = &cycles[0];
        // Consecutive hops meet on the same device
        for hop in cycle.chunks(2).collect::<Vec<_>>().windows(2) {
            assert_eq!(hop[0][1].device, hop[1][0].device);
        }
    }

    #[test]
    fn test_parallel_links_and_self_loop() {
        let mut topo = Topology::new();
        topo.add_link(link(("SW1", "Gi0/1"), ("SW2", "Gi0/1")));
        topo.add_link(link(("SW1", "Gi0/2"), ("SW2", "Gi0/2")));
        topo.add_link(link(("SW3", "Gi0/1"), ("SW3", "Gi0/2")));

        let cycles = cycle_basis(&topo);
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().any(|c| devices_in(c) == BTreeSet::from(["SW1", "SW2"])));
        assert!(cycles.iter().any(|c| c.len() == 2 && devices_in(c) == BTreeSet::from(["SW3"])));
    }

    #[test]
    fn test_basis_size_matches_rank() {
        // Two triangles sharing an edge: 5 links, 4 devices, 1 component
        let mut topo = Topology::new();
        topo.add_link(link(("A", "1"), ("B", "1")));
        topo.add_link(link(("B", "2"), ("C", "1")));
        topo.add_link(link(("C", "2"), ("A", "2")));
        topo.add_link(link(("B", "3"), ("D", "1")));
        topo.add_link(link(("D", "2"), ("C", "3")));

        let cycles = cycle_basis(&topo);
        assert_eq!(cycles.len(), 2);
        assert!(cycle_labels(&cycles[0]).iter().all(|label| label.contains(':')));
    }
}
