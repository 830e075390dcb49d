//! Link fault injection.
//!
//! A fault is named by the two link endpoints, `R1-Gi0/0-R2-Gi0/0`. Either
//! ordering of the endpoints matches, and bringing an already-down link down
//! again still succeeds.

use log::info;
use std::fmt;
use std::str::FromStr;

use crate::model::{EdgeKey, IfaceKey};
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultError {
    #[error("malformed link spec '{0}' (expected <devA>-<ifA>-<devB>-<ifB>)")]
    MalformedSpec(String),
    #[error("link {0} not found")]
    LinkNotFound(LinkSpec),
}

/// The two endpoints named by a fault spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub a: IfaceKey,
    pub b: IfaceKey,
}

impl FromStr for LinkSpec {
    type Err = FaultError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        let trimmed = trimmed.strip_prefix("link:").unwrap_or(trimmed);
        let parts: Vec<&str> = trimmed.split('-').collect();

        match parts.as_slice() {
            [a_dev, a_if, b_dev, b_if] if parts.iter().all(|p| !p.is_empty()) => Ok(LinkSpec {
                a: IfaceKey::new(*a_dev, *a_if),
                b: IfaceKey::new(*b_dev, *b_if),
            }),
            _ => Err(FaultError::MalformedSpec(spec.to_string())),
        }
    }
}

impl fmt::Display for LinkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.a.device, self.a.interface, self.b.device, self.b.interface
        )
    }
}

impl LinkSpec {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.a.clone(), self.b.clone())
    }
}

/// Turn down the link named by `spec`.
///
/// # Arguments
/// * `topo` - Topology holding the link; only the link's `up` flag changes
/// * `spec` - `<devA>-<ifA>-<devB>-<ifB>`, optionally prefixed with `link:`
///
/// # Returns
/// * `Ok(())` if the link exists (whether or not it was already down)
/// * `Err(FaultError)` if the spec is malformed or names no link
pub fn inject_link_fault(topo: &Topology, spec: &str) -> Result<(), FaultError> {
    set_link_state(topo, spec, false)
}

/// Bring the link named by `spec` back up
pub fn restore_link(topo: &Topology, spec: &str) -> Result<(), FaultError> {
    set_link_state(topo, spec, true)
}

fn set_link_state(topo: &Topology, spec: &str, up: bool) -> Result<(), FaultError> {
    let parsed: LinkSpec = spec.parse()?;
    let link = topo
        .link(&parsed.key())
        .ok_or_else(|| FaultError::LinkNotFound(parsed.clone()))?;

    link.set_up(up);
    info!("Link {} is now {}", parsed, if up { "UP" } else { "DOWN" });
    Ok(())
}
