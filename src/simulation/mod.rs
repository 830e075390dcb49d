//! Concurrent discovery simulation.
//!
//! Every device runs as its own [`NodeActor`] on a dedicated OS thread. Actors
//! exchange HELLO and HELLO-ACK messages through a shared [`Broker`] over the
//! links of a shared [`Topology`], and each one reports how many messages it
//! sent, received and dropped.

pub mod broker;
pub mod cancel;
pub mod message;
pub mod node;

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::model::Devices;
use crate::topology::Topology;

pub use broker::Broker;
pub use cancel::CancellationToken;
pub use message::Message;
pub use node::{NodeActor, NodeState, NodeStats};

/// Reference packet size checked against link MTUs, in bytes
pub const DEFAULT_PACKET_SIZE: u32 = 1500;

/// Timing and sizing of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How long every actor runs (e.g. "5s", "500ms")
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Period between HELLO rounds
    #[serde(with = "humantime_serde")]
    pub hello_interval: Duration,
    pub packet_size: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5),
            hello_interval: Duration::from_secs(1),
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }
}

/// Per-hostname counters of a finished run
pub type SimulationStats = BTreeMap<String, NodeStats>;

/// Run the simulation for the configured window.
///
/// # Arguments
/// * `devices` - Devices to simulate, one actor each
/// * `topo` - Shared topology; link state flags are read live
/// * `config` - Window, hello interval and reference packet size
///
/// # Returns
/// Stats for every device. The run itself never fails.
pub fn run_simulation(
    devices: &Devices,
    topo: Arc<Topology>,
    config: &SimulationConfig,
) -> SimulationStats {
    run_simulation_with_cancel(devices, topo, config, CancellationToken::new())
}

/// Like [`run_simulation`], but stops every actor early once `cancel` fires
pub fn run_simulation_with_cancel(
    devices: &Devices,
    topo: Arc<Topology>,
    config: &SimulationConfig,
    cancel: CancellationToken,
) -> SimulationStats {
    let broker = Arc::new(Broker::new());

    // All inboxes must exist before the first HELLO goes out
    let actors: Vec<NodeActor> = devices
        .values()
        .map(|device| {
            NodeActor::new(
                device,
                Arc::clone(&topo),
                Arc::clone(&broker),
                config.clone(),
                cancel.clone(),
            )
        })
        .collect();

    info!(
        "Starting simulation: {} devices, {} inboxes, window {:?}, hello every {:?}, packet {} bytes",
        actors.len(),
        broker.len(),
        config.window,
        config.hello_interval,
        config.packet_size
    );

    let mut stats = SimulationStats::new();
    let mut handles = Vec::with_capacity(actors.len());

    for actor in actors {
        let hostname = actor.hostname().to_string();
        let spawned = thread::Builder::new()
            .name(format!("node-{}", hostname))
            .spawn(move || actor.run());

        match spawned {
            Ok(handle) => handles.push((hostname, handle)),
            Err(e) => {
                error!("Failed to start actor for {}: {}", hostname, e);
                stats.insert(hostname, NodeStats::default());
            }
        }
    }

    for (hostname, handle) in handles {
        let node_stats = handle.join().unwrap_or_else(|_| {
            error!("Actor for {} panicked; reporting zeroed stats", hostname);
            NodeStats::default()
        });
        stats.insert(hostname, node_stats);
    }

    let totals = stats.values().fold(NodeStats::default(), |acc, s| NodeStats {
        sent: acc.sent + s.sent,
        received: acc.received + s.received,
        dropped: acc.dropped + s.dropped,
    });
    info!(
        "Simulation finished: {} sent, {} received, {} dropped",
        totals.sent, totals.received, totals.dropped
    );
    stats
}
