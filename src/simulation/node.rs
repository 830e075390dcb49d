//! Per-device actor running the hello/ack discovery exchange.

use crossbeam_channel::{at, never, tick, Receiver, Select};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::model::{Device, IfaceKey};
use crate::simulation::broker::Broker;
use crate::simulation::cancel::CancellationToken;
use crate::simulation::message::Message;
use crate::simulation::SimulationConfig;
use crate::topology::Topology;

/// Lifecycle of an actor; the only transition is Running to Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeState {
    Running,
    Stopped,
}

/// Message counters observed by one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeStats {
    /// HELLOs and HELLO-ACKs sent
    pub sent: u64,
    /// HELLOs received
    pub received: u64,
    /// HELLOs discarded because the reference packet exceeds the link MTU
    pub dropped: u64,
}

/// One router or switch in the simulation.
///
/// The actor owns the receiving end of every inbox registered for its
/// interfaces; other actors reach it only through the broker.
pub struct NodeActor {
    hostname: String,
    topo: Arc<Topology>,
    broker: Arc<Broker>,
    config: SimulationConfig,
    cancel: CancellationToken,
    inboxes: Vec<(String, Receiver<Message>)>,
    state: NodeState,
    stats: NodeStats,
}

impl NodeActor {
    /// Create the actor and register an inbox for each of its interfaces
    pub fn new(
        device: &Device,
        topo: Arc<Topology>,
        broker: Arc<Broker>,
        config: SimulationConfig,
        cancel: CancellationToken,
    ) -> Self {
        let inboxes = device
            .interfaces
            .keys()
            .map(|ifname| {
                let rx = broker.register(IfaceKey::new(&device.hostname, ifname));
                (ifname.clone(), rx)
            })
            .collect();

        Self {
            hostname: device.hostname.clone(),
            topo,
            broker,
            config,
            cancel,
            inboxes,
            state: NodeState::Running,
            stats: NodeStats::default(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    /// Run until the simulation window elapses or the token is cancelled.
    ///
    /// The actor blocks only in the select over its stop signals, the hello
    /// ticker and its own inboxes, so a node with many interfaces wakes for
    /// whichever one has traffic first.
    pub fn run(mut self) -> NodeStats {
        let inboxes = std::mem::take(&mut self.inboxes);
        let cancel = self.cancel.clone();
        // A window too long to represent never expires; only cancel stops it
        let deadline = match Instant::now().checked_add(self.config.window) {
            Some(when) => at(when),
            None => never(),
        };
        let ticker = tick(self.config.hello_interval);

        let mut sel = Select::new();
        let cancel_idx = sel.recv(cancel.signal());
        let deadline_idx = sel.recv(&deadline);
        let tick_idx = sel.recv(&ticker);
        let first_inbox = tick_idx + 1;
        for (_, rx) in &inboxes {
            sel.recv(rx);
        }

        if cancel.is_cancelled() {
            self.state = NodeState::Stopped;
        } else {
            self.send_hellos();
        }

        while self.state == NodeState::Running {
            let oper = sel.select();
            match oper.index() {
                i if i == cancel_idx => {
                    let _ = oper.recv(cancel.signal());
                    debug!("[{}] cancelled", self.hostname);
                    self.state = NodeState::Stopped;
                }
                i if i == deadline_idx => {
                    let _ = oper.recv(&deadline);
                    self.state = NodeState::Stopped;
                }
                i if i == tick_idx => {
                    let _ = oper.recv(&ticker);
                    self.send_hellos();
                }
                i => {
                    let (ifname, rx) = &inboxes[i - first_inbox];
                    if let Ok(msg) = oper.recv(rx) {
                        self.handle(msg, ifname);
                    }
                }
            }
        }

        debug!("[{}] stopped with {:?}", self.hostname, self.stats);
        self.stats
    }

    /// Send a HELLO to the far side of every up link touching this device.
    ///
    /// Links are found by scanning the whole graph for this hostname on
    /// either side; a link looping back to this device greets both of its
    /// own ends.
    fn send_hellos(&mut self) {
        for link in self.topo.incident_links(&self.hostname) {
            if !link.is_up() {
                continue;
            }
            for (src, dst) in [(&link.a, &link.b), (&link.b, &link.a)] {
                if src.device != self.hostname {
                    continue;
                }
                self.broker.send(dst, Message::Hello { from: src.clone() });
                self.stats.sent += 1;
            }
        }
    }

    fn handle(&mut self, msg: Message, ifname: &str) {
        match msg {
            Message::Hello { from } => {
                self.stats.received += 1;
                let local = IfaceKey::new(&self.hostname, ifname);

                let mtu = self.topo.link_between(&from, &local).and_then(|link| link.mtu);
                if let Some(mtu) = mtu {
                    if self.config.packet_size > mtu {
                        self.stats.dropped += 1;
                        warn!(
                            "[{}] Dropped HELLO from {} due to MTU {} (packet {})",
                            self.hostname, from, mtu, self.config.packet_size
                        );
                        return;
                    }
                }

                self.broker.send(&from, Message::HelloAck { from: local });
                self.stats.sent += 1;
            }
            // Adjacency bookkeeping is not modeled
            Message::HelloAck { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Devices, Interface, Link};
    use std::time::Duration;

    fn setup(mtu: Option<u32>) -> (Devices, Arc<Topology>) {
        let r1 = Device::router("R1").with_interface(Interface::new("Gi0/0"));
        let r2 = Device::router("R2").with_interface(Interface::new("Gi0/0"));
        let mut topo = Topology::new();
        topo.add_device(r1.clone());
        topo.add_device(r2.clone());
        topo.add_link(Link::new(IfaceKey::new("R1", "Gi0/0"), IfaceKey::new("R2", "Gi0/0")).with_mtu(mtu));

        let devices = [r1, r2].into_iter().map(|d| (d.hostname.clone(), d)).collect();
        (devices, Arc::new(topo))
    }

    fn actor(devices: &Devices, host: &str, topo: &Arc<Topology>, broker: &Arc<Broker>) -> NodeActor {
        NodeActor::new(
            &devices[host],
            Arc::clone(topo),
            Arc::clone(broker),
            SimulationConfig::default(),
            CancellationToken::new(),
        )
    }

    #[test]
    fn test_new_registers_interfaces() {
        let (devices, topo) = setup(None);
        let broker = Arc::new(Broker::new());
        let node = actor(&devices, "R1", &topo, &broker);

        assert!(broker.is_registered(&IfaceKey::new("R1", "Gi0/0")));
        assert_eq!(node.state(), NodeState::Running);
        assert_eq!(node.hostname(), "R1");
    }

    #[test]
    fn test_hello_is_acked() {
        let (devices, topo) = setup(Some(1500));
        let broker = Arc::new(Broker::new());
        let mut r1 = actor(&devices, "R1", &topo, &broker);
        let mut r2 = actor(&devices, "R2", &topo, &broker);

        r1.send_hellos();
        assert_eq!(r1.stats().sent, 1);

        let msg = broker.recv(&IfaceKey::new("R2", "Gi0/0"), Duration::from_millis(10)).unwrap();
        r2.handle(msg, "Gi0/0");
        assert_eq!(r2.stats(), NodeStats { sent: 1, received: 1, dropped: 0 });

        let ack = broker.recv(&IfaceKey::new("R1", "Gi0/0"), Duration::from_millis(10)).unwrap();
        assert_eq!(ack, Message::HelloAck { from: IfaceKey::new("R2", "Gi0/0") });
        r1.handle(ack, "Gi0/0");
        assert_eq!(r1.stats(), NodeStats { sent: 1, received: 0, dropped: 0 });
    }

    #[test]
    fn test_oversized_hello_is_dropped() {
        let (devices, topo) = setup(Some(1400));
        let broker = Arc::new(Broker::new());
        let mut r2 = actor(&devices, "R2", &topo, &broker);

        r2.handle(Message::Hello { from: IfaceKey::new("R1", "Gi0/0") }, "Gi0/0");
        assert_eq!(r2.stats(), NodeStats { sent: 0, received: 1, dropped: 1 });
    }

    #[test]
    fn test_down_link_is_not_greeted() {
        let (devices, topo) = setup(None);
        let broker = Arc::new(Broker::new());
        let mut r1 = actor(&devices, "R1", &topo, &broker);

        for (_, link) in topo.links() {
            link.set_up(false);
        }
        r1.send_hellos();
        assert_eq!(r1.stats().sent, 0);
    }

    #[test]
    fn test_unknown_sender_still_acked() {
        let (devices, topo) = setup(Some(1000));
        let broker = Arc::new(Broker::new());
        let mut r2 = actor(&devices, "R2", &topo, &broker);

        // No link joins R9 to R2, so no MTU applies
        r2.handle(Message::Hello { from: IfaceKey::new("R9", "Gi0/0") }, "Gi0/0");
        assert_eq!(r2.stats(), NodeStats { sent: 1, received: 1, dropped: 0 });
    }

    #[test]
    fn test_unbounded_window_stops_on_cancel() {
        let (devices, topo) = setup(None);
        let broker = Arc::new(Broker::new());
        let cancel = CancellationToken::new();
        let config = SimulationConfig {
            window: Duration::MAX,
            ..SimulationConfig::default()
        };
        let node = NodeActor::new(&devices["R1"], Arc::clone(&topo), broker, config, cancel.clone());

        let handle = std::thread::spawn(move || node.run());
        std::thread::sleep(Duration::from_millis(50));
        cancel.cancel();

        let stats = handle.join().expect("actor should not panic");
        assert!(stats.sent >= 1);
    }
}
