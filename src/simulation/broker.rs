//! In-process message broker with one FIFO inbox per device interface.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::model::IfaceKey;
use crate::simulation::message::Message;

struct Inbox {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

/// Routes messages by `(device, interface)` key.
///
/// Each inbox is its own synchronized channel, so senders never contend with
/// each other across inboxes; the registration map is only written while
/// actors are being set up.
#[derive(Default)]
pub struct Broker {
    inboxes: RwLock<HashMap<IfaceKey, Inbox>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty inbox for `key` and return its receiving end.
    ///
    /// Registering a key twice keeps the existing inbox and returns another
    /// handle to it.
    pub fn register(&self, key: IfaceKey) -> Receiver<Message> {
        let mut inboxes = self.inboxes.write().unwrap_or_else(PoisonError::into_inner);
        inboxes
            .entry(key)
            .or_insert_with(|| {
                let (tx, rx) = unbounded();
                Inbox { tx, rx }
            })
            .rx
            .clone()
    }

    pub fn is_registered(&self, key: &IfaceKey) -> bool {
        self.inboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inboxes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueue `msg` for `dst`. Unregistered destinations drop the message.
    ///
    /// Returns whether the message was queued.
    pub fn send(&self, dst: &IfaceKey, msg: Message) -> bool {
        let inboxes = self.inboxes.read().unwrap_or_else(PoisonError::into_inner);
        match inboxes.get(dst) {
            Some(inbox) => inbox.tx.send(msg).is_ok(),
            None => false,
        }
    }

    /// Wait up to `timeout` for the next message addressed to `key`
    pub fn recv(&self, key: &IfaceKey, timeout: Duration) -> Option<Message> {
        let rx = {
            let inboxes = self.inboxes.read().unwrap_or_else(PoisonError::into_inner);
            inboxes.get(key)?.rx.clone()
        };
        match rx.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn hello(dev: &str) -> Message {
        Message::Hello { from: IfaceKey::new(dev, "Gi0/0") }
    }

    #[test]
    fn test_fifo_per_inbox() {
        let broker = Broker::new();
        let key = IfaceKey::new("R2", "Gi0/0");
        broker.register(key.clone());

        assert!(broker.send(&key, hello("R1")));
        assert!(broker.send(&key, hello("R3")));

        let timeout = Duration::from_millis(10);
        assert_eq!(broker.recv(&key, timeout), Some(hello("R1")));
        assert_eq!(broker.recv(&key, timeout), Some(hello("R3")));
        assert_eq!(broker.recv(&key, timeout), None);
    }

    #[test]
    fn test_unregistered_destination_drops() {
        let broker = Broker::new();
        assert!(!broker.send(&IfaceKey::new("R9", "Gi0/0"), hello("R1")));
        assert_eq!(broker.recv(&IfaceKey::new("R9", "Gi0/0"), Duration::ZERO), None);
        assert!(broker.is_empty());
    }

    #[test]
    fn test_recv_is_bounded() {
        let broker = Broker::new();
        let key = IfaceKey::new("R1", "Gi0/0");
        broker.register(key.clone());

        let start = Instant::now();
        assert_eq!(broker.recv(&key, Duration::from_millis(30)), None);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_reregister_keeps_queue() {
        let broker = Broker::new();
        let key = IfaceKey::new("R1", "Gi0/0");
        let rx = broker.register(key.clone());
        broker.send(&key, hello("R2"));
        let again = broker.register(key.clone());

        assert_eq!(broker.len(), 1);
        assert_eq!(again.try_recv().ok(), Some(hello("R2")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cross_thread_delivery() {
        let broker = Arc::new(Broker::new());
        let key = IfaceKey::new("R2", "Gi0/0");
        let rx = broker.register(key.clone());

        let sender = {
            let broker = Arc::clone(&broker);
            let key = key.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    broker.send(&key, hello("R1"));
                }
            })
        };
        sender.join().unwrap();

        assert_eq!(rx.try_iter().count(), 100);
    }
}
