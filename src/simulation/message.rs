//! Discovery messages exchanged between node actors.

use serde::Serialize;

use crate::model::IfaceKey;

/// Neighbor-discovery heartbeat.
///
/// Every message names the interface it was sent from, which is where a
/// reply is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Message {
    Hello { from: IfaceKey },
    HelloAck { from: IfaceKey },
}

impl Message {
    pub fn sender(&self) -> &IfaceKey {
        match self {
            Message::Hello { from } | Message::HelloAck { from } => from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let ack = Message::HelloAck { from: IfaceKey::new("R1", "Gi0/0") };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["type"], "HELLO-ACK");
        assert_eq!(json["from"], "R1:Gi0/0");
        assert_eq!(ack.sender().device, "R1");
    }
}
