//! Links between device interfaces and the keys that identify them.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

/// Capacity assumed when neither side declares a bandwidth
pub const DEFAULT_BANDWIDTH_KBPS: u64 = 100_000;

pub const DEFAULT_LATENCY_MS: f64 = 1.0;

/// `LINK:R1:Gi0/0-R2:Gi0/0`
static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LINK:([A-Za-z0-9_.]+):([^\s:-]+)-([A-Za-z0-9_.]+):([^\s:-]+)")
        .expect("link tag pattern is valid")
});

/// A `(device, interface)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IfaceKey {
    pub device: String,
    pub interface: String,
}

impl IfaceKey {
    pub fn new(device: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            interface: interface.into(),
        }
    }
}

impl fmt::Display for IfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.interface)
    }
}

impl Serialize for IfaceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical identity of an undirected link: the two endpoints sorted.
///
/// Constructing the key from either orientation yields the same value, so a
/// link and its reverse can never both be stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    low: IfaceKey,
    high: IfaceKey,
}

impl EdgeKey {
    pub fn new(a: IfaceKey, b: IfaceKey) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn endpoints(&self) -> (&IfaceKey, &IfaceKey) {
        (&self.low, &self.high)
    }

    /// The endpoint opposite to `side`, if `side` is on this edge
    pub fn peer_of(&self, side: &IfaceKey) -> Option<&IfaceKey> {
        if *side == self.low {
            Some(&self.high)
        } else if *side == self.high {
            Some(&self.low)
        } else {
            None
        }
    }

    pub fn touches_device(&self, hostname: &str) -> bool {
        self.low.device == hostname || self.high.device == hostname
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.low, self.high)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse the first `LINK:<devA>:<ifA>-<devB>:<ifB>` tag in a description
pub fn parse_link_tag(description: &str) -> Option<(IfaceKey, IfaceKey)> {
    let caps = LINK_TAG.captures(description)?;
    Some((
        IfaceKey::new(&caps[1], &caps[2]),
        IfaceKey::new(&caps[3], &caps[4]),
    ))
}

/// A link between two device interfaces
#[derive(Debug)]
pub struct Link {
    pub a: IfaceKey,
    pub b: IfaceKey,
    pub bandwidth_kbps: u64,
    pub latency_ms: f64,
    /// Smaller of the two interface MTUs, when both are known
    pub mtu: Option<u32>,
    up: AtomicBool,
}

impl Link {
    pub fn new(a: IfaceKey, b: IfaceKey) -> Self {
        Self {
            a,
            b,
            bandwidth_kbps: DEFAULT_BANDWIDTH_KBPS,
            latency_ms: DEFAULT_LATENCY_MS,
            mtu: None,
            up: AtomicBool::new(true),
        }
    }

    pub fn with_bandwidth(mut self, kbps: u64) -> Self {
        self.bandwidth_kbps = kbps;
        self
    }

    pub fn with_latency(mut self, ms: f64) -> Self {
        self.latency_ms = ms;
        self
    }

    pub fn with_mtu(mut self, mtu: Option<u32>) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_up(self, up: bool) -> Self {
        self.up.store(up, Ordering::Relaxed);
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.a.clone(), self.b.clone())
    }

    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }

    /// Flip the administrative state; safe while simulation threads read it.
    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::Release);
    }

    /// The endpoint of this link on `hostname` and the opposite endpoint.
    ///
    /// Self-links yield the `a` side as local.
    pub fn orient(&self, hostname: &str) -> Option<(&IfaceKey, &IfaceKey)> {
        if self.a.device == hostname {
            Some((&self.a, &self.b))
        } else if self.b.device == hostname {
            Some((&self.b, &self.a))
        } else {
            None
        }
    }
}

impl Clone for Link {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            b: self.b.clone(),
            bandwidth_kbps: self.bandwidth_kbps,
            latency_ms: self.latency_ms,
            mtu: self.mtu,
            up: AtomicBool::new(self.is_up()),
        }
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Link", 6)?;
        s.serialize_field("a", &self.a)?;
        s.serialize_field("b", &self.b)?;
        s.serialize_field("bandwidth_kbps", &self.bandwidth_kbps)?;
        s.serialize_field("latency_ms", &self.latency_ms)?;
        s.serialize_field("mtu", &self.mtu)?;
        s.serialize_field("up", &self.is_up())?;
        s.end()
    }
}
