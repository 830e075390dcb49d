//! IP address and prefix helpers.
//!
//! Interface addresses arrive as raw text from the configuration parser in
//! one of three shapes: `10.0.12.1/24`, `10.0.12.1 255.255.255.0`, or a bare
//! address. [`IpCidr`] normalizes all of them into an address plus prefix
//! length and answers subnet questions over it.

use ipnetwork::{ipv4_mask_to_prefix, IpNetwork};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Errors produced while parsing an address or prefix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid IP address '{0}'")]
    InvalidAddress(String),
    #[error("invalid prefix length '{prefix}' for {addr}")]
    InvalidPrefix { addr: String, prefix: String },
    #[error("invalid netmask '{0}'")]
    InvalidMask(String),
}

/// An interface address together with its prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpCidr(IpNetwork);

impl IpCidr {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, AddressError> {
        IpNetwork::new(addr, prefix)
            .map(IpCidr)
            .map_err(|_| AddressError::InvalidPrefix {
                addr: addr.to_string(),
                prefix: prefix.to_string(),
            })
    }

    /// Parse `addr/len`, `addr mask` or a bare address (host prefix).
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let text = text.trim();

        if let Some((addr, prefix)) = text.split_once('/') {
            let addr = parse_addr(addr)?;
            let prefix = prefix.trim().parse::<u8>().map_err(|_| AddressError::InvalidPrefix {
                addr: addr.to_string(),
                prefix: prefix.to_string(),
            })?;
            return Self::new(addr, prefix);
        }

        let mut parts = text.split_whitespace();
        let addr = parse_addr(parts.next().unwrap_or_default())?;
        match (parts.next(), parts.next()) {
            (None, _) => Ok(IpCidr(IpNetwork::from(addr))),
            (Some(mask), None) if addr.is_ipv4() => Self::new(addr, mask_to_prefix(mask)?),
            _ => Err(AddressError::InvalidAddress(text.to_string())),
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.0.ip()
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    /// The containing network with host bits cleared
    pub fn network(&self) -> IpCidr {
        match IpNetwork::new(self.0.network(), self.0.prefix()) {
            Ok(net) => IpCidr(net),
            Err(_) => *self,
        }
    }

    /// Whether `other` falls inside this address's network
    pub fn contains(&self, other: &IpAddr) -> bool {
        self.0.contains(*other)
    }
}

impl fmt::Display for IpCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.prefix())
    }
}

impl FromStr for IpCidr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_addr(text: &str) -> Result<IpAddr, AddressError> {
    text.trim()
        .parse::<IpAddr>()
        .map_err(|_| AddressError::InvalidAddress(text.trim().to_string()))
}

/// Convert a dotted netmask (`255.255.255.0`) to a prefix length.
///
/// Non-contiguous masks are rejected.
pub fn mask_to_prefix(mask: &str) -> Result<u8, AddressError> {
    let mask_addr = mask
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| AddressError::InvalidMask(mask.to_string()))?;
    ipv4_mask_to_prefix(mask_addr).map_err(|_| AddressError::InvalidMask(mask.to_string()))
}

/// Parse the address part of a gateway or host entry, which may carry a prefix.
pub fn parse_host_addr(text: &str) -> Result<IpAddr, AddressError> {
    IpCidr::parse(text).map(|cidr| cidr.addr())
}
