//! Shared utilities: address parsing and duration parsing.

pub mod duration;
pub mod ip_utils;

pub use duration::parse_duration;
pub use ip_utils::{mask_to_prefix, AddressError, IpCidr};
