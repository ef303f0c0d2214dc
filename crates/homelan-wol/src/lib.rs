//! homelan WoL: Wake-on-LAN and host network facts.
//!
//! [`wake`] broadcasts a magic packet for one MAC address. [`network_info`]
//! reports the outbound IPv4 address of this host and the /24 it sits in.

pub mod error;
pub mod magic;
pub mod netinfo;

pub use self::error::{Result, WolError};
pub use self::magic::{magic_packet, wake, MacAddress, WakeReport};
pub use self::netinfo::{network_info, NetworkInfo};

use std::net::Ipv4Addr;

/// Limited broadcast, reaching every host on the local link.
pub const DEFAULT_BROADCAST: Ipv4Addr = Ipv4Addr::BROADCAST;

/// The discard port, conventionally used for magic packets.
pub const DEFAULT_PORT: u16 = 9;
