//! Magic packet construction and delivery.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;

use crate::error::{Result, WolError};

const SYNC_STREAM: [u8; 6] = [0xFF; 6];
const MAC_REPETITIONS: usize = 16;

/// Length of a magic packet: sync stream plus 16 copies of the MAC.
pub const MAGIC_PACKET_LEN: usize = 6 + 6 * MAC_REPETITIONS;

/// A 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Parse `aa:bb:cc:dd:ee:ff`, `aa-bb-...`, `aabb.ccdd.eeff` or bare hex.
    pub fn parse(input: &str) -> Result<Self> {
        let hex: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WolError::InvalidMac(input.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| WolError::InvalidMac(input.to_string()))?;
        }
        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl std::str::FromStr for MacAddress {
    type Err = WolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

pub fn magic_packet(mac: &MacAddress) -> Vec<u8> {
    let mut packet = Vec::with_capacity(MAGIC_PACKET_LEN);
    packet.extend_from_slice(&SYNC_STREAM);
    for _ in 0..MAC_REPETITIONS {
        packet.extend_from_slice(&mac.0);
    }
    packet
}

/// What was sent, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeReport {
    pub mac: String,
    pub broadcast: String,
    pub port: u16,
}

/// Send one magic packet for `mac` to `broadcast:port`.
///
/// The MAC is validated before any socket is opened.
pub async fn wake(mac: &str, broadcast: Ipv4Addr, port: u16) -> Result<WakeReport> {
    let parsed = MacAddress::parse(mac)?;
    let packet = magic_packet(&parsed);

    let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_broadcast(true)?;
    let sent = socket
        .send_to(&packet, SocketAddrV4::new(broadcast, port))
        .await?;
    tracing::info!(mac = %parsed, %broadcast, port, bytes = sent, "Magic packet sent");

    Ok(WakeReport {
        mac: mac.to_string(),
        broadcast: broadcast.to_string(),
        port,
    })
}
