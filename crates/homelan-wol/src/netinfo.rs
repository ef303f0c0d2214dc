//! Host network facts for the `info` command.

use std::net::{Ipv4Addr, UdpSocket};

use serde::{Deserialize, Serialize};

/// Public address used only to select the outbound interface; nothing is sent.
const ROUTE_PROBE: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub local_ip: String,
    pub hostname: String,
    pub subnet: String,
    pub broadcast: String,
}

impl NetworkInfo {
    /// Facts for `local_ip`, assuming a /24 network.
    pub fn for_address(local_ip: Ipv4Addr, hostname: String) -> Self {
        let [a, b, c, _] = local_ip.octets();
        Self {
            local_ip: local_ip.to_string(),
            hostname,
            subnet: format!("{}/24", Ipv4Addr::new(a, b, c, 0)),
            broadcast: Ipv4Addr::new(a, b, c, 255).to_string(),
        }
    }
}

pub fn network_info() -> NetworkInfo {
    NetworkInfo::for_address(outbound_ipv4(), host_name())
}

fn outbound_ipv4() -> Ipv4Addr {
    let probe = || -> std::io::Result<Ipv4Addr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect(ROUTE_PROBE)?;
        match socket.local_addr()?.ip() {
            std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Ok(ip),
            other => Err(std::io::Error::other(format!("unusable local address {other}"))),
        }
    };
    probe().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "No outbound route, using loopback");
        Ipv4Addr::LOCALHOST
    })
}

fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
