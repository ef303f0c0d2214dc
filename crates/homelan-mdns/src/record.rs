use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// One resolved service as handed over by the mDNS facility.
///
/// Every field is an owned copy; nothing borrows from the library that
/// produced it. TXT properties stay as raw bytes so decoding decisions
/// are made in one place (the normalizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Full instance name, e.g. `Living Room._googlecast._tcp.local.`
    pub name: String,
    pub service_type: String,
    pub addresses: Vec<IpAddr>,
    pub port: u16,
    pub hostname: String,
    pub properties: Vec<(Vec<u8>, Vec<u8>)>,
}

/// A device as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    /// Dotted-quad IPv4 addresses; the first one is the primary address.
    pub addresses: Vec<String>,
    pub port: u16,
    pub hostname: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    pub friendly_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DeviceDescriptor {
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }
}

/// The deduplicated outcome of one discovery window, in first-seen order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DiscoveryResult(Vec<DeviceDescriptor>);

impl DiscoveryResult {
    pub(crate) fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self(devices)
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_devices(self) -> Vec<DeviceDescriptor> {
        self.0
    }
}
