use std::collections::HashSet;

use crate::record::{DeviceDescriptor, DiscoveryResult};

/// Identity of a physical device for one service type:
/// primary address if known, else the raw instance name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub primary: String,
    pub service_type: String,
}

impl DedupKey {
    pub fn of(device: &DeviceDescriptor) -> Self {
        Self {
            primary: device
                .primary_address()
                .unwrap_or(device.name.as_str())
                .to_string(),
            service_type: device.service_type.clone(),
        }
    }
}

/// First-write-wins accumulator. Later descriptors with an already-seen
/// key are discarded, never merged.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupKey>,
    devices: Vec<DeviceDescriptor>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a descriptor. Returns `true` if it was kept.
    pub fn offer(&mut self, device: DeviceDescriptor) -> bool {
        if !self.seen.insert(DedupKey::of(&device)) {
            return false;
        }
        self.devices.push(device);
        true
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn finish(self) -> DiscoveryResult {
        DiscoveryResult::new(self.devices)
    }
}
