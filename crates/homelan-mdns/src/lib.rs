//! homelan mDNS: multi-protocol local device discovery.
//!
//! [`Discovery`] runs one bounded browse window across a set of DNS-SD
//! service types and returns the devices it saw, normalized and
//! deduplicated:
//!
//! - **Facility**: [`MdnsFacility`] opens a resolver session; the default
//!   is backed by mdns-sd and owned entirely by one scan.
//! - **Normalizer**: [`normalize`] turns a [`RawRecord`] into a
//!   [`DeviceDescriptor`] without ever failing the scan.
//! - **Deduplicator**: [`Deduplicator`] keeps the first record per
//!   `(primary address or name, service type)`.
//! - **Events**: progress is broadcast as [`ScanEvent`]s.

mod daemon;
pub mod dedup;
pub mod error;
pub mod events;
pub mod facility;
pub mod normalize;
pub mod record;
mod session;
pub mod service_type;

pub use self::daemon::MdnsSdFacility;
pub use self::dedup::{DedupKey, Deduplicator};
pub use self::error::{DiscoveryError, Result};
pub use self::events::ScanEvent;
pub use self::facility::{BrowseSession, MdnsFacility, RecordSink};
pub use self::normalize::normalize;
pub use self::record::{DeviceDescriptor, DiscoveryResult, RawRecord};
pub use self::service_type::ServiceTypeSet;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Smart-home service types browsed when the caller names none.
pub const DEFAULT_SERVICE_TYPES: [&str; 7] = [
    "_airplay._tcp.local.",
    "_raop._tcp.local.",
    "_googlecast._tcp.local.",
    "_hap._tcp.local.",
    "_matter._tcp.local.",
    "_companion-link._tcp.local.",
    "_sleep-proxy._udp.local.",
];

/// AirPlay video and RAOP audio receivers.
pub const AIRPLAY_SERVICE_TYPES: [&str; 2] = ["_airplay._tcp.local.", "_raop._tcp.local."];

/// HomeKit accessories.
pub const HOMEKIT_SERVICE_TYPES: [&str; 1] = ["_hap._tcp.local."];

/// Google Cast / Google Home devices.
pub const GOOGLE_CAST_SERVICE_TYPES: [&str; 1] = ["_googlecast._tcp.local."];

/// Collection window used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity for the broadcast channel used by scan event subscribers.
const BROADCAST_CHANNEL_CAPACITY: usize = 256;

/// The discovery facade. Holds no per-scan state; every call opens and
/// tears down its own resolver session, so calls may run concurrently.
pub struct Discovery {
    facility: Arc<dyn MdnsFacility>,
    event_tx: broadcast::Sender<ScanEvent>,
}

impl Discovery {
    /// Discovery over the mdns-sd facility.
    pub fn new() -> Self {
        Self::with_facility(Arc::new(MdnsSdFacility))
    }

    /// Discovery over a caller-supplied facility.
    pub fn with_facility(facility: Arc<dyn MdnsFacility>) -> Self {
        let (event_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);
        Self { facility, event_tx }
    }

    /// Browse `service_types` (defaults when empty) for the full `timeout`.
    pub async fn discover(
        &self,
        service_types: &ServiceTypeSet,
        timeout: Duration,
    ) -> Result<DiscoveryResult> {
        self.discover_until(service_types, timeout, &CancellationToken::new())
            .await
    }

    /// Like [`Discovery::discover`], but the window closes early when
    /// `cancel` fires. Devices collected so far are still returned.
    pub async fn discover_until(
        &self,
        service_types: &ServiceTypeSet,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<DiscoveryResult> {
        session::run(
            self.facility.as_ref(),
            &self.event_tx,
            service_types,
            timeout,
            cancel,
        )
        .await
    }

    pub async fn scan_airplay(&self, timeout: Duration) -> Result<DiscoveryResult> {
        self.discover(&ServiceTypeSet::airplay(), timeout).await
    }

    pub async fn scan_homekit(&self, timeout: Duration) -> Result<DiscoveryResult> {
        self.discover(&ServiceTypeSet::homekit(), timeout).await
    }

    pub async fn scan_google(&self, timeout: Duration) -> Result<DiscoveryResult> {
        self.discover(&ServiceTypeSet::google_cast(), timeout).await
    }

    /// Subscribe to scan progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.event_tx.subscribe()
    }

    /// Whether mDNS can be used on this host.
    pub fn probe(&self) -> bool {
        self.facility.probe()
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}
