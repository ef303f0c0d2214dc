//! The seam between the discovery session and the mDNS implementation.
//!
//! [`crate::daemon::MdnsSdFacility`] is the production implementation;
//! tests substitute a scripted one.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::record::RawRecord;

/// Where a browse delivers resolved records. Every browse in a session
/// shares one sink, so the session consumes them from a single queue.
pub type RecordSink = mpsc::UnboundedSender<RawRecord>;

/// A local multicast-DNS facility.
pub trait MdnsFacility: Send + Sync {
    /// Open one resolver session.
    ///
    /// Fails with [`crate::DiscoveryError::FacilityUnavailable`] when mDNS
    /// cannot be used on this host. No network activity happens before
    /// this returns `Ok`.
    fn open(&self) -> Result<Box<dyn BrowseSession>>;

    /// Whether a resolver session can be opened right now.
    fn probe(&self) -> bool {
        match self.open() {
            Ok(_session) => true,
            Err(e) => {
                tracing::debug!(error = %e, "mDNS probe failed");
                false
            }
        }
    }
}

/// An open resolver session.
///
/// Dropping the session stops every browse it started and releases its
/// sockets, so every exit path of a scan tears it down.
pub trait BrowseSession: Send {
    /// Start browsing one service type, pushing each newly resolved record
    /// into `sink` until the session is dropped.
    ///
    /// Must be called from within a Tokio runtime.
    fn browse(&mut self, service_type: &str, sink: RecordSink) -> Result<()>;
}
