use std::time::Duration;

use mdns_sd::{ResolvedService, ServiceDaemon, ServiceEvent};

use crate::error::{DiscoveryError, Result};
use crate::facility::{BrowseSession, MdnsFacility, RecordSink};
use crate::record::RawRecord;

/// Upper bound on waiting for the daemon thread to confirm it has closed
/// its sockets.
const SHUTDOWN_CONFIRM_TIMEOUT: Duration = Duration::from_secs(1);

/// [`MdnsFacility`] backed by the mdns-sd daemon.
///
/// mdns_sd types stay inside this file. Each session owns its own
/// `ServiceDaemon`; nothing is shared between scans.
#[derive(Debug, Default, Clone, Copy)]
pub struct MdnsSdFacility;

impl MdnsFacility for MdnsSdFacility {
    fn open(&self) -> Result<Box<dyn BrowseSession>> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| DiscoveryError::FacilityUnavailable(e.to_string()))?;
        tracing::debug!("mDNS daemon started");
        Ok(Box::new(MdnsSdSession {
            daemon,
            browsing: Vec::new(),
        }))
    }
}

struct MdnsSdSession {
    daemon: ServiceDaemon,
    browsing: Vec<String>,
}

impl BrowseSession for MdnsSdSession {
    fn browse(&mut self, service_type: &str, sink: RecordSink) -> Result<()> {
        let receiver =
            self.daemon
                .browse(service_type)
                .map_err(|e| DiscoveryError::RegistrationFailed {
                    service_type: service_type.to_string(),
                    reason: e.to_string(),
                })?;
        self.browsing.push(service_type.to_string());

        let browse_type = service_type.to_string();
        tokio::spawn(async move {
            while let Ok(event) = receiver.recv_async().await {
                match event {
                    ServiceEvent::ServiceResolved(resolved) => {
                        if sink.send(resolved_to_raw(&resolved)).is_err() {
                            break;
                        }
                    }
                    ServiceEvent::SearchStopped(_) => break,
                    other => tracing::trace!(browse_type, event = ?other, "mDNS event"),
                }
            }
            tracing::trace!(browse_type, "Browse forwarder stopped");
        });

        Ok(())
    }
}

impl Drop for MdnsSdSession {
    fn drop(&mut self) {
        for service_type in &self.browsing {
            if let Err(e) = self.daemon.stop_browse(service_type) {
                tracing::debug!(service_type, error = %e, "Failed to stop browse on drop");
            }
        }
        shutdown_and_wait(&self.daemon);
    }
}

/// Shut the daemon down and block until its thread reports back, so the
/// multicast sockets are closed before the scan returns. Returns whether
/// the shutdown was confirmed.
fn shutdown_and_wait(daemon: &ServiceDaemon) -> bool {
    let status = match daemon.shutdown() {
        Ok(status) => status,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to shut down mDNS daemon");
            return false;
        }
    };
    match status.recv_timeout(SHUTDOWN_CONFIRM_TIMEOUT) {
        Ok(status) => {
            tracing::debug!(?status, "mDNS daemon stopped");
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "mDNS daemon did not confirm shutdown");
            false
        }
    }
}

/// Owned copy of a library record; TXT values without data become empty.
fn resolved_to_raw(resolved: &ResolvedService) -> RawRecord {
    let properties = resolved
        .get_properties()
        .iter()
        .map(|p| {
            (
                p.key().as_bytes().to_vec(),
                p.val().map(<[u8]>::to_vec).unwrap_or_default(),
            )
        })
        .collect();

    RawRecord {
        name: resolved.get_fullname().to_string(),
        service_type: resolved.ty_domain.clone(),
        addresses: resolved
            .get_addresses()
            .iter()
            .map(|a| a.to_ip_addr())
            .collect(),
        port: resolved.get_port(),
        hostname: resolved.get_hostname().to_string(),
        properties,
    }
}
