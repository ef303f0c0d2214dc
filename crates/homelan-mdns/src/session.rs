//! One bounded discovery window.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::events::ScanEvent;
use crate::facility::{BrowseSession, MdnsFacility, RecordSink};
use crate::normalize::normalize;
use crate::record::DiscoveryResult;
use crate::service_type::{self, ServiceTypeSet};

/// Browse every type in `service_types` for `timeout`, then return the
/// deduplicated devices in first-seen order.
///
/// The window always runs to completion unless `cancel` fires. Records
/// arrive on one queue shared by all browses, and this function is its
/// only consumer, so the accumulator has a single writer.
pub(crate) async fn run(
    facility: &dyn MdnsFacility,
    events: &broadcast::Sender<ScanEvent>,
    service_types: &ServiceTypeSet,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<DiscoveryResult> {
    let service_types = service_types.clone().or_defaults();

    // Nothing is announced until the facility is known to work.
    let mut session = facility.open()?;

    tracing::info!(
        timeout_secs = timeout.as_secs_f64(),
        types = %service_types,
        "mDNS scan started"
    );
    let _ = events.send(ScanEvent::Started {
        service_types: service_types.to_vec(),
        timeout_secs: timeout.as_secs_f64(),
    });

    let (sink, mut records) = mpsc::unbounded_channel();
    for service_type in service_types.iter() {
        if let Err(e) = register(session.as_mut(), service_type, &sink) {
            tracing::warn!(service_type, error = %e, "Skipping service type");
            let _ = events.send(ScanEvent::TypeSkipped {
                service_type: service_type.to_string(),
                reason: e.to_string(),
            });
        }
    }
    drop(sink);

    let mut dedup = Deduplicator::new();
    let window = tokio::time::sleep(timeout);
    tokio::pin!(window);

    loop {
        tokio::select! {
            _ = &mut window => break,
            _ = cancel.cancelled() => {
                tracing::info!("mDNS scan cancelled");
                break;
            }
            Some(raw) = records.recv() => {
                let device = normalize(raw);
                tracing::info!(
                    name = %device.friendly_name,
                    address = device.primary_address().unwrap_or("no IP"),
                    service_type = %device.service_type,
                    "Found"
                );
                let _ = events.send(ScanEvent::Observed(device.clone()));
                if !dedup.offer(device) {
                    tracing::trace!("Duplicate record discarded");
                }
            }
        }
    }

    drop(records);
    drop(session);

    let result = dedup.finish();
    tracing::info!(unique = result.len(), "mDNS scan finished");
    let _ = events.send(ScanEvent::Finished {
        unique: result.len(),
    });
    Ok(result)
}

fn register(
    session: &mut dyn BrowseSession,
    service_type: &str,
    sink: &RecordSink,
) -> Result<()> {
    service_type::validate(service_type)?;
    session.browse(service_type, sink.clone())
}
