use homelan_mdns::{DeviceDescriptor, Discovery};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::BridgeConfig;

#[derive(Debug, Serialize)]
pub struct ScanBody {
    pub devices: Vec<DeviceDescriptor>,
    pub count: usize,
}

impl ScanBody {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            count: devices.len(),
            devices,
        }
    }
}

/// Run one discovery window. Ctrl+C closes the window early and the
/// devices seen so far are still reported.
pub async fn run(config: &BridgeConfig) -> anyhow::Result<ScanBody> {
    let discovery = Discovery::new();
    let cancel = CancellationToken::new();

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, closing scan window");
                cancel.cancel();
            }
        })
    };

    let result = discovery
        .discover_until(&config.service_types, config.timeout, &cancel)
        .await;
    interrupt.abort();

    Ok(ScanBody::new(result?.into_devices()))
}
