use crate::record::DeviceDescriptor;

/// Progress of a discovery window, broadcast to subscribers.
/// Purely observational: nothing here changes what a scan returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started {
        service_types: Vec<String>,
        timeout_secs: f64,
    },
    /// Every received record, duplicates included.
    Observed(DeviceDescriptor),
    TypeSkipped {
        service_type: String,
        reason: String,
    },
    Finished {
        unique: usize,
    },
}
