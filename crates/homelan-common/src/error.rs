use serde::{Deserialize, Serialize};

/// Machine-readable error codes for the JSON envelope.
/// Shared by all commands and domains.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    InvalidServiceType,
    FacilityUnavailable,
    RegistrationFailed,
    NetworkError,
    Internal,
}

impl ErrorCode {
    /// Whether the failure was caused by the caller's parameters rather
    /// than by the host or the network.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::InvalidServiceType)
    }
}
