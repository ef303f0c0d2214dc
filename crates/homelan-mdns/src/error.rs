use homelan_common::ErrorCode;
use thiserror::Error;

/// Domain-specific errors for mDNS discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("mDNS is not available on this host: {0}")]
    FacilityUnavailable(String),

    #[error("Invalid service type: {0}")]
    InvalidServiceType(String),

    #[error("Browse registration failed for {service_type}: {reason}")]
    RegistrationFailed {
        service_type: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

impl From<crate::service_type::ServiceTypeError> for DiscoveryError {
    fn from(e: crate::service_type::ServiceTypeError) -> Self {
        DiscoveryError::InvalidServiceType(e.to_string())
    }
}

impl From<&DiscoveryError> for ErrorCode {
    fn from(e: &DiscoveryError) -> Self {
        match e {
            DiscoveryError::FacilityUnavailable(_) => Self::FacilityUnavailable,
            DiscoveryError::InvalidServiceType(_) => Self::InvalidServiceType,
            DiscoveryError::RegistrationFailed { .. } => Self::RegistrationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_wire_code() {
        let cases = vec![
            (
                DiscoveryError::FacilityUnavailable("no sockets".into()),
                ErrorCode::FacilityUnavailable,
            ),
            (
                DiscoveryError::InvalidServiceType("_x._sctp".into()),
                ErrorCode::InvalidServiceType,
            ),
            (
                DiscoveryError::RegistrationFailed {
                    service_type: "_hap._tcp.local.".into(),
                    reason: "channel closed".into(),
                },
                ErrorCode::RegistrationFailed,
            ),
        ];
        for (err, expected) in &cases {
            assert_eq!(ErrorCode::from(err), *expected, "{err:?}");
        }
    }

    #[test]
    fn registration_failure_message_names_the_type() {
        let err = DiscoveryError::RegistrationFailed {
            service_type: "_hap._tcp.local.".into(),
            reason: "channel closed".into(),
        };
        assert!(err.to_string().contains("_hap._tcp.local."));
    }
}
