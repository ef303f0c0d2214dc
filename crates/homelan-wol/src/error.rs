use homelan_common::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum WolError {
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WolError>;

impl From<&WolError> for ErrorCode {
    fn from(e: &WolError) -> Self {
        match e {
            WolError::InvalidMac(_) => ErrorCode::InvalidInput,
            WolError::Network(_) => ErrorCode::NetworkError,
        }
    }
}
