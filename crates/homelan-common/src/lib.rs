//! Wire types shared by every homelan capability.
//!
//! Each command prints exactly one [`Envelope`] to stdout. Domain crates
//! map their own error enums onto [`ErrorCode`] so the host process can
//! branch on a stable code instead of parsing messages.

pub mod envelope;
pub mod error;

pub use envelope::Envelope;
pub use error::ErrorCode;
