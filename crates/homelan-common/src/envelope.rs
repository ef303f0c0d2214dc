use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ErrorCode;

/// The single JSON object every command prints to stdout.
///
/// Custom Serialize keeps the shape flat:
/// - Success: `{"success": true, ...body fields}`
/// - Failure: `{"success": false, "error": "message", "code": "snake_case"}`
///
/// Generic over `B` so each command provides its own body type. The body
/// must serialize to a JSON object.
#[derive(Debug, Clone)]
pub enum Envelope<B> {
    Success(B),
    Failure { code: ErrorCode, message: String },
}

impl<B: Serialize> Envelope<B> {
    /// Wrap a successful result.
    pub fn ok(body: B) -> Self {
        Self::Success(body)
    }

    /// Build a failure envelope.
    pub fn fail(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Process exit code for this envelope: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl<B: Serialize> Serialize for Envelope<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success(body) => {
                #[derive(Serialize)]
                struct Flat<'a, B: Serialize> {
                    success: bool,
                    #[serde(flatten)]
                    body: &'a B,
                }
                Flat {
                    success: true,
                    body,
                }
                .serialize(serializer)
            }
            Envelope::Failure { code, message } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", message)?;
                map.serialize_entry("code", code)?;
                map.end()
            }
        }
    }
}
