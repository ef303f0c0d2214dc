//! Command handlers. Each produces a body; [`emit`] wraps it in the
//! envelope and prints it.

pub mod scan;
pub mod status;

use homelan_common::{Envelope, ErrorCode};
use homelan_mdns::{DiscoveryError, ServiceTypeSet};
use homelan_wol::WolError;
use serde::Serialize;

use crate::cli::{BridgeConfig, Command};

pub(crate) async fn dispatch(command: Command) -> u8 {
    match command {
        Command::ScanMdns {
            window,
            service_types,
        } => emit(scan::run(&BridgeConfig::from_cli(&window, service_types.as_deref())).await),
        Command::ScanAirplay(window) => {
            emit(scan::run(&BridgeConfig::with_types(&window, ServiceTypeSet::airplay())).await)
        }
        Command::ScanHomekit(window) => {
            emit(scan::run(&BridgeConfig::with_types(&window, ServiceTypeSet::homekit())).await)
        }
        Command::ScanGoogle(window) => {
            emit(scan::run(&BridgeConfig::with_types(&window, ServiceTypeSet::google_cast())).await)
        }
        Command::Wol {
            mac,
            broadcast,
            port,
        } => emit(
            homelan_wol::wake(&mac, broadcast, port)
                .await
                .map_err(anyhow::Error::from),
        ),
        Command::Info => emit(Ok(status::info())),
        Command::Test => emit(Ok(status::self_test())),
    }
}

/// Print the envelope for `result` and return the process exit status.
pub(crate) fn emit<B: Serialize>(result: anyhow::Result<B>) -> u8 {
    let envelope = match result {
        Ok(body) => Envelope::ok(body),
        Err(e) => {
            let code = error_code(&e);
            if code.is_input_error() {
                tracing::warn!(error = %format!("{e:#}"), ?code, "Rejected input");
            } else {
                tracing::error!(error = %format!("{e:#}"), ?code, "Command failed");
            }
            Envelope::fail(code, e.to_string())
        }
    };
    if !print_json(&envelope) {
        return 1;
    }
    envelope.exit_code() as u8
}

/// Map an error to its wire code by looking for a domain error in the chain.
pub(crate) fn error_code(e: &anyhow::Error) -> ErrorCode {
    if let Some(e) = e.downcast_ref::<DiscoveryError>() {
        return e.into();
    }
    if let Some(e) = e.downcast_ref::<WolError>() {
        return e.into();
    }
    ErrorCode::Internal
}

/// Print a serializable value as one JSON line. If serialization fails a
/// fixed `internal` failure object is printed instead and `false` returned.
pub(crate) fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            println!(r#"{{"success":false,"error":"failed to serialize response","code":"internal"}}"#);
            false
        }
    }
}
