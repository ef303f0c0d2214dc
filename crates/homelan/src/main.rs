mod cli;
mod commands;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use homelan_common::{Envelope, ErrorCode};

use cli::{Cli, LogConfig};

/// Exit status for command-line usage errors.
const USAGE_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_error(e),
    };

    // Guards flush buffered log lines when main returns.
    let _log_guards = match init_logging(&LogConfig::from_cli(&cli)) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            Vec::new()
        }
    };

    let status = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(commands::dispatch(cli.command)),
        Err(e) => commands::emit::<()>(Err(anyhow::Error::new(e).context("failed to start runtime"))),
    };
    ExitCode::from(status)
}

/// Help and version keep clap's behaviour; everything else becomes an
/// `invalid_input` envelope on stdout with the clap diagnostic on stderr.
fn usage_error(e: clap::Error) -> ExitCode {
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        e.exit();
    }
    let _ = e.print();
    commands::print_json(&usage_envelope(&e));
    ExitCode::from(USAGE_EXIT)
}

fn usage_envelope(e: &clap::Error) -> Envelope<()> {
    Envelope::fail(ErrorCode::InvalidInput, usage_message(e))
}

/// clap's diagnostic on one line, without the usage and help hints. The
/// offending arguments follow the first line, so they are kept.
fn usage_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let message = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:") && !line.starts_with("For more information"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let message = message.trim_start_matches("error: ");
    if message.is_empty() {
        "invalid arguments".to_string()
    } else {
        message.to_string()
    }
}

pub(crate) fn init_logging(
    config: &LogConfig,
) -> anyhow::Result<Vec<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    // stdout carries the JSON envelope only.
    let (nb_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(nb_stderr);

    if let Some(path) = &config.file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let (nb_file, file_guard) = tracing_appender::non_blocking(file);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(nb_file);

        tracing_subscriber::registry()
            .with(config.env_filter())
            .with(stderr_layer)
            .with(file_layer)
            .try_init()?;

        Ok(vec![stderr_guard, file_guard])
    } else {
        tracing_subscriber::registry()
            .with(config.env_filter())
            .with(stderr_layer)
            .try_init()?;

        Ok(vec![stderr_guard])
    }
}
