use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use homelan_mdns::ServiceTypeSet;

#[derive(Parser, Debug)]
#[command(
    name = "homelan",
    version,
    about = "Discover and wake smart-home devices on the local network"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "HOMELAN_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to file (in addition to stderr)
    #[arg(long, env = "HOMELAN_LOG_FILE", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Raise logging to debug when set to 1, true or yes
    #[arg(long, env = "NETWORK_DEBUG", hide = true, global = true)]
    pub network_debug: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Browse a set of mDNS service types (smart-home defaults when omitted)
    #[command(name = "scan_mdns")]
    ScanMdns {
        #[command(flatten)]
        window: WindowArgs,

        /// Comma-separated service types, e.g. "_hap._tcp,_airplay._tcp"
        #[arg(long, env = "SERVICE_TYPES", value_name = "TYPES")]
        service_types: Option<String>,
    },
    /// Find AirPlay and RAOP receivers
    #[command(name = "scan_airplay")]
    ScanAirplay(WindowArgs),
    /// Find HomeKit accessories
    #[command(name = "scan_homekit")]
    ScanHomekit(WindowArgs),
    /// Find Google Cast devices
    #[command(name = "scan_google")]
    ScanGoogle(WindowArgs),
    /// Send a Wake-on-LAN magic packet
    Wol {
        /// Target MAC address (aa:bb:cc:dd:ee:ff, dashes, dots or bare hex)
        #[arg(long, env = "WOL_MAC")]
        mac: String,

        /// Broadcast address to send to
        #[arg(long, env = "WOL_BROADCAST", default_value_t = homelan_wol::DEFAULT_BROADCAST)]
        broadcast: Ipv4Addr,

        /// UDP port to send to
        #[arg(long, env = "WOL_PORT", default_value_t = homelan_wol::DEFAULT_PORT)]
        port: u16,
    },
    /// Report host network information and capability availability
    Info,
    /// Check that the bridge runs
    Test,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct WindowArgs {
    /// Collection window in seconds
    #[arg(
        long,
        env = "NETWORK_TIMEOUT",
        default_value = "5",
        value_name = "SECONDS",
        value_parser = parse_timeout
    )]
    pub timeout: Duration,
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be positive, got {raw}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

/// Effective discovery parameters for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub timeout: Duration,
    pub service_types: ServiceTypeSet,
}

impl BridgeConfig {
    /// Resolve a scan command's arguments. An absent or blank type list
    /// means the smart-home defaults.
    pub fn from_cli(window: &WindowArgs, service_types: Option<&str>) -> Self {
        Self {
            timeout: window.timeout,
            service_types: service_types
                .map(ServiceTypeSet::from_csv)
                .unwrap_or_default()
                .or_defaults(),
        }
    }

    pub fn with_types(window: &WindowArgs, service_types: ServiceTypeSet) -> Self {
        Self {
            timeout: window.timeout,
            service_types,
        }
    }
}

/// Logging setup handed to `init_logging`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let debug_requested = cli.network_debug.as_deref().is_some_and(is_truthy);
        let level = match cli.verbose {
            0 if debug_requested && cli.log_level != "trace" => "debug",
            0 => cli.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        };
        Self {
            level: level.to_string(),
            file: cli.log_file.clone(),
        }
    }

    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("homelan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn scan_mdns_defaults() {
        let cli = parse(&["scan_mdns"]);
        let Command::ScanMdns { window, service_types } = cli.command else {
            panic!("expected scan_mdns");
        };
        assert_eq!(window.timeout, Duration::from_secs(5));
        assert_eq!(service_types, None);

        let config = BridgeConfig::from_cli(&window, None);
        assert_eq!(config.service_types, ServiceTypeSet::defaults());
    }

    #[test]
    fn scan_mdns_with_types_and_fractional_timeout() {
        let cli = parse(&["scan_mdns", "--timeout", "2.5", "--service-types", "_hap._tcp, _airplay._tcp"]);
        let Command::ScanMdns { window, service_types } = cli.command else {
            panic!("expected scan_mdns");
        };
        let config = BridgeConfig::from_cli(&window, service_types.as_deref());
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(
            config.service_types.to_vec(),
            vec!["_hap._tcp.local.", "_airplay._tcp.local."]
        );
    }

    #[test]
    fn blank_type_list_means_defaults() {
        let window = WindowArgs { timeout: Duration::from_secs(1) };
        let config = BridgeConfig::from_cli(&window, Some(" , "));
        assert_eq!(config.service_types, ServiceTypeSet::defaults());
    }

    #[test]
    fn specialized_scans_take_a_window() {
        let cli = parse(&["scan_google", "--timeout", "3"]);
        assert_eq!(
            cli.command,
            Command::ScanGoogle(WindowArgs { timeout: Duration::from_secs(3) })
        );
        assert!(matches!(parse(&["scan_airplay"]).command, Command::ScanAirplay(_)));
        assert!(matches!(parse(&["scan_homekit"]).command, Command::ScanHomekit(_)));
    }

    #[test]
    fn rejects_non_positive_timeout() {
        for bad in ["0", "0.0", "abc", "inf"] {
            let err = Cli::try_parse_from(["homelan", "scan_mdns", "--timeout", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{bad}");
        }
    }

    #[test]
    fn wol_defaults() {
        let cli = parse(&["wol", "--mac", "aa:bb:cc:dd:ee:ff"]);
        assert_eq!(
            cli.command,
            Command::Wol {
                mac: "aa:bb:cc:dd:ee:ff".into(),
                broadcast: Ipv4Addr::BROADCAST,
                port: 9,
            }
        );
    }

    #[test]
    fn wol_requires_mac() {
        let err = Cli::try_parse_from(["homelan", "wol"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn wol_rejects_bad_broadcast() {
        let err = Cli::try_parse_from(["homelan", "wol", "--mac", "aabbccddeeff", "--broadcast", "nope"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn log_config_from_flags() {
        let cli = parse(&["info"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "info");

        let cli = parse(&["test", "-vv"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "trace");

        let cli = parse(&["--log-level", "warn", "test"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "warn");
    }

    #[test]
    fn network_debug_raises_level() {
        let cli = parse(&["--network-debug", "yes", "info"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "debug");

        let cli = parse(&["--network-debug", "0", "info"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "info");

        let cli = parse(&["--network-debug", "TRUE", "--log-level", "trace", "info"]);
        assert_eq!(LogConfig::from_cli(&cli).level, "trace");
    }

    #[test]
    fn log_file_is_carried() {
        let cli = parse(&["--log-file", "/tmp/homelan.log", "test"]);
        assert_eq!(
            LogConfig::from_cli(&cli).file,
            Some(PathBuf::from("/tmp/homelan.log"))
        );
    }
}
