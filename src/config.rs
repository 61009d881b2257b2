use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::server::distance::MapsConfig;

/// Courier ETA - delivery time prediction service
#[derive(Parser, Debug)]
#[command(name = "courier-eta")]
#[command(about = "Delivery time prediction service")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "COURIER_ETA_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Path to the JSON model artifact
    #[arg(long, env = "COURIER_ETA_MODEL", default_value = "CC_model.json")]
    pub model_path: PathBuf,

    /// Google Maps API key used by the distance proxy
    #[arg(long, env = "GOOGLE_MAP_API_KEY", hide_env_values = true)]
    pub maps_api_key: Option<String>,

    /// Base URL of the distance matrix API
    #[arg(long, env = "COURIER_ETA_MAPS_URL", default_value = "https://maps.googleapis.com")]
    pub maps_base_url: String,

    /// Timeout for distance matrix calls; none when omitted
    #[arg(long, env = "COURIER_ETA_MAPS_TIMEOUT")]
    pub maps_timeout_secs: Option<u64>,

    /// JSON file with extra holiday dates (array of YYYY-MM-DD)
    #[arg(long, env = "COURIER_ETA_EXTRA_HOLIDAYS")]
    pub extra_holidays: Option<PathBuf>,

    /// Log verbosity level (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Effective service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub model_path: PathBuf,
    pub maps: MapsConfig,
    pub extra_holidays: Option<PathBuf>,
    pub verbose: u8,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            model_path: PathBuf::from("CC_model.json"),
            maps: MapsConfig::default(),
            extra_holidays: None,
            verbose: 0,
        }
    }
}

impl ServiceConfig {
    /// Default `tracing` filter directive for the configured verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl From<Cli> for ServiceConfig {
    fn from(cli: Cli) -> Self {
        Self {
            bind: cli.bind,
            model_path: cli.model_path,
            maps: MapsConfig {
                api_key: cli.maps_api_key,
                base_url: cli.maps_base_url,
                timeout: cli.maps_timeout_secs.map(Duration::from_secs),
            },
            extra_holidays: cli.extra_holidays,
            verbose: cli.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "courier-eta",
            "--bind",
            "127.0.0.1:9000",
            "--model-path",
            "/models/eta.json",
            "--maps-api-key",
            "secret",
            "--maps-timeout-secs",
            "5",
            "-vv",
        ])
        .unwrap();

        let config = ServiceConfig::from(cli);
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.model_path, PathBuf::from("/models/eta.json"));
        assert_eq!(config.maps.api_key.as_deref(), Some("secret"));
        assert_eq!(config.maps.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind.port(), 8000);
        assert_eq!(config.maps.base_url, "https://maps.googleapis.com");
        assert!(config.maps.timeout.is_none());
        assert_eq!(config.log_filter(), "info");
    }
}
