use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chain::config::{DEFAULT_API_BASE_URL, REQUEST_INTERVAL_MS, REQUEST_TIMEOUT_SECS};
use clap::{Parser, ValueEnum};
use containers::{Epoch, EpochFilter};
use epoch_sync::{ResumePolicy, SyncConfig};

pub const DEFAULT_DB_CONNECT_STRING: &str = "sqlite://graffiti.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 3000;

/// How `/export/{epoch}` matches stored epochs against the requested one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportMode {
    /// `epoch == N`
    #[default]
    Exact,
    /// `epoch >= N`
    AtLeast,
}

impl ExportMode {
    pub fn filter(self, epoch: Epoch) -> EpochFilter {
        match self {
            ExportMode::Exact => EpochFilter::Exact(epoch),
            ExportMode::AtLeast => EpochFilter::AtLeast(epoch),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ResumePolicyArg {
    #[default]
    Inclusive,
    AfterLast,
}

impl From<ResumePolicyArg> for ResumePolicy {
    fn from(arg: ResumePolicyArg) -> Self {
        match arg {
            ResumePolicyArg::Inclusive => ResumePolicy::Inclusive,
            ResumePolicyArg::AfterLast => ResumePolicy::AfterLast,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "graffiti-scraper", about = "Collects validator graffiti from a beacon chain explorer")]
pub struct Args {
    /// Explorer API key, sent as the `apikey` query parameter.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// `memory`, or an SQLite URL.
    #[arg(long, env = "DB_CONNECT_STRING", default_value = DEFAULT_DB_CONNECT_STRING)]
    pub db_connect_string: String,

    #[arg(short, long, default_value = "0.0.0.0")]
    pub address: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value_t = REQUEST_INTERVAL_MS)]
    pub request_interval_ms: u64,

    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = ResumePolicyArg::Inclusive)]
    pub resume_policy: ResumePolicyArg,

    #[arg(long, value_enum, default_value_t = ExportMode::Exact)]
    pub export_mode: ExportMode,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((self.address, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            request_interval: Duration::from_millis(self.request_interval_ms),
            resume_policy: self.resume_policy.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "graffiti-scraper",
            "--api-key",
            "key",
            "--api-base-url",
            "http://localhost:9000",
            "--db-connect-string",
            "memory",
            "--port",
            "8080",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);

        assert_eq!(args.listen_addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(args.request_timeout(), Duration::from_secs(30));
        assert_eq!(args.export_mode, ExportMode::Exact);

        let config = args.sync_config();
        assert_eq!(config.request_interval, Duration::from_secs(1));
        assert_eq!(config.resume_policy, ResumePolicy::Inclusive);
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--request-interval-ms",
            "250",
            "--resume-policy",
            "after-last",
            "--export-mode",
            "at-least",
            "--address",
            "127.0.0.1",
        ]);

        assert_eq!(args.listen_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(args.export_mode, ExportMode::AtLeast);

        let config = args.sync_config();
        assert_eq!(config.request_interval, Duration::from_millis(250));
        assert_eq!(config.resume_policy, ResumePolicy::AfterLast);
    }

    #[test]
    fn test_unknown_export_mode_is_rejected() {
        let result = Args::try_parse_from([
            "graffiti-scraper",
            "--api-key",
            "key",
            "--export-mode",
            "fuzzy",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_mode_filters() {
        assert_eq!(ExportMode::Exact.filter(Epoch(7)), EpochFilter::Exact(Epoch(7)));
        assert_eq!(ExportMode::AtLeast.filter(Epoch(7)), EpochFilter::AtLeast(Epoch(7)));
    }
}
