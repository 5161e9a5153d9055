// ── Runtime monitor configuration ──
//
// Describes *where* the port service lives and *how often* to poll it.
// Never touches disk: the CLI builds a `MonitorConfig` (usually through
// portwatch-config) and hands it in.

use std::time::Duration;

use portwatch_api::Endpoints;
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_DISCOVERY_COOLDOWN: Duration = Duration::from_secs(3);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Accepted range for both the poll interval and the discovery cool-down.
pub const MIN_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_INTERVAL: Duration = Duration::from_secs(60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on an appliance).
    DangerAcceptInvalid,
}

/// Configuration for monitoring one host's port service.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Port service base URL (e.g., `http://10.0.0.5:8080`).
    pub url: Url,
    pub endpoints: Endpoints,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Time between regular polling cycles.
    pub poll_interval: Duration,
    /// Wait after a manual discovery trigger before the follow-up cycle.
    pub discovery_cooldown: Duration,
    /// Drop per-port results from cycles older than the last one applied.
    pub reject_stale_responses: bool,
}

impl MonitorConfig {
    /// Config for `url` with every other setting at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            endpoints: Endpoints::default(),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            discovery_cooldown: DEFAULT_DISCOVERY_COOLDOWN,
            reject_stale_responses: false,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        check_interval("poll interval", self.poll_interval)?;
        check_interval("discovery cool-down", self.discovery_cooldown)?;
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "request timeout must be greater than zero".into(),
            });
        }
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("unsupported URL scheme '{}'", self.url.scheme()),
            });
        }
        Ok(())
    }
}

fn check_interval(name: &str, value: Duration) -> Result<(), CoreError> {
    if (MIN_INTERVAL..=MAX_INTERVAL).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Config {
            message: format!(
                "{name} must be between {}ms and {}s, got {}ms",
                MIN_INTERVAL.as_millis(),
                MAX_INTERVAL.as_secs(),
                value.as_millis()
            ),
        })
    }
}
