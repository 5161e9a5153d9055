//! Shared configuration for portwatch.
//!
//! TOML profiles with environment overrides, and translation to
//! `portwatch_core::MonitorConfig`. The CLI layers its flag overrides on
//! top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portwatch_core::{Endpoints, MonitorConfig, TlsVerification};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `PORTWATCH_PROFILES__LAB__ENDPOINT`.
pub const ENV_PREFIX: &str = "PORTWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named port service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_discovery_cooldown_ms")]
    pub discovery_cooldown_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            discovery_cooldown_ms: default_discovery_cooldown_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    3_000
}
fn default_discovery_cooldown_ms() -> u64 {
    3_000
}

/// A named port service profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Port service base URL (e.g., "http://10.0.0.5:8080").
    pub endpoint: String,

    pub poll_interval_ms: Option<u64>,

    pub discovery_cooldown_ms: Option<u64>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification.
    pub insecure: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub status_path: Option<String>,
    pub discovery_path: Option<String>,
    pub topology_path: Option<String>,

    /// Drop results from cycles older than the last one applied.
    #[serde(default)]
    pub reject_stale_responses: bool,
}

impl Profile {
    /// Profile pointing at `endpoint` with everything else defaulted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    ///
    /// Returns `Ok(None)` when no name was requested and the default
    /// profile does not exist; an explicitly requested missing profile is
    /// an error.
    pub fn profile(&self, requested: Option<&str>) -> Result<Option<(&str, &Profile)>, ConfigError> {
        let name = match requested {
            Some(name) => name,
            None => match self.default_profile.as_deref() {
                Some(name) => name,
                None => return Ok(None),
            },
        };

        match self.profiles.get_key_value(name) {
            Some((name, profile)) => Ok(Some((name.as_str(), profile))),
            None if requested.is_some() => Err(ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names().join(", "),
            }),
            None => Ok(None),
        }
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "portwatch", "portwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("portwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── MonitorConfig translation ───────────────────────────────────────

/// Build a `MonitorConfig` from a profile and the global defaults.
///
/// The result is validated, so interval and URL problems surface here
/// rather than when the controller is constructed.
pub fn profile_to_monitor_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let url: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let mut config = MonitorConfig::new(url);

    config.tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval =
        Duration::from_millis(profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms));
    config.discovery_cooldown = Duration::from_millis(
        profile
            .discovery_cooldown_ms
            .unwrap_or(defaults.discovery_cooldown_ms),
    );
    config.endpoints = endpoints(profile);
    config.reject_stale_responses = profile.reject_stale_responses;

    config.validate().map_err(|e| ConfigError::Validation {
        field: "profile".into(),
        reason: e.to_string(),
    })?;

    Ok(config)
}

fn endpoints(profile: &Profile) -> Endpoints {
    let mut endpoints = Endpoints::default();
    if let Some(ref path) = profile.status_path {
        endpoints.status.clone_from(path);
    }
    if let Some(ref path) = profile.discovery_path {
        endpoints.discovery.clone_from(path);
    }
    if let Some(ref path) = profile.topology_path {
        endpoints.topology.clone_from(path);
    }
    endpoints
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use portwatch_core::config::DEFAULT_URL;
    use pretty_assertions::assert_eq;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "lab"

[defaults]
poll_interval_ms = 2000

[profiles.lab]
endpoint = "https://10.0.0.5:8443"
insecure = true
status_path = "/v2/ports/status"
reject_stale_responses = true
"#,
        );

        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(None).unwrap().unwrap();
        assert_eq!(name, "lab");
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(cfg.defaults.poll_interval_ms, 2000);
        assert_eq!(cfg.defaults.output, "table");

        let monitor = profile_to_monitor_config(profile, &cfg.defaults).unwrap();
        assert_eq!(monitor.url.as_str(), "https://10.0.0.5:8443/");
        assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(monitor.poll_interval, Duration::from_secs(2));
        assert_eq!(monitor.discovery_cooldown, Duration::from_secs(3));
        assert_eq!(monitor.endpoints.status, "/v2/ports/status");
        assert_eq!(monitor.endpoints.discovery, "/api/ports/refresh");
        assert!(monitor.reject_stale_responses);
    }

    #[test]
    fn explicit_missing_profile_is_an_error() {
        let mut cfg = Config::default();
        cfg.profiles.insert("b".into(), Profile::new(DEFAULT_URL));
        cfg.profiles.insert("a".into(), Profile::new(DEFAULT_URL));

        let err = cfg.profile(Some("nope")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ProfileNotFound { ref available, .. } if available == "a, b"
        ));
    }

    #[test]
    fn missing_default_profile_is_not_an_error() {
        let cfg = Config::default();
        assert!(cfg.profile(None).unwrap().is_none());
    }

    #[test]
    fn ca_cert_selects_custom_ca_unless_insecure() {
        let mut profile = Profile::new("https://10.0.0.5");
        profile.ca_cert = Some(PathBuf::from("/etc/portwatch/ca.pem"));
        let monitor = profile_to_monitor_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(
            monitor.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/portwatch/ca.pem"))
        );

        profile.insecure = Some(true);
        let monitor = profile_to_monitor_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = profile_to_monitor_config(&Profile::new("not a url"), &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "endpoint"));
    }

    #[test]
    fn out_of_range_interval_is_rejected() {
        let mut profile = Profile::new(DEFAULT_URL);
        profile.poll_interval_ms = Some(100);
        let err = profile_to_monitor_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "profile"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("http://10.1.1.1:8080");
        profile.timeout = Some(4);
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn local_profile_uses_defaults() {
        let monitor =
            profile_to_monitor_config(&Profile::new(DEFAULT_URL), &Defaults::default()).unwrap();
        assert_eq!(monitor.url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(monitor.timeout, Duration::from_secs(10));
        assert_eq!(monitor.tls, TlsVerification::SystemDefaults);
    }
}
