//! CLI-side configuration resolution.
//!
//! Shared types and loading live in `portwatch_config`. This module layers
//! `GlobalOpts` overrides on top and picks the output format.

use clap::ValueEnum;

use portwatch_config::{Config, Defaults, Profile};
use portwatch_core::MonitorConfig;
use portwatch_core::config::DEFAULT_URL;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a command needs after flags, env and config are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub monitor: MonitorConfig,
    /// Profile the settings came from, if any.
    pub profile: Option<String>,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
}

/// Resolve the active profile and apply CLI flag overrides.
///
/// With no matching profile, the flags alone describe the endpoint and
/// anything unset falls back to the local default service.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Settings, CliError> {
    let found = cfg.profile(global.profile.as_deref())?;
    let (profile_name, mut profile) = match found {
        Some((name, profile)) => (Some(name.to_owned()), profile.clone()),
        None => (None, Profile::new(DEFAULT_URL)),
    };

    apply_overrides(&mut profile, global);
    let monitor = portwatch_config::profile_to_monitor_config(&profile, &cfg.defaults)?;

    tracing::debug!(
        profile = profile_name.as_deref().unwrap_or("<none>"),
        url = %monitor.url,
        "resolved monitor config"
    );

    Ok(Settings {
        monitor,
        profile: profile_name,
        output: output_format(global, &cfg.defaults),
        color: color_mode(global, &cfg.defaults),
        quiet: global.quiet,
    })
}

/// Copy every flag that was given onto `profile`.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }
    if let Some(ms) = global.interval {
        profile.poll_interval_ms = Some(ms);
    }
    if let Some(ms) = global.cooldown {
        profile.discovery_cooldown_ms = Some(ms);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
}

/// `--output`, else `defaults.output` from the config file, else table.
pub fn output_format(global: &GlobalOpts, defaults: &Defaults) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

pub fn color_mode(global: &GlobalOpts, defaults: &Defaults) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}
