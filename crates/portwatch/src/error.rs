//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use portwatch_config::ConfigError;
use portwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to port service at {url}: {reason}")]
    #[diagnostic(
        code(portwatch::connection_failed),
        help(
            "Check that the port service is running and reachable.\n\
             Try: portwatch status --endpoint http://<host>:8080"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(portwatch::timeout),
        help("Increase timeout with --timeout or check the host's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Port service ─────────────────────────────────────────────────

    #[error("Port service reported '{status}': {message}")]
    #[diagnostic(
        code(portwatch::rejected),
        help("The host answered but could not collect port data. Check its discovery daemons.")
    )]
    Rejected { status: String, message: String },

    #[error("Unexpected response from port service: {message}")]
    #[diagnostic(
        code(portwatch::malformed_payload),
        help("Check that --endpoint points at a port-status service.")
    )]
    MalformedPayload { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(portwatch::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Port '{port}' not reported by the host")]
    #[diagnostic(
        code(portwatch::port_not_found),
        help("Reported ports: {available}")
    )]
    PortNotFound { port: String, available: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(portwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(portwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: portwatch config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(portwatch::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(portwatch::config))]
    Config(ConfigError),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(portwatch::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::PortNotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Rejected { status, message } => CliError::Rejected { status, message },

            CoreError::MalformedPayload { message } => CliError::MalformedPayload { message },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "http://10.0.0.1".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::Rejected {
                    status: "error".into(),
                    message: "lldpd down".into(),
                },
                exit_code::REJECTED,
            ),
            (
                CoreError::Config {
                    message: "poll interval".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Api {
                    message: "gone".into(),
                    status: Some(404),
                },
                exit_code::NOT_FOUND,
            ),
            (CoreError::Internal("boom".into()), exit_code::GENERAL),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn missing_profile_is_a_usage_error() {
        let err = CliError::from(ConfigError::ProfileNotFound {
            name: "lab".into(),
            available: "default".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
