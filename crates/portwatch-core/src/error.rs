// ── Core error types ──
//
// User-facing errors from portwatch-core. Consumers never see raw HTTP
// status codes or serde failures; `From<portwatch_api::Error>` translates
// them into domain variants.
//
// Inside the polling loop these are logged and swallowed. They only
// surface from one-shot calls such as `fetch_snapshots` or `fetch_topology`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach port service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Port service did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Payload errors ───────────────────────────────────────────────
    #[error("Port service reported '{status}': {message}")]
    Rejected { status: String, message: String },

    #[error("Malformed port service payload: {message}")]
    MalformedPayload { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for failures the next polling cycle may not repeat.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::Rejected { .. }
        ) || matches!(self, Self::Api { status: Some(s), .. } if *s >= 500)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<portwatch_api::Error> for CoreError {
    fn from(err: portwatch_api::Error) -> Self {
        match err {
            portwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            portwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            portwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            portwatch_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                status: Some(status),
            },
            portwatch_api::Error::Rejected { status, message } => {
                CoreError::Rejected { status, message }
            }
            portwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedPayload { message }
            }
        }
    }
}
