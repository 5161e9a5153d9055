// Port service HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction and envelope
// unwrapping. Callers get typed payloads; the `{status, ...}` envelope is
// checked and stripped before they see anything.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, PortStatusBatch, PortsBody, RawTopology, TopologyBody};
use crate::transport::TransportConfig;

const SUCCESS: &str = "success";
const BODY_PREVIEW_CHARS: usize = 200;

/// Paths of the three endpoints the monitor consumes, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Port status feed.
    pub status: String,
    /// Fire-and-forget neighbor discovery trigger.
    pub discovery: String,
    /// Device/link topology summary.
    pub topology: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            status: "/api/ports/status".into(),
            discovery: "/api/ports/refresh".into(),
            topology: "/api/ports/topology".into(),
        }
    }
}

/// Envelope body for endpoints whose payload we don't care about.
#[derive(Debug, Default, Deserialize)]
struct Ack {}

/// HTTP client for the host's port-status service.
#[derive(Debug, Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl StatusClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. `http://10.0.0.5:8080`).
    pub fn new(
        base_url: Url,
        endpoints: Endpoints,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, endpoints))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, endpoints: Endpoints) -> Self {
        Self {
            http,
            base_url,
            endpoints,
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured endpoint paths.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the current status of every port.
    ///
    /// `GET {status}` → `{ "status": "success", "ports": [...] }`
    pub async fn fetch_status(&self) -> Result<PortStatusBatch, Error> {
        let url = self.endpoint_url(&self.endpoints.status)?;
        let envelope: Envelope<PortsBody> = self.get(url).await?;
        let ports = envelope.body.ports.ok_or_else(|| Error::Deserialization {
            message: "success envelope without a `ports` array".into(),
            body: String::new(),
        })?;
        debug!(count = ports.len(), "fetched port status");
        Ok(PortStatusBatch {
            timestamp: envelope.timestamp,
            ports,
        })
    }

    /// Ask the host to re-run neighbor discovery.
    ///
    /// `GET {discovery}`. The far side runs discovery asynchronously, so a
    /// successful return only means the request was accepted.
    pub async fn trigger_discovery(&self) -> Result<(), Error> {
        let url = self.endpoint_url(&self.endpoints.discovery)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let body = read_success_body(resp).await?;

        // Some hosts answer with plain text; only a JSON rejection counts.
        if let Ok(envelope) = serde_json::from_str::<Envelope<Ack>>(&body) {
            check_status(&envelope)?;
        }
        Ok(())
    }

    /// Fetch the discovered device/link topology.
    ///
    /// `GET {topology}` → `{ "status": "success", "topology": { devices, links } }`
    pub async fn fetch_topology(&self) -> Result<RawTopology, Error> {
        let url = self.endpoint_url(&self.endpoints.topology)?;
        let envelope: Envelope<TopologyBody> = self.get(url).await?;
        Ok(envelope.body.topology.unwrap_or_default())
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a GET request and unwrap the envelope.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let body = read_success_body(resp).await?;

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        check_status(&envelope)?;
        Ok(envelope)
    }
}

/// Read the response body, turning non-2xx statuses into `Error::Http`.
async fn read_success_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body),
        });
    }
    Ok(resp.text().await?)
}

fn check_status<T>(envelope: &Envelope<T>) -> Result<(), Error> {
    match envelope.status.as_deref() {
        Some(SUCCESS) => Ok(()),
        other => Err(Error::Rejected {
            status: other.unwrap_or("<missing>").to_owned(),
            message: envelope.message.clone().unwrap_or_default(),
        }),
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
