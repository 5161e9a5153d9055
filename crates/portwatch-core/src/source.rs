// ── Status source seam ──
//
// The controller only needs three calls from the port service. Putting
// them behind a trait lets tests drive the controller with a scripted
// in-process source instead of HTTP.

use async_trait::async_trait;
use portwatch_api::transport::{TlsMode, TransportConfig};
use portwatch_api::{PortStatusBatch, RawTopology, StatusClient};

use crate::config::{MonitorConfig, TlsVerification};
use crate::convert::build_batch;
use crate::error::CoreError;
use crate::model::PortSnapshot;

/// Where port status comes from.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    /// One status batch. Rejections and malformed payloads are errors.
    async fn fetch_status(&self) -> Result<PortStatusBatch, CoreError>;

    /// Ask the host to re-run neighbor discovery. Completion on the far
    /// side is not awaited.
    async fn trigger_discovery(&self) -> Result<(), CoreError>;

    async fn fetch_topology(&self) -> Result<RawTopology, CoreError>;
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch_status(&self) -> Result<PortStatusBatch, CoreError> {
        Ok(StatusClient::fetch_status(self).await?)
    }

    async fn trigger_discovery(&self) -> Result<(), CoreError> {
        Ok(StatusClient::trigger_discovery(self).await?)
    }

    async fn fetch_topology(&self) -> Result<RawTopology, CoreError> {
        Ok(StatusClient::fetch_topology(self).await?)
    }
}

/// Build the HTTP status client described by `config`.
pub fn status_client(config: &MonitorConfig) -> Result<StatusClient, CoreError> {
    let transport = TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    };
    Ok(StatusClient::new(
        config.url.clone(),
        config.endpoints.clone(),
        &transport,
    )?)
}

/// One fetch turned into snapshots, without touching any target.
pub async fn fetch_snapshots<S>(source: &S) -> Result<Vec<PortSnapshot>, CoreError>
where
    S: StatusSource + ?Sized,
{
    let batch = source.fetch_status().await?;
    Ok(build_batch(&batch.ports))
}
