//! One-shot status fetch.

use tabled::Tabled;

use portwatch_core::reconcile::presentation;
use portwatch_core::{PortSnapshot, StatusClient, fetch_snapshots};

use crate::cli::StatusArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct PortRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl PortRow {
    pub(crate) fn new(snapshot: &PortSnapshot, color: bool) -> Self {
        let indicator = presentation::indicator(snapshot);
        let device_tone = presentation::device_tone(&snapshot.device);
        Self {
            port: snapshot.port.to_string(),
            label: snapshot.label.clone().unwrap_or_default(),
            link: output::paint(&indicator.text, Some(indicator.tone), color),
            status: indicator.badge.into(),
            device: output::paint(
                snapshot.device.label.as_deref().unwrap_or("-"),
                device_tone,
                color,
            ),
            details: snapshot.device.details.join("\n"),
        }
    }
}

/// Keep only `wanted` ports, in the order given. Empty `wanted` keeps all.
pub(crate) fn select(
    snapshots: Vec<PortSnapshot>,
    wanted: &[String],
) -> Result<Vec<PortSnapshot>, CliError> {
    if wanted.is_empty() {
        return Ok(snapshots);
    }

    wanted
        .iter()
        .map(|port| {
            snapshots
                .iter()
                .find(|s| s.port.as_str() == port)
                .cloned()
                .ok_or_else(|| CliError::PortNotFound {
                    port: port.clone(),
                    available: snapshots
                        .iter()
                        .map(|s| s.port.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &StatusClient,
    args: StatusArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let snapshots = select(fetch_snapshots(client).await?, &args.ports)?;
    let color = output::should_color(settings.color);

    let out = output::render_list(
        settings.output,
        &snapshots,
        |s| PortRow::new(s, color),
        |s| s.port.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
