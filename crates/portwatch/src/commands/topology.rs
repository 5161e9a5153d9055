//! Device and link counts from the topology endpoint.

use portwatch_core::{StatusClient, StatusSource, TopologySummary};

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

fn detail(t: &TopologySummary) -> String {
    [
        format!("Devices:    {}", t.devices),
        format!("Links:      {}", t.links),
        format!("  LLDP:     {}", t.lldp_links),
        format!("  ARP:      {}", t.arp_links),
    ]
    .join("\n")
}

pub async fn handle(client: &StatusClient, settings: &Settings) -> Result<(), CliError> {
    let raw = StatusSource::fetch_topology(client).await?;
    let summary = TopologySummary::from(&raw);

    let out = output::render_single(settings.output, &summary, detail, |t| {
        format!("{} {}", t.devices, t.links)
    })?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
