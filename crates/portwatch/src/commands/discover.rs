//! Fire the neighbor discovery trigger once.

use portwatch_core::{StatusClient, StatusSource};

use crate::config::Settings;
use crate::error::CliError;

pub async fn handle(client: &StatusClient, settings: &Settings) -> Result<(), CliError> {
    StatusSource::trigger_discovery(client).await?;
    if !settings.quiet {
        eprintln!(
            "Discovery requested; results appear after ~{}ms",
            settings.monitor.discovery_cooldown.as_millis()
        );
    }
    Ok(())
}
